use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::command::{
    get_head_commit_id, repository_dir, repository_with_multiple_commits, run_ait_command,
};

#[rstest]
fn oneline_log_lists_commits_newest_first(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = repository_with_multiple_commits;

    let output = run_ait_command(repository_dir.path(), &["log", "--oneline"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;

    let messages: Vec<_> = stdout
        .lines()
        .map(|line| line.split_once(' ').map(|(_, m)| m).unwrap_or(line))
        .collect();
    assert_eq!(
        messages,
        vec!["Third snapshot", "Second snapshot", "First snapshot"]
    );

    // every line starts with the short id
    for line in stdout.lines() {
        let (short, _) = line.split_once(' ').ok_or("missing id column")?;
        assert_eq!(short.len(), 8);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
    }

    let head = get_head_commit_id(repository_dir.path())?;
    assert!(stdout.starts_with(&head[..8]));

    Ok(())
}

#[rstest]
fn medium_format_shows_author_date_and_message(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = repository_with_multiple_commits;
    let head = get_head_commit_id(repository_dir.path())?;

    run_ait_command(repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("commit {head}")))
        .stdout(predicate::str::contains(
            "Author: fake_user <fake_email@email.com>",
        ))
        .stdout(predicate::str::contains("Date:   Mon Jan 1 12:00:00 2024"))
        .stdout(predicate::str::contains("    Third snapshot"));

    Ok(())
}

#[rstest]
fn log_on_an_unborn_branch_prints_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_ait_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_ait_command(repository_dir.path(), &["log", "--oneline"])
        .assert()
        .success()
        .stdout(predicate::eq(""));

    Ok(())
}
