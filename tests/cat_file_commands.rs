use ait::artifacts::objects::object::hash_blob_bytes;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;
use common::command::{get_head_commit_id, init_repository_dir, run_ait_command};

#[rstest]
fn prints_a_blob_by_full_id(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let oid = hash_blob_bytes(b"weights-v1")?;

    run_ait_command(repository_dir.path(), &["cat-file", "-p", oid.as_ref()])
        .assert()
        .success()
        .stdout(predicate::eq("weights-v1"));

    Ok(())
}

#[rstest]
fn prints_a_commit_by_unambiguous_prefix(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let head = get_head_commit_id(repository_dir.path())?;

    run_ait_command(repository_dir.path(), &["cat-file", "-p", &head[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("tree "))
        .stdout(predicate::str::contains("Initial snapshot"));

    Ok(())
}

#[rstest]
fn uppercase_ids_resolve_to_the_same_object(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let oid = hash_blob_bytes(b"weights-v1")?;
    let uppercase = oid.as_ref().to_ascii_uppercase();

    run_ait_command(repository_dir.path(), &["cat-file", "-p", &uppercase])
        .assert()
        .success()
        .stdout(predicate::eq("weights-v1"));

    Ok(())
}

#[rstest]
fn a_too_short_prefix_is_rejected(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let head = get_head_commit_id(repository_dir.path())?;

    run_ait_command(repository_dir.path(), &["cat-file", "-p", &head[..3]])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));

    Ok(())
}

#[rstest]
fn an_unknown_prefix_reports_no_match(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_ait_command(repository_dir.path(), &["cat-file", "-p", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no object matches"));

    Ok(())
}
