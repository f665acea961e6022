use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2024-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with one commit tracking a small artifact layout:
/// `data/train.csv`, `data/labels.csv` and `model.bin`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_ait_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("data").join("train.csv"),
        "epoch,loss\n1,0.9\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("data").join("labels.csv"),
        "id,label\n1,cat\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("model.bin"),
        "weights-v1".to_string(),
    ));

    run_ait_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    ait_commit(repository_dir.path(), "Initial snapshot")
        .assert()
        .success();

    repository_dir
}

#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_ait_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (file, content, message) in [
        ("data.csv", "v1", "First snapshot"),
        ("model.bin", "v1", "Second snapshot"),
        ("data.csv", "v2", "Third snapshot"),
    ] {
        write_file(FileSpec::new(
            repository_dir.path().join(file),
            content.to_string(),
        ));
        run_ait_command(repository_dir.path(), &["add", file])
            .assert()
            .success();
        ait_commit(repository_dir.path(), message).assert().success();
    }

    repository_dir
}

pub fn run_ait_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("ait").expect("Failed to find ait binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn ait_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_ait_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("AIT_AUTHOR_NAME", AUTHOR_NAME),
        ("AIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("AIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Resolve HEAD through the symref chain by reading the ref files directly
pub fn get_head_commit_id(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".ait").join("HEAD"))?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".ait").join(ref_path.trim());
        Ok(std::fs::read_to_string(ref_file)?.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}
