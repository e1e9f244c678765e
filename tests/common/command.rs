use assert_cmd::Command;
use std::path::Path;

/// Commit time pinned for CLI runs, so commit IDs are reproducible
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_COLOR", "1"), ("GITLET_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", message])
}

/// Commit ID of the tip of the current branch, read from the CLI's `log`
pub fn head_commit_id(dir: &Path) -> String {
    let output = run_gitlet_command(dir, &["log"])
        .output()
        .expect("Failed to run log");
    let stdout = String::from_utf8(output.stdout).expect("log output is not UTF-8");

    stdout
        .lines()
        .find_map(|line| line.strip_prefix("commit "))
        .expect("log printed no commit")
        .to_string()
}
