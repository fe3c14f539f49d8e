//! Helpers shared by the git-backed integration tests.

use beacon_devkit::scm::GitScm;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Run git in `dir`, failing the test on a non-zero exit, and return stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Create `dir` as a fresh repository with a committer identity set.
pub fn init_repo(dir: &Path) -> GitScm {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init"]);
    git(dir, &["config", "user.name", "Beacon Publisher"]);
    git(dir, &["config", "user.email", "beacon@localhost"]);
    GitScm::open(dir).unwrap()
}
