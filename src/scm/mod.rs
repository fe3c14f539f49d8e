//! SCM (Source Control Management) abstraction layer.
//!
//! The publish flow only needs four operations from version control, so they
//! live behind the [`Repository`] trait. [`GitScm`] implements it with the git
//! CLI; tests substitute their own implementations.

mod git;

use anyhow::{anyhow, Result};
use std::path::Path;
use thiserror::Error;

pub use git::GitScm;

/// A version-control command that ran but exited unsuccessfully.
///
/// Carries the captured stderr so callers can show the tool's own message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{command} failed: {stderr}")]
pub struct CommandFailure {
    /// Command line, e.g. `git push`
    pub command: String,
    /// Captured standard error, trimmed
    pub stderr: String,
}

/// Working-tree operations used by the publish sequence.
pub trait Repository: Send + Sync {
    /// Machine-readable status of the working tree (`git status --porcelain`).
    fn status(&self) -> Result<String>;

    /// Stage all changes (add and remove).
    fn stage_all(&self) -> Result<()>;

    /// Commit staged changes with a message.
    fn commit(&self, message: &str) -> Result<()>;

    /// Push to the configured remote.
    fn push(&self) -> Result<()>;

    /// Check if there are uncommitted changes.
    fn has_changes(&self) -> Result<bool> {
        Ok(!self.status()?.trim().is_empty())
    }
}

/// Check if a directory is a Git repository.
pub fn is_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Open an existing Git repository.
pub fn open(path: &Path) -> Result<GitScm> {
    if is_repo(path) {
        GitScm::open(path)
    } else {
        Err(anyhow!(
            "No Git repository found at '{}'. Expected .git directory.",
            path.display()
        ))
    }
}

/// Check whether the `git` binary can be executed.
pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_repo() {
        let temp = TempDir::new().unwrap();
        assert!(!is_repo(temp.path()));

        std::fs::create_dir(temp.path().join(".git")).unwrap();
        assert!(is_repo(temp.path()));
    }

    #[test]
    fn test_open_non_repo_fails() {
        let temp = TempDir::new().unwrap();
        assert!(open(temp.path()).is_err());
    }

    #[test]
    fn test_command_failure_display() {
        let failure = CommandFailure {
            command: "git push".to_string(),
            stderr: "fatal: no upstream".to_string(),
        };
        assert_eq!(failure.to_string(), "git push failed: fatal: no upstream");

        let err = anyhow::Error::new(failure.clone());
        assert_eq!(err.downcast_ref::<CommandFailure>(), Some(&failure));
    }
}
