//! Git SCM backend using CLI commands.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{CommandFailure, Repository};

/// Git SCM implementation using the git CLI.
///
/// Every command runs with the repository root as its working directory, so
/// the process-wide current directory is never changed.
#[derive(Debug, Clone)]
pub struct GitScm {
    workdir: PathBuf,
    remote: Option<String>,
    branch: Option<String>,
}

impl GitScm {
    /// Open an existing Git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if !path.join(".git").exists() {
            return Err(anyhow!(
                "Not a git repository: '{}' (no .git directory)",
                path.display()
            ));
        }

        Ok(Self::at(&path))
    }

    /// Use `path` as the working tree without looking for `.git`.
    /// Git itself reports a missing repository on the first command.
    pub fn at(path: &Path) -> Self {
        Self {
            workdir: path.to_path_buf(),
            remote: None,
            branch: None,
        }
    }

    /// Push to `remote`/`branch` instead of the upstream git picks by default.
    ///
    /// A branch without a remote pushes to `origin`.
    pub fn with_push_target(mut self, remote: Option<String>, branch: Option<String>) -> Self {
        self.remote = remote;
        self.branch = branch;
        self
    }

    /// Repository root.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn push_args(&self) -> Vec<&str> {
        let mut args = vec!["push"];
        match (&self.remote, &self.branch) {
            (Some(remote), Some(branch)) => args.extend([remote.as_str(), branch.as_str()]),
            (Some(remote), None) => args.push(remote.as_str()),
            (None, Some(branch)) => args.extend(["origin", branch.as_str()]),
            (None, None) => {}
        }
        args
    }

    /// Run a git command and return stdout as a string.
    ///
    /// A non-zero exit becomes a [`CommandFailure`] holding the captured stderr.
    fn run_git(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        log::debug!("Running '{}' in {}", command, self.workdir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("Failed to run '{command}'"))?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                // git commit reports "nothing to commit" on stdout
                stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(CommandFailure { command, stderr }.into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a git command, returning Ok if it succeeds (ignoring stdout).
    fn run_git_ok(&self, args: &[&str]) -> Result<()> {
        self.run_git(args)?;
        Ok(())
    }
}

impl Repository for GitScm {
    fn status(&self) -> Result<String> {
        self.run_git(&["status", "--porcelain"])
    }

    fn stage_all(&self) -> Result<()> {
        self.run_git_ok(&["add", "-A"])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run_git_ok(&["commit", "-m", message])
    }

    fn push(&self) -> Result<()> {
        let args = self.push_args();
        self.run_git_ok(&args)
    }
}
