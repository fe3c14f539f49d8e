//! Commit-and-push triggered by the Publish button.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::logger;
use crate::scm::{CommandFailure, Repository};

pub const NO_CHANGES_MESSAGE: &str = "No changes to publish";
pub const PUBLISHED_MESSAGE: &str = "Published successfully";

/// JSON body returned by `POST /publish`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublishOutcome {
    pub fn published() -> Self {
        Self {
            success: true,
            message: Some(PUBLISHED_MESSAGE.to_string()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    fn git_error(err: &anyhow::Error) -> Self {
        let detail = match err.downcast_ref::<CommandFailure>() {
            Some(failure) if !failure.stderr.is_empty() => failure.stderr.clone(),
            _ => format!("{err:#}"),
        };
        Self::failed(format!("Git error: {detail}"))
    }
}

/// Commit message for a publish at `now`.
pub fn commit_message(now: DateTime<Local>) -> String {
    format!("Update {}", now.format("%Y-%m-%d %H:%M"))
}

/// Runs the publish sequence against a repository, one request at a time.
///
/// Concurrent callers queue on an internal lock; a caller that arrives
/// while another publish is running sees the tree that publish left behind.
pub struct Publisher {
    repo: Box<dyn Repository>,
    lock: Mutex<()>,
    journal: Option<PathBuf>,
}

impl Publisher {
    pub fn new(repo: Box<dyn Repository>) -> Self {
        Self {
            repo,
            lock: Mutex::new(()),
            journal: None,
        }
    }

    /// Also append every publish outcome to the log file at `log_path`.
    pub fn with_journal(mut self, log_path: PathBuf) -> Self {
        self.journal = Some(log_path);
        self
    }

    /// Publish with the current local time in the commit message.
    pub fn publish(&self) -> PublishOutcome {
        self.publish_at(Local::now())
    }

    /// Status, then stage/commit/push. The first failing step ends the
    /// sequence; earlier steps are not undone.
    pub fn publish_at(&self, now: DateTime<Local>) -> PublishOutcome {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let outcome = self.run_sequence(now);
        self.record(&outcome);
        outcome
    }

    fn run_sequence(&self, now: DateTime<Local>) -> PublishOutcome {
        match self.repo.has_changes() {
            Ok(true) => {}
            Ok(false) => {
                log::info!("Publish requested with a clean working tree");
                return PublishOutcome::failed(NO_CHANGES_MESSAGE);
            }
            Err(e) => {
                log::warn!("Status check failed: {e:#}");
                return PublishOutcome::git_error(&e);
            }
        }

        let message = commit_message(now);
        let result = self
            .repo
            .stage_all()
            .and_then(|()| self.repo.commit(&message))
            .and_then(|()| self.repo.push());

        match result {
            Ok(()) => {
                log::info!("Published: {message}");
                PublishOutcome::published()
            }
            Err(e) => {
                log::warn!("Publish failed: {e:#}");
                PublishOutcome::git_error(&e)
            }
        }
    }

    fn record(&self, outcome: &PublishOutcome) {
        let Some(log_path) = &self.journal else {
            return;
        };

        let verdict = if outcome.success { "succeeded" } else { "failed" };
        let line = format!(
            "Publish {verdict}: {}",
            outcome.message.as_deref().unwrap_or_default()
        );
        if let Err(e) = logger::append_to(log_path, &line) {
            log::warn!("Could not write publish outcome to log: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Default)]
    struct ScriptedRepo {
        status: String,
        fail_on: Option<&'static str>,
        calls: Arc<StdMutex<Vec<String>>>,
    }

    impl ScriptedRepo {
        fn step(&self, name: &str, record: String) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(record);
            if self.fail_on == Some(name) {
                return Err(CommandFailure {
                    command: format!("git {name}"),
                    stderr: format!("{name} exploded"),
                }
                .into());
            }
            Ok(())
        }
    }

    impl Repository for ScriptedRepo {
        fn status(&self) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push("status".to_string());
            Ok(self.status.clone())
        }

        fn stage_all(&self) -> anyhow::Result<()> {
            self.step("add", "add".to_string())
        }

        fn commit(&self, message: &str) -> anyhow::Result<()> {
            self.step("commit", format!("commit:{message}"))
        }

        fn push(&self) -> anyhow::Result<()> {
            self.step("push", "push".to_string())
        }
    }

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 7, 12, 5, 0).unwrap()
    }

    #[test]
    fn test_commit_message_format() {
        assert_eq!(commit_message(at_noon()), "Update 2025-06-07 12:05");
    }

    #[test]
    fn test_clean_tree_stops_after_status() {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let repo = ScriptedRepo {
            status: "  \n".to_string(),
            calls: Arc::clone(&calls),
            ..Default::default()
        };

        let outcome = Publisher::new(Box::new(repo)).publish_at(at_noon());
        assert_eq!(outcome, PublishOutcome::failed(NO_CHANGES_MESSAGE));
        assert_eq!(*calls.lock().unwrap(), vec!["status"]);
    }

    #[test]
    fn test_full_sequence() {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let repo = ScriptedRepo {
            status: " M index.html\n".to_string(),
            calls: Arc::clone(&calls),
            ..Default::default()
        };

        let outcome = Publisher::new(Box::new(repo)).publish_at(at_noon());
        assert_eq!(outcome, PublishOutcome::published());
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["status", "add", "commit:Update 2025-06-07 12:05", "push"]
        );
    }

    #[test]
    fn test_stage_failure_skips_commit_and_push() {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let repo = ScriptedRepo {
            status: "?? new.html\n".to_string(),
            fail_on: Some("add"),
            calls: Arc::clone(&calls),
        };

        let outcome = Publisher::new(Box::new(repo)).publish_at(at_noon());
        assert_eq!(outcome, PublishOutcome::failed("Git error: add exploded"));
        assert_eq!(*calls.lock().unwrap(), vec!["status", "add"]);
    }

    #[test]
    fn test_push_failure_reports_stderr() {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let repo = ScriptedRepo {
            status: " M about.html\n".to_string(),
            fail_on: Some("push"),
            calls: Arc::clone(&calls),
        };

        let outcome = Publisher::new(Box::new(repo)).publish_at(at_noon());
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Git error: push exploded"));
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_status_error_without_stderr_uses_display() {
        struct Broken;
        impl Repository for Broken {
            fn status(&self) -> anyhow::Result<String> {
                Err(anyhow!("git not found"))
            }
            fn stage_all(&self) -> anyhow::Result<()> {
                unreachable!()
            }
            fn commit(&self, _message: &str) -> anyhow::Result<()> {
                unreachable!()
            }
            fn push(&self) -> anyhow::Result<()> {
                unreachable!()
            }
        }

        let outcome = Publisher::new(Box::new(Broken)).publish_at(at_noon());
        assert_eq!(outcome, PublishOutcome::failed("Git error: git not found"));
    }

    #[test]
    fn test_outcomes_are_journaled() {
        let temp = tempfile::TempDir::new().unwrap();
        let log_path = temp.path().join("beacon.log");

        let clean = ScriptedRepo::default();
        let publisher = Publisher::new(Box::new(clean)).with_journal(log_path.clone());
        publisher.publish_at(at_noon());

        let dirty = ScriptedRepo {
            status: " M index.html\n".to_string(),
            ..Default::default()
        };
        let publisher = Publisher::new(Box::new(dirty)).with_journal(log_path.clone());
        publisher.publish_at(at_noon());

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Publish failed: No changes to publish"));
        assert!(lines[1].ends_with("Publish succeeded: Published successfully"));
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_string(&PublishOutcome::failed(NO_CHANGES_MESSAGE)).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"No changes to publish"}"#);

        let bare = PublishOutcome {
            success: true,
            message: None,
        };
        assert_eq!(serde_json::to_string(&bare).unwrap(), r#"{"success":true}"#);
    }
}
