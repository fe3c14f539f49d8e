//! Full JSON snapshot of the newest revision.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::record::Revision;

/// Write the first (newest) revision as indented JSON, row as received.
///
/// With no revisions nothing is written, but the path is still returned.
pub fn export_latest_full(versions: &[Revision], output_file: &Path) -> Result<PathBuf> {
    if let Some(latest) = versions.first() {
        let json = serde_json::to_string_pretty(latest.raw())
            .context("Failed to serialize latest revision")?;

        fs::write(output_file, json)
            .with_context(|| format!("Failed to write {}", output_file.display()))?;

        log::info!(
            "Full state of version {} exported to {}",
            latest.version_label(),
            output_file.display()
        );
    } else {
        log::warn!("No versions to snapshot; {} left untouched", output_file.display());
    }

    Ok(output_file.to_path_buf())
}
