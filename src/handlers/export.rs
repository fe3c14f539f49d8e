//! Export command handler

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::BeaconConfig;
use crate::export::{self, RestSource};
use crate::logger;

/// Handle `beacon export`
pub fn handle_export(
    config_path: &Path,
    markdown: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let config = BeaconConfig::load(Some(config_path))?;
    config.validate()?;

    let source = RestSource::from_config(&config)?;
    let markdown = markdown.unwrap_or_else(|| config.export.markdown_output.clone());
    let snapshot = snapshot.unwrap_or_else(|| config.export.snapshot_output.clone());

    let summary = export::run_export(&source, &markdown, &snapshot)?;

    logger::log_to_file(&format!(
        "Exported {} versions to {} and {}",
        summary.versions,
        summary.markdown.display(),
        summary.snapshot.display()
    ))?;

    Ok(())
}
