//! Revision-history export: fetch every saved page version from the remote
//! backend, then write a Markdown backup and a JSON snapshot of the newest one.

mod fetch;
pub mod html;
mod markdown;
mod record;
mod snapshot;

pub use fetch::{RestSource, VersionSource};
pub use html::{section_id, strip_html};
pub use markdown::{
    export_to_markdown, group_by_section, render_markdown, MAX_ENTRIES_PER_SECTION, MAX_TEXT_CHARS,
};
pub use record::Revision;
pub use snapshot::export_latest_full;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Files written by a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub versions: usize,
    pub markdown: PathBuf,
    pub snapshot: PathBuf,
}

/// Fetch, write the Markdown backup, then the snapshot.
///
/// Each step runs only if the previous one succeeded.
pub fn run_export(
    source: &dyn VersionSource,
    markdown_output: &Path,
    snapshot_output: &Path,
) -> Result<ExportSummary> {
    println!("{}", "Fetching versions...".cyan().bold());
    let versions = source
        .fetch_versions()
        .context("Failed to fetch versions")?;
    println!("  {} {} versions", "Found".green(), versions.len());

    let markdown = export_to_markdown(&versions, markdown_output)?;
    println!("  {} Exported to {}", "✓".green(), markdown.display());

    let snapshot = export_latest_full(&versions, snapshot_output)?;
    if versions.is_empty() {
        println!("  {} No versions, snapshot skipped", "!".yellow());
    } else {
        println!("  {} Full state exported to {}", "✓".green(), snapshot.display());
    }

    println!(
        "\n{}",
        "Done! Your edits are now backed up locally.".green().bold()
    );

    Ok(ExportSummary {
        versions: versions.len(),
        markdown,
        snapshot,
    })
}
