//! Configuration command handlers
//!
//! `beacon config --show` prints the effective settings;
//! `beacon config --<option> <value>` edits the config file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{BeaconConfig, API_KEY_ENV};

/// Values passed on the `beacon config` command line. `None` leaves a field as is.
#[derive(Debug, Default, Clone)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
    pub workers: Option<usize>,
    pub live_url: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.api_key.is_none()
            && self.table.is_none()
            && self.port.is_none()
            && self.root.is_none()
            && self.workers.is_none()
            && self.live_url.is_none()
            && self.remote.is_none()
            && self.branch.is_none()
    }

    /// Apply the update; an empty string clears an optional field.
    pub fn apply(&self, config: &mut BeaconConfig) {
        fn optional(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        if let Some(url) = &self.base_url {
            config.remote.base_url = optional(url.trim_end_matches('/'));
        }
        if let Some(key) = &self.api_key {
            config.remote.api_key = optional(key);
        }
        if let Some(table) = &self.table {
            config.remote.table = table.clone();
        }
        if let Some(port) = self.port {
            config.serve.port = port;
        }
        if let Some(root) = &self.root {
            config.serve.root = root.clone();
        }
        if let Some(workers) = self.workers {
            config.serve.workers = workers;
        }
        if let Some(url) = &self.live_url {
            config.serve.live_url = optional(url);
        }
        if let Some(remote) = &self.remote {
            config.publish.remote = optional(remote);
        }
        if let Some(branch) = &self.branch {
            config.publish.branch = optional(branch);
        }
    }
}

/// Handle `beacon config --show`
pub fn handle_config_show(config_path: &Path) -> Result<()> {
    let config = BeaconConfig::load(Some(config_path))?;

    println!("{}", "Beacon Configuration".cyan().bold());
    println!("{}", "=".repeat(60).cyan());
    println!("{} {}", "File:".dimmed(), config_path.display());
    println!();
    display_config_summary(&config);

    Ok(())
}

/// Handle `beacon config --<option> <value>`
pub fn handle_config_update(config_path: &Path, update: &ConfigUpdate) -> Result<()> {
    if update.is_empty() {
        println!(
            "{}",
            "No settings given. Use --show to view the configuration.".yellow()
        );
        return Ok(());
    }

    // Env overrides are not written back to the file
    let mut config = BeaconConfig::load_from(config_path)?;
    update.apply(&mut config);
    config.validate()?;

    config
        .save_to(config_path)
        .context("Failed to save configuration")?;

    log::info!("Configuration updated at {}", config_path.display());
    println!("{} Configuration saved to {}", "✓".green().bold(), config_path.display());

    Ok(())
}

fn display_config_summary(config: &BeaconConfig) {
    let unset = || "not set".yellow().to_string();

    println!("{}", "[remote]".bold());
    println!(
        "  base_url:        {}",
        config.remote.base_url.clone().unwrap_or_else(unset)
    );
    let key_source = if std::env::var(API_KEY_ENV).is_ok() {
        format!(" (from ${API_KEY_ENV})")
    } else {
        String::new()
    };
    println!(
        "  api_key:         {}{}",
        config
            .remote
            .api_key
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(unset),
        key_source.dimmed()
    );
    println!("  table:           {}", config.remote.table);

    println!("{}", "[serve]".bold());
    println!("  interface:       {}", config.serve.interface);
    println!("  port:            {}", config.serve.port);
    println!("  root:            {}", config.serve.root.display());
    println!("  workers:         {}", config.serve.workers);
    println!(
        "  live_url:        {}",
        config.serve.live_url.clone().unwrap_or_else(unset)
    );

    println!("{}", "[publish]".bold());
    println!(
        "  remote:          {}",
        config.publish.remote.clone().unwrap_or_else(|| "(git default)".dimmed().to_string())
    );
    println!(
        "  branch:          {}",
        config.publish.branch.clone().unwrap_or_else(|| "(git default)".dimmed().to_string())
    );

    println!("{}", "[export]".bold());
    println!("  markdown_output: {}", config.export.markdown_output.display());
    println!("  snapshot_output: {}", config.export.snapshot_output.display());
}

/// Show only the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(8), tail)
}
