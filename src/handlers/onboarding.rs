//! Init command handler

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::BeaconConfig;
use crate::logger;
use crate::onboarding;

/// Check if we're running in an interactive terminal
fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Handle `beacon init`
pub fn handle_init(config_path: &Path) -> Result<()> {
    if !is_interactive() {
        return Err(anyhow!(
            "beacon init needs an interactive terminal. Use `beacon config --<option> <value>` instead."
        ));
    }

    let current = BeaconConfig::load_from(config_path)?;
    if config_path.exists() {
        println!(
            "{} {}",
            "Updating existing configuration at".dimmed(),
            config_path.display()
        );
    }

    let config = onboarding::run_onboarding(&current)?;
    config
        .save_to(config_path)
        .context("Failed to save configuration")?;

    logger::log_to_file(&format!("Configuration written by init to {}", config_path.display()))?;

    println!();
    println!("{} Saved to {}", "✓".green().bold(), config_path.display());
    println!("  {} to start the dev server", "beacon serve".cyan());
    println!("  {} to back up the edit history", "beacon export".cyan());

    Ok(())
}
