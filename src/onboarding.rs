use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use std::path::PathBuf;

use crate::config::BeaconConfig;

/// Run the interactive first-time setup, starting from `current`.
pub fn run_onboarding(current: &BeaconConfig) -> Result<BeaconConfig> {
    println!("\n{}", "⚙️  Let's configure beacon!".cyan().bold());
    println!();

    let mut config = current.clone();

    // Step 1: remote backend for `beacon export`
    let base_url = Text::new("Backend project URL:")
        .with_placeholder("https://your-project.supabase.co")
        .with_default(current.remote.base_url.as_deref().unwrap_or(""))
        .with_help_message("Base URL of the REST backend holding page revisions")
        .prompt()
        .context("Failed to get backend URL")?;

    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        config.remote.base_url = None;
    } else if is_valid_base_url(&base_url) {
        config.remote.base_url = Some(base_url);
    } else {
        return Err(anyhow!(
            "Invalid backend URL. Must start with 'https://' or 'http://'"
        ));
    }

    let api_key = Password::new("API key (leave empty to keep current / use $BEACON_API_KEY):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to get API key")?;
    if !api_key.trim().is_empty() {
        config.remote.api_key = Some(api_key.trim().to_string());
    }

    println!();

    // Step 2: dev server
    let root = Text::new("Site directory to serve and publish:")
        .with_default(&current.serve.root.display().to_string())
        .prompt()
        .context("Failed to get site directory")?;
    config.serve.root = expand_tilde(root.trim())?;

    let port = Text::new("Port:")
        .with_default(&current.serve.port.to_string())
        .prompt()
        .context("Failed to get port")?;
    config.serve.port = port.trim().parse().context("Invalid port number")?;

    let link_live_site = Confirm::new("Show a link to the live site after publishing?")
        .with_default(current.serve.live_url.is_some())
        .prompt()
        .context("Failed to get live site preference")?;

    config.serve.live_url = if link_live_site {
        let url = Text::new("Live site URL:")
            .with_placeholder("https://user.github.io/site/")
            .with_default(current.serve.live_url.as_deref().unwrap_or(""))
            .prompt()
            .context("Failed to get live site URL")?;
        Some(url.trim().to_string()).filter(|u| !u.is_empty())
    } else {
        None
    };

    println!();
    println!("{}", "✓ Configuration complete!".green().bold());

    config.validate()?;
    Ok(config)
}

/// Validate backend URL format
fn is_valid_base_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Expand tilde in path
fn expand_tilde(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().context("Failed to get home directory")
    } else {
        Ok(PathBuf::from(path))
    }
}
