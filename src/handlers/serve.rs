//! Serve command handler
//!
//! Resolves the effective [`ServeConfig`](crate::config::ServeConfig), wires the git-backed
//! [`Publisher`] into a [`DevServer`] and runs it until Ctrl+C.

use anyhow::{Context, Result};
use colored::Colorize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::config::{BeaconConfig, ConfigManager};
use crate::logger;
use crate::scm::{self, GitScm};
use crate::serve::{render_widget, DevServer, Publisher, ServerContext};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ServeOverrides {
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
    pub interface: Option<IpAddr>,
}

impl ServeOverrides {
    pub fn apply(&self, config: &mut BeaconConfig) {
        if let Some(port) = self.port {
            config.serve.port = port;
        }
        if let Some(root) = &self.root {
            config.serve.root = root.clone();
        }
        if let Some(interface) = self.interface {
            config.serve.interface = interface;
        }
    }
}

/// Handle `beacon serve`
pub fn handle_serve(config_path: &Path, overrides: &ServeOverrides) -> Result<()> {
    let mut config = BeaconConfig::load(Some(config_path))?;
    overrides.apply(&mut config);
    config.validate()?;

    let root = config.serve_root()?;
    let repo = open_repository(&root)
        .with_push_target(config.publish.remote.clone(), config.publish.branch.clone());

    let context = ServerContext::new(
        root.clone(),
        render_widget(config.serve.live_url.as_deref()),
        Publisher::new(Box::new(repo)).with_journal(ConfigManager::log_file_path()?),
    );
    let server = DevServer::bind(&config.serve, context)?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        println!();
        log::info!("Shutting down...");
        shutdown.shutdown();
    })
    .context("Failed to install Ctrl+C handler")?;

    print_banner(server.addr().port(), &root);
    logger::log_to_file(&format!(
        "Dev server started on {} for {}",
        server.addr(),
        root.display()
    ))?;

    server.run()
}

/// Open the repository at `root`, or keep serving with a warning when
/// there is none; publish then reports the git error.
fn open_repository(root: &Path) -> GitScm {
    match scm::open(root) {
        Ok(repo) => repo,
        Err(e) => {
            log::warn!("{e}");
            println!(
                "{} {}",
                "⚠".yellow().bold(),
                "Publishing will fail until the site directory is a git repository.".yellow()
            );
            GitScm::at(root)
        }
    }
}

fn print_banner(port: u16, root: &Path) {
    println!();
    println!("{}", "Beacon dev server".cyan().bold());
    println!("{}", "=".repeat(50).cyan());
    println!("  {} {}", "Serving:".bold(), root.display());
    println!("  {} http://localhost:{}", "Open:".bold(), port);
    println!();
    println!("  Edit files, then click the green Publish button!");
    println!("  {}", "Press Ctrl+C to stop".dimmed());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = BeaconConfig::default();
        config.serve.port = 3000;

        let overrides = ServeOverrides {
            port: Some(9000),
            interface: Some(IpAddr::from([0, 0, 0, 0])),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.interface, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.serve.root, PathBuf::from("."));
    }

    #[test]
    fn test_open_repository_without_git_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let repo = open_repository(temp.path());
        assert_eq!(repo.workdir(), temp.path());
    }
}
