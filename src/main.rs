use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use beacon_devkit::config::ConfigManager;
use beacon_devkit::handlers::{self, ConfigUpdate, ServeOverrides};
use beacon_devkit::logger;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Dev server with a Publish button and edit-history backups for Beacon sites", long_about = None)]
#[command(version)]
struct Cli {
    /// Use this configuration file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site locally with a Publish button on every page
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Site directory to serve and publish
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Interface to bind (default 127.0.0.1)
        #[arg(long)]
        interface: Option<IpAddr>,
    },

    /// Back up the page edit history to local files
    Export {
        /// Markdown digest output file
        #[arg(long, value_name = "PATH")]
        markdown: Option<PathBuf>,

        /// JSON snapshot output file
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
    },

    /// View or change configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Backend project URL
        #[arg(long)]
        base_url: Option<String>,

        /// Backend API key
        #[arg(long)]
        api_key: Option<String>,

        /// Table holding page revisions
        #[arg(long)]
        table: Option<String>,

        /// Dev server port
        #[arg(long)]
        port: Option<u16>,

        /// Site directory
        #[arg(long)]
        root: Option<PathBuf>,

        /// Dev server worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Git remote to push to
        #[arg(long)]
        remote: Option<String>,

        /// Git branch to push
        #[arg(long)]
        branch: Option<String>,

        /// Live site URL linked after publishing
        #[arg(long)]
        live_url: Option<String>,
    },

    /// Interactive first-time setup
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init_logger()?;

    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigManager::config_file_path()?,
    };

    match cli.command {
        Commands::Serve {
            port,
            root,
            interface,
        } => {
            let overrides = ServeOverrides {
                port,
                root,
                interface,
            };
            handlers::handle_serve(&config_path, &overrides)?;
        }
        Commands::Export { markdown, snapshot } => {
            handlers::handle_export(&config_path, markdown, snapshot)?;
        }
        Commands::Config {
            show,
            base_url,
            api_key,
            table,
            port,
            root,
            workers,
            remote,
            branch,
            live_url,
        } => {
            if show {
                handlers::handle_config_show(&config_path)?;
            } else {
                let update = ConfigUpdate {
                    base_url,
                    api_key,
                    table,
                    port,
                    root,
                    workers,
                    live_url,
                    remote,
                    branch,
                };
                handlers::handle_config_update(&config_path, &update)?;
            }
        }
        Commands::Init => {
            handlers::handle_init(&config_path)?;
        }
    }

    Ok(())
}
