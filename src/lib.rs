//! # beacon-devkit
//!
//! Local tooling for a statically hosted site edited through the Beacon
//! in-page editor.
//!
//! ## Overview
//!
//! `beacon` bundles two small utilities:
//!
//! - **`beacon serve`**: a development HTTP server for the site directory. Every
//!   HTML page it serves carries a floating Publish button; clicking it stages,
//!   commits and pushes the working tree with git so the hosting provider can
//!   redeploy.
//! - **`beacon export`**: downloads the page revision history from the REST
//!   backend and writes a human-readable Markdown digest plus a JSON snapshot of
//!   the newest revision.
//!
//! ## Architecture
//!
//! - Configuration and platform paths ([`config`])
//! - Version control through the git CLI ([`scm`])
//! - The dev server, widget injection and publishing ([`serve`])
//! - History download and rendering ([`export`])
//! - Command handlers and interactive setup ([`handlers`], [`onboarding`])
//! - Console and file logging ([`logger`])

/// Configuration file handling and platform configuration directories.
///
/// Settings live in `config.toml` under the platform config directory
/// (XDG on Linux, Application Support on macOS, AppData on Windows) and
/// can be overridden per run from the command line or the environment.
pub mod config;

/// Revision history exporter.
///
/// Fetches every stored page revision, newest first, and renders the
/// Markdown backup and the JSON snapshot of the current state.
pub mod export;

/// Subcommand handlers used by the `beacon` binary.
pub mod handlers;

/// Logging to the console and to `beacon.log` in the config directory.
pub mod logger;

/// Interactive first-time setup.
pub mod onboarding;

/// Version control abstraction.
///
/// The [`scm::Repository`] trait covers the status, stage, commit and push
/// steps publishing needs; [`scm::GitScm`] implements it on top of the
/// `git` command line.
pub mod scm;

/// Local development server with the Publish widget.
pub mod serve;
