use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::ConfigManager;

/// Log files larger than this are rotated to `beacon.log.old`.
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Initialize the logging system
///
/// Sets up logging to both console and a log file in the config directory.
///
/// **Console logging** can be controlled via the `RUST_LOG` environment variable:
/// - `RUST_LOG=error` - Only errors
/// - `RUST_LOG=warn` - Warnings and errors
/// - `RUST_LOG=info` - Info, warnings, and errors (default)
/// - `RUST_LOG=debug` - Debug and above, including every HTTP request
/// - `RUST_LOG=trace` - Everything
///
/// **File logging** receives the milestones written through [`log_to_file`]:
/// - Linux: ~/.config/beacon-devkit/beacon.log or $XDG_CONFIG_HOME/beacon-devkit/beacon.log
/// - macOS: ~/Library/Application Support/beacon-devkit/beacon.log
/// - Windows: %APPDATA%\beacon-devkit\beacon.log
///
/// ## Examples
///
/// ```bash
/// # Log every request the dev server handles
/// RUST_LOG=debug beacon serve
///
/// # Only show errors on console
/// RUST_LOG=error beacon export
/// ```
pub fn init_logger() -> Result<()> {
    ConfigManager::ensure_config_dir()?;
    rotate_log_if_needed()?;

    let default_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(default_level)
        .target(env_logger::Target::Stdout)
        .try_init()
        .ok(); // Ignore error if logger is already initialized

    log_to_file(&format!("Logger initialized with level: {default_level:?}"))?;

    Ok(())
}

/// Append a timestamped line to the log file.
pub fn log_to_file(message: &str) -> Result<()> {
    append_to(&ConfigManager::log_file_path()?, message)
}

/// Append a timestamped line to the log file at `log_path`.
pub fn append_to(log_path: &Path, message: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;

    Ok(())
}

/// Rotate the log file if it exceeds the size limit (10MB)
pub fn rotate_log_if_needed() -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;

    if log_path.exists() && std::fs::metadata(&log_path)?.len() > MAX_LOG_SIZE {
        let old_log_path = log_path.with_extension("log.old");

        if old_log_path.exists() {
            std::fs::remove_file(&old_log_path)?;
        }

        std::fs::rename(&log_path, &old_log_path)?;

        log::info!("Log file rotated to {}", old_log_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use tempfile::TempDir;

    #[cfg(target_os = "linux")]
    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp = TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", temp.path());
        f();
        std::env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_init_logger_succeeds() {
        with_temp_config(|| {
            assert!(init_logger().is_ok());
        });
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_log_to_file() {
        with_temp_config(|| {
            ConfigManager::ensure_config_dir().unwrap();
            log_to_file("Test log message").unwrap();

            let log_path = ConfigManager::log_file_path().unwrap();
            let contents = std::fs::read_to_string(&log_path).unwrap();
            assert!(contents.contains("Test log message"));
        });
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_rotate_log_creates_backup() {
        with_temp_config(|| {
            ConfigManager::ensure_config_dir().unwrap();
            let log_path = ConfigManager::log_file_path().unwrap();
            let mut file = File::create(&log_path).unwrap();
            file.write_all(&vec![b'a'; (MAX_LOG_SIZE + 1) as usize]).unwrap();
            drop(file);

            rotate_log_if_needed().unwrap();

            assert!(log_path.with_extension("log.old").exists());
            assert!(!log_path.exists());
        });
    }
}
