//! Append-only run log.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber that appends timestamped events to `log_file`.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Print the log file, or a notice when no run has written one yet.
pub fn show_log(log_file: &Path) -> Result<()> {
    match read_log(log_file)? {
        Some(contents) => {
            println!("\n--- {} Contents ---", log_file.display());
            println!("{}", contents);
        }
        None => println!(
            "Log file '{}' not found. Run the analysis first.",
            log_file.display()
        ),
    }
    Ok(())
}

fn read_log(log_file: &Path) -> Result<Option<String>> {
    match fs::read_to_string(log_file) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read log file {}", log_file.display())),
    }
}
