//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! The terminal belongs to the UI, so log lines go to a file in the app
//! directory. `APPROVALS_TUI_LOG` overrides the configured level with any
//! `EnvFilter` directive, e.g. `APPROVALS_TUI_LOG=approvals_tui=debug`.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "APPROVALS_TUI_LOG";

/// Install the global subscriber writing to `path`.
///
/// Call once at startup, before the terminal enters raw mode.
pub fn init_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

/// Filter from `APPROVALS_TUI_LOG`, else `level` for this crate and `warn`
/// for everything else
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        let level = normalize_level(level);
        EnvFilter::new(format!("warn,approvals_tui={}", level))
    })
}

/// Map a configured level to a valid directive; unknown values become `info`
fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        "off" => "off",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), "debug");
        assert_eq!(normalize_level(" warning "), "warn");
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(""), "info");
    }
}
