use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

/// Environment variable that overrides `logging.level`.
pub const LOG_ENV: &str = "CADENZA_LOG";

/// Install the global subscriber writing to the log file. The terminal
/// belongs to the TUI, so nothing is written to stdout or stderr once this
/// succeeds. Returns the log path in use, if any.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings
        .file
        .as_ref()
        .map(PathBuf::from)
        .or_else(config::default_log_path)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("cadenza: cannot create log dir {}: {e}", parent.display());
            return None;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&settings.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    match result {
        Ok(()) => Some(path),
        Err(e) => {
            eprintln!("cadenza: logging disabled: {e}");
            None
        }
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
