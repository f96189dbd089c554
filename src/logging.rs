//! Log file setup
//!
//! The terminal UI owns stdout, so logs go to a file. The filter comes from
//! `HACKTERM_LOG` (EnvFilter syntax) and defaults to `info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HACKTERM_LOG";

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("hackterm").join("hackterm.log"))
}

/// Install the global subscriber writing to `path`.
///
/// Returns the file in use, or `None` when it could not be opened, in which
/// case logging stays disabled.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let path = path.map(Path::to_path_buf).or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    // A subscriber may already be set (e.g. in tests); keep that one
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;

    tracing::info!("hackterm {} starting", env!("CARGO_PKG_VERSION"));
    Some(path)
}
