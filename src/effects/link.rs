//! Opening redirect targets in the user's browser.

use std::process::{Command, Stdio};

/// Errors from opening a link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Refusing to open '{0}': only http, https and mailto links are supported")]
    UnsupportedUrl(String),

    #[error("No browser launcher available on this platform")]
    NoLauncher,

    #[error("Launcher '{tool}' failed: {message}")]
    LaunchFailed { tool: &'static str, message: String },
}

/// Something that can open a URL for the user.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), LinkError>;
}

/// Opens links with the platform launcher (`open`, `xdg-open`, `start`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }

    /// Launcher program and leading arguments for this platform.
    fn launcher() -> Option<(&'static str, &'static [&'static str])> {
        if cfg!(target_os = "macos") {
            Some(("open", &[]))
        } else if cfg!(target_os = "windows") {
            Some(("cmd", &["/C", "start", ""]))
        } else if cfg!(unix) {
            Some(("xdg-open", &[]))
        } else {
            None
        }
    }
}

/// Only web and mail links are handed to the launcher.
pub(crate) fn check_url(url: &str) -> Result<(), LinkError> {
    let lower = url.trim().to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len());
    if allowed {
        Ok(())
    } else {
        Err(LinkError::UnsupportedUrl(url.to_string()))
    }
}

impl LinkOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), LinkError> {
        check_url(url)?;
        let (tool, args) = Self::launcher().ok_or(LinkError::NoLauncher)?;

        let mut child = Command::new(tool)
            .args(args)
            .arg(url.trim())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LinkError::LaunchFailed {
                tool,
                message: e.to_string(),
            })?;

        // Some launchers stay around as long as the browser; reap off-thread
        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                tracing::debug!("{} did not exit cleanly: {}", tool, e);
            }
        });
        Ok(())
    }
}
