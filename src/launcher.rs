//! Application launching
//!
//! A fixed catalog maps spoken names to launch identifiers; launching is a
//! fire-and-forget platform process start.

use std::process::Command;

use crate::command::Launcher;
use crate::{Error, Result};

/// Known applications: spoken name -> launch identifier
const APP_CATALOG: &[(&str, &str)] = &[
    ("notepad", "notepad"),
    ("calculator", "calculator"),
    ("browser", "chrome"),
    ("chrome", "chrome"),
    ("firefox", "firefox"),
    ("explorer", "explorer"),
    ("file manager", "explorer"),
    ("music", "spotify"),
    ("spotify", "spotify"),
];

/// Resolve a spoken application name to its launch identifier
///
/// Lookup is case-insensitive; unknown names resolve to `None` and nothing
/// is launched for them.
#[must_use]
pub fn resolve(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    APP_CATALOG
        .iter()
        .find(|(spoken, _)| *spoken == lower)
        .map(|(_, identifier)| *identifier)
}

/// Launches applications on the local desktop
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopLauncher;

impl DesktopLauncher {
    /// Create a desktop launcher
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for DesktopLauncher {
    fn launch(&self, identifier: &str) -> Result<()> {
        tracing::info!(identifier, "launching application");

        let result = spawn(identifier);

        match result {
            Ok(child) => {
                tracing::debug!(pid = child.id(), "application started");
                Ok(())
            }
            Err(e) => Err(Error::Launch(e.to_string())),
        }
    }
}

#[cfg(target_os = "windows")]
fn spawn(identifier: &str) -> std::io::Result<std::process::Child> {
    Command::new("cmd").args(["/C", "start", "", identifier]).spawn()
}

#[cfg(target_os = "macos")]
fn spawn(identifier: &str) -> std::io::Result<std::process::Child> {
    Command::new("open").args(["-a", identifier]).spawn()
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn spawn(identifier: &str) -> std::io::Result<std::process::Child> {
    Command::new("xdg-open").arg(identifier).spawn()
}
