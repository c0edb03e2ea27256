//! URL opening via the platform opener command.

use std::process::Command;

use mycmd_core::error::Result;
use mycmd_core::opener::UrlOpener;

/// Opens URLs with `xdg-open` / `open` / `start` depending on platform.
/// The child process is fire-and-forget.
#[derive(Debug, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        let spawned = Command::new("open").arg(url).spawn();
        #[cfg(target_os = "windows")]
        let spawned = Command::new("cmd").args(["/C", "start", "", url]).spawn();
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let spawned = Command::new("xdg-open").arg(url).spawn();

        spawned?;
        Ok(())
    }
}
