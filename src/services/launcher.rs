//! Process launching for applications and the default browser

use std::process::{Command, Stdio};

use super::{AppLauncher, BrowserOpener};
use crate::config::AppEntry;
use crate::{Error, Result};

/// Launches desktop applications and URLs through the host OS
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl AppLauncher for SystemLauncher {
    fn launch(&self, app: &AppEntry) -> Result<()> {
        let failure = |reason: String| Error::LaunchFailure {
            target: app.alias.clone(),
            reason,
        };

        let mut parts = app.launch.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| failure("empty launch command".to_string()))?;
        let resolved = which::which(program).map_err(|e| failure(format!("{program}: {e}")))?;

        spawn_detached(Command::new(resolved).args(parts)).map_err(|e| failure(e.to_string()))?;

        tracing::info!(app = %app.alias, launch = %app.launch, "application launched");
        Ok(())
    }
}

impl BrowserOpener for SystemLauncher {
    fn open(&self, url: &str) -> Result<()> {
        spawn_detached(&mut opener_command(url)).map_err(|e| Error::SiteOpenFailure {
            target: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(url, "opened in browser");
        Ok(())
    }
}

/// Platform command that hands a URL to the default browser
fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // Empty title argument, otherwise `start` treats a quoted URL as one
        cmd.args(["/C", "start", "", url]);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Start a process without waiting on it or inheriting our terminal
fn spawn_detached(cmd: &mut Command) -> std::io::Result<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
}
