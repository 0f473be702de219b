//! Opening rendered files with the platform's default viewer.

use std::{io, path::Path, process::Command};

use log::debug;

/// Launches the default viewer for `path` without waiting for it.
pub fn open(path: &Path) -> io::Result<()> {
    let mut command = viewer_command(path);
    debug!(command:? = command; "Launching viewer");
    command.spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    // The empty argument is the window title expected by `start`.
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
