use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

/// Reads a text file, treating a missing or unreadable file as empty.
pub fn read_text_or_empty(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).replace('\u{0000}', ""),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "file missing; treating as empty");
            String::new()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read file; treating as empty");
            String::new()
        }
    }
}

/// Removes a file. Returns `false` if it was already gone.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}
