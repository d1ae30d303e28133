//! JSON writer for published data files

use crate::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pretty-printed JSON with a trailing newline
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Write `value` as pretty JSON to `path`, creating parent directories.
///
/// The content goes to `<path>.tmp` first and is renamed over the target,
/// so readers never observe a half-written file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let text = to_pretty_json(value)?;
    let temp_path = temp_path_for(path);
    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, path)?;

    debug!(path = %path.display(), bytes = text.len(), "Wrote JSON");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
