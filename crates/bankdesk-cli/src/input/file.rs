use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::CliResult;

/// Read an `--input` or `--catalog` file as text.
pub fn read_text(path: &str) -> CliResult<String> {
    let resolved = resolve_path(path)?;
    log::debug!("reading {}", resolved.display());
    fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e).into())
}

/// Read a JSON `--input` file into the subcommand's input type.
pub fn read_json<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let contents = read_text(path)?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse '{path}': {e}").into())
}

/// Relative paths resolve against the working directory; the target must be a regular file.
fn resolve_path(path: &str) -> CliResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        let reason = if resolved.exists() { "Not a file" } else { "File not found" };
        return Err(format!("{reason}: {}", resolved.display()).into());
    }
    Ok(resolved)
}
