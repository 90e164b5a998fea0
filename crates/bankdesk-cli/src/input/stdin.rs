use serde::de::DeserializeOwned;
use std::io::{self, Read};

use super::CliResult;

/// Deserialise piped JSON into the subcommand's input type.
/// An interactive terminal or an empty pipe yields `None`.
pub fn read_stdin<T: DeserializeOwned>() -> CliResult<Option<T>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    log::debug!("reading {} bytes of JSON from stdin", trimmed.len());
    let parsed = serde_json::from_str(trimmed).map_err(|e| format!("Invalid JSON on stdin: {e}"))?;
    Ok(Some(parsed))
}
