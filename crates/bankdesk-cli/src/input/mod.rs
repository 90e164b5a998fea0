//! Where subcommand parameters come from when they are not given as flags.

pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Parameters from `--input <file.json>` when given, else from JSON piped on
/// stdin. `None` means the caller should build them from flags.
pub fn file_or_stdin<T: DeserializeOwned>(path: Option<&str>) -> CliResult<Option<T>> {
    match path {
        Some(path) => file::read_json(path).map(Some),
        None => stdin::read_stdin(),
    }
}
