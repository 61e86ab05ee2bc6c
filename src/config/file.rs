//! Env-file parsing.
//!
//! One `KEY=VALUE` pair per line. Blank lines and lines starting with `#` are
//! skipped. The line is split on the first `=` and both halves are trimmed, so
//! values may themselves contain `=`. There is no quoting or escaping.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::raw::RawSettings;
use super::ConfigError;

/// Opens and parses an env file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
/// Any other open failure is an error regardless of `required`.
pub(crate) fn load_env_file(path: &Path, required: bool) -> Result<Option<RawSettings>, ConfigError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "optional env file not found, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::FileOpen {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let settings = parse_env(BufReader::new(file), path)?;
    tracing::debug!(path = %path.display(), keys = settings.len(), "loaded env file");
    Ok(Some(settings))
}

/// Parses env-file content from any buffered reader.
///
/// `path` is only used to label errors. Parsing stops at the first malformed
/// line; no partial result is returned.
pub(crate) fn parse_env<R: BufRead>(reader: R, path: &Path) -> Result<RawSettings, ConfigError> {
    let mut settings = RawSettings::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ConfigError::Scan {
            path: path.to_path_buf(),
            source: e,
        })?;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::MalformedLine {
                path: path.to_path_buf(),
                line_number: index + 1,
                line,
            });
        };

        settings.insert(key.trim(), value.trim());
    }

    Ok(settings)
}
