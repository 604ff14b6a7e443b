//! Variable overrides from the command line and properties files.
//!
//! Overrides come from two places:
//! - `--cvars KEY=value,...` pairs
//! - `--cvfile path` properties files with one `KEY=value` per line
//!
//! Command-line pairs win over file entries.

use mg_core::Overrides;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::{ConfigError, ConfigResult};

static KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap());

/// Parse a single `key=value` pair. The value may contain further `=` signs.
///
/// Surrounding whitespace is stripped from both key and value.
pub fn parse_pair(pair: &str) -> ConfigResult<(String, String)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(pair.to_string()))?;
    let key = key.trim();
    if !KEY_REGEX.is_match(key) {
        return Err(ConfigError::InvalidOverride(pair.to_string()));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse a list of `key=value` pairs into an override set.
pub fn parse_pairs(pairs: &[String]) -> ConfigResult<Overrides> {
    pairs.iter().map(|p| parse_pair(p)).collect()
}

/// Parse properties file content.
///
/// Blank lines and lines starting with `#` or `!` are ignored.
pub fn parse_properties(content: &str, origin: &str) -> ConfigResult<Overrides> {
    let mut overrides = Overrides::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = parse_pair(line).map_err(|_| ConfigError::Properties {
            path: origin.to_string(),
            line: idx + 1,
            message: format!("expected key=value, found {:?}", line),
        })?;
        overrides.insert(key, value);
    }

    Ok(overrides)
}

/// Read a properties file.
pub fn read_properties(path: &Path) -> ConfigResult<Overrides> {
    let content = std::fs::read_to_string(path)?;
    parse_properties(&content, &path.display().to_string())
}

/// Build the override set for a run from an optional properties file and
/// command-line pairs.
pub fn load_overrides(cvfile: Option<&Path>, cvars: &[String]) -> ConfigResult<Overrides> {
    let mut overrides = match cvfile {
        Some(path) => read_properties(path)?,
        None => Overrides::new(),
    };

    let pairs = parse_pairs(cvars)?;
    overrides.extend(pairs.iter());

    debug!(count = overrides.len(), "Loaded variable overrides");
    Ok(overrides)
}
