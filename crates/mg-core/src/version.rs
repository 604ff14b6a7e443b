//! Declared component versions.

use semver::Version;
use std::fmt;

use crate::{Error, Result};

/// Result of interpreting a declared version string.
///
/// Versions that are not valid semantic versions are kept verbatim; naming
/// falls back to the unversioned form for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionInfo {
    Semantic(Version),
    Raw(String),
}

impl VersionInfo {
    pub fn parse(version: &str) -> Self {
        match Version::parse(version) {
            Ok(v) => Self::Semantic(v),
            Err(_) => Self::Raw(version.to_string()),
        }
    }

    /// Major version, if the declared version is semantic.
    pub fn major(&self) -> Option<u64> {
        match self {
            Self::Semantic(v) => Some(v.major),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semantic(v) => write!(f, "{}", v),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Parse a version that must be semantic.
pub fn parse_semantic(version: &str) -> Result<Version> {
    if version.is_empty() {
        return Err(Error::InvalidInput("version must not be empty".to_string()));
    }
    Version::parse(version)
        .map_err(|e| Error::InvalidInput(format!("{:?} is not a semantic version: {}", version, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_version() {
        let v = VersionInfo::parse("2.3.1");
        assert_eq!(v.major(), Some(2));
    }

    #[test]
    fn test_prerelease_is_semantic() {
        let v = VersionInfo::parse("1.0.0-rc.1");
        assert_eq!(v.major(), Some(1));
    }

    #[test]
    fn test_raw_versions() {
        for raw in ["", "2.3", "v1.2.3", "latest"] {
            assert_eq!(VersionInfo::parse(raw), VersionInfo::Raw(raw.to_string()));
        }
    }

    #[test]
    fn test_display_keeps_declared_form() {
        assert_eq!(VersionInfo::parse("1.0.0-rc.1").to_string(), "1.0.0-rc.1");
        assert_eq!(VersionInfo::parse("latest").to_string(), "latest");
    }

    #[test]
    fn test_parse_semantic() {
        assert_eq!(parse_semantic("3.1.4").unwrap().minor, 1);
        assert!(matches!(parse_semantic(""), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_semantic("3.1"), Err(Error::InvalidInput(_))));
    }
}
