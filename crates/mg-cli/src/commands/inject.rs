//! Editing a component spec file in place.

use anyhow::{Context, Result};
use mg_core::ComponentSpec;
use mg_core::version::parse_semantic;
use std::path::Path;
use tracing::info;

use super::load_spec;

fn store(spec: &ComponentSpec, path: &Path) -> Result<()> {
    spec.to_file(path)
        .with_context(|| format!("Failed to write component spec: {}", path.display()))
}

/// Set an annotation, replacing any existing value for the key.
pub fn annotation(spec_path: &Path, key: &str, value: &str) -> Result<()> {
    let mut spec = load_spec(spec_path)?;
    spec.metadata
        .annotations
        .insert(key.to_string(), value.to_string());
    store(&spec, spec_path)?;
    info!(name = %spec.name(), key, "Annotation set");
    Ok(())
}

/// Set the declared version without checking its form.
pub fn version(spec_path: &Path, version: &str) -> Result<()> {
    let mut spec = load_spec(spec_path)?;
    spec.spec.version = version.to_string();
    store(&spec, spec_path)?;
    info!(name = %spec.name(), version, "Version set");
    Ok(())
}

/// Set the declared version, which must be a semantic version.
pub fn semver(spec_path: &Path, version: &str) -> Result<()> {
    let parsed = parse_semantic(version)?;
    let mut spec = load_spec(spec_path)?;
    spec.spec.version = parsed.to_string();
    store(&spec, spec_path)?;
    info!(name = %spec.name(), version = %parsed, "Version set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ORDERS: &str = r#"{
        "kind": "MetaGraf",
        "metadata": { "name": "orders", "annotations": { "owner": "checkout" } },
        "spec": { "version": "2.3.1", "type": "service" }
    }"#;

    fn spec_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ORDERS.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_annotation() {
        let file = spec_file();
        annotation(file.path(), "owner", "payments").unwrap();
        annotation(file.path(), "tier", "backend").unwrap();

        let spec = ComponentSpec::from_file(file.path()).unwrap();
        assert_eq!(spec.metadata.annotations["owner"], "payments");
        assert_eq!(spec.metadata.annotations["tier"], "backend");
        assert_eq!(spec.version(), "2.3.1");
    }

    #[test]
    fn test_version_accepts_any_form() {
        let file = spec_file();
        version(file.path(), "latest").unwrap();

        let spec = ComponentSpec::from_file(file.path()).unwrap();
        assert_eq!(spec.version(), "latest");
        assert_eq!(spec.name(), "orders");
    }

    #[test]
    fn test_semver() {
        let file = spec_file();
        semver(file.path(), "3.0.0-rc.1").unwrap();
        assert_eq!(
            ComponentSpec::from_file(file.path()).unwrap().version(),
            "3.0.0-rc.1"
        );
    }

    #[test]
    fn test_semver_rejects_and_leaves_file_alone() {
        let file = spec_file();
        for bad in ["", "3.0", "v3.0.0"] {
            let err = semver(file.path(), bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<mg_core::Error>(),
                Some(mg_core::Error::InvalidInput(_))
            ));
        }
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), ORDERS);
    }

    #[test]
    fn test_missing_spec() {
        let dir = tempfile::tempdir().unwrap();
        assert!(annotation(&dir.path().join("absent.json"), "k", "v").is_err());
    }
}
