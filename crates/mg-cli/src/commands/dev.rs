//! Bringing a component up and down in a development namespace.

use anyhow::Result;
use mg_config::UserConfig;
use mg_deployer::Outcome;
use std::path::Path;
use tracing::{info, warn};

use super::Session;
use crate::flags::CommonFlags;

/// Create or update every resource of a component.
pub async fn up(spec_path: &Path, flags: CommonFlags, user: &UserConfig) -> Result<()> {
    let mut session = Session::open(spec_path, flags, user).await?;
    let generator = session.generator();
    let name = generator.identity().to_string();
    let payloads = generator.up()?;

    let outcomes = session.reconciler()?.apply_all(payloads).await?;
    info!(name = %name, resources = outcomes.len(), "Component is up");
    Ok(())
}

/// Remove the resources of a component. Failing deletes are logged and
/// skipped.
pub async fn down(spec_path: &Path, flags: CommonFlags, user: &UserConfig) -> Result<()> {
    let mut session = Session::open(spec_path, flags, user).await?;
    let generator = session.generator();
    let name = generator.identity().to_string();
    let targets = generator.teardown();

    let outcomes = session.reconciler()?.teardown(&targets).await;
    let failed = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, Outcome::DeleteFailed(_)))
        .count();
    if failed > 0 {
        warn!(name = %name, failed, "Some resources could not be deleted");
    } else {
        info!(name = %name, "Component is down");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const ORDERS: &str = r#"{
        "kind": "MetaGraf",
        "metadata": { "name": "orders" },
        "spec": {
            "version": "2.3.1",
            "type": "service",
            "buildImage": "openshift/java:8",
            "repository": "https://git.example.com/orders.git",
            "branch": "main"
        }
    }"#;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        flags: CommonFlags,
    }

    fn flags(args: &[&str]) -> CommonFlags {
        let mut argv = vec!["mg"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).unwrap().flags
    }

    fn spec_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ORDERS.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_dry_run_renders_into_output_file() {
        let spec = spec_file();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("orders.yaml");
        let out_arg = out.to_str().unwrap();

        let flags = flags(&["--dryrun", "--format", "yaml", "--output-file", out_arg]);
        up(spec.path(), flags, &UserConfig::default()).await.unwrap();

        let rendered = std::fs::read_to_string(&out).unwrap();
        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("kind: Deployment"));
        assert!(rendered.contains("name: ordersv2"));
    }

    #[tokio::test]
    async fn test_unwritable_output_file() {
        let spec = spec_file();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("orders.json");

        let flags = flags(&["--dryrun", "--output-file", out.to_str().unwrap()]);
        let err = up(spec.path(), flags, &UserConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }
}
