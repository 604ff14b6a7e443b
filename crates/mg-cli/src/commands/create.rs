//! Creating single resource kinds.

use anyhow::Result;
use clap::ValueEnum;
use mg_config::UserConfig;
use mg_generator::ResourceKind;
use std::path::Path;
use tracing::info;

use super::Session;
use crate::flags::CommonFlags;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    #[value(name = "buildconfig", alias = "bc")]
    BuildConfig,
    #[value(name = "imagestream", alias = "is")]
    ImageStream,
    Deployment,
    #[value(alias = "svc")]
    Service,
    Route,
    #[value(name = "configmap", alias = "cm")]
    ConfigMap,
    Secret,
    #[value(name = "pdb")]
    PodDisruptionBudget,
    #[value(alias = "app")]
    Application,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::BuildConfig => ResourceKind::BuildConfig,
            KindArg::ImageStream => ResourceKind::ImageStream,
            KindArg::Deployment => ResourceKind::Deployment,
            KindArg::Service => ResourceKind::Service,
            KindArg::Route => ResourceKind::Route,
            KindArg::ConfigMap => ResourceKind::ConfigMap,
            KindArg::Secret => ResourceKind::Secret,
            KindArg::PodDisruptionBudget => ResourceKind::PodDisruptionBudget,
            KindArg::Application => ResourceKind::Application,
        }
    }
}

pub async fn create(
    kind: KindArg,
    spec_path: &Path,
    flags: CommonFlags,
    user: &UserConfig,
) -> Result<()> {
    let kind = ResourceKind::from(kind);
    let mut session = Session::open(spec_path, flags, user).await?;
    let payloads = session.generator().payloads_for(kind)?;
    if payloads.is_empty() {
        info!(kind = %kind, "Component declares nothing of this kind");
        return Ok(());
    }

    session.reconciler()?.apply_all(payloads).await?;
    Ok(())
}
