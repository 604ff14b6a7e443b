//! CLI command implementations.

pub mod create;
pub mod dev;
pub mod generate;
pub mod inject;
pub mod inspect;

use anyhow::{Context, Result};
use mg_config::{UserConfig, load_overrides};
use mg_core::image::ImageRef;
use mg_core::{ComponentSpec, Overrides, RuntimeParams};
use mg_deployer::{KubeStore, Reconciler, ResourceStore};
use mg_generator::buildconfig::builder_image;
use mg_generator::{ComponentGenerator, ImageInfo};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

use crate::flags::CommonFlags;

pub fn load_spec(path: &Path) -> Result<ComponentSpec> {
    ComponentSpec::from_file(path)
        .with_context(|| format!("Failed to read component spec: {}", path.display()))
}

/// Everything a generating command works with: spec, overrides, parameters
/// and, unless running dry, a cluster connection.
pub struct Session {
    spec: ComponentSpec,
    overrides: Overrides,
    params: RuntimeParams,
    store: Option<KubeStore>,
    build_image: Option<ImageInfo>,
    run_image: Option<ImageInfo>,
}

impl Session {
    pub async fn open(spec_path: &Path, flags: CommonFlags, user: &UserConfig) -> Result<Self> {
        let spec = load_spec(spec_path)?;
        let overrides = load_overrides(flags.cvfile.as_deref(), &flags.cvars)
            .context("Failed to load variable overrides")?;
        let params = flags.into_params(user);

        let mut session = Self {
            spec,
            overrides,
            params,
            store: None,
            build_image: None,
            run_image: None,
        };

        if !session.params.dry_run {
            let store = KubeStore::new(&session.params.namespace)
                .await
                .context("Failed to connect to cluster")?;
            session.params.namespace = store.namespace().to_string();
            session.build_image = match builder_image(&session.spec) {
                Ok(image) => fetch_image_info(&store, &image).await,
                Err(e) => {
                    debug!(error = %e, "No usable builder image");
                    None
                }
            };
            if let Ok(image) = ImageRef::parse(&session.spec.spec.base_run_image) {
                session.run_image = fetch_image_info(&store, &image).await;
            }
            session.store = Some(store);
        }

        Ok(session)
    }

    pub fn generator(&self) -> ComponentGenerator<'_> {
        let mut generator = ComponentGenerator::new(&self.spec, &self.overrides, &self.params);
        if let Some(info) = &self.build_image {
            generator = generator.with_build_image(info.clone());
        }
        if let Some(info) = &self.run_image {
            generator = generator.with_run_image(info.clone());
        }
        generator
    }

    /// Hand the cluster connection over to a reconciler.
    pub fn reconciler(&mut self) -> Result<Reconciler> {
        let store = self
            .store
            .take()
            .map(|s| Box::new(s) as Box<dyn ResourceStore>);
        let reconciler = Reconciler::new(store, &self.params);

        match &self.params.output_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(reconciler.with_sink(Box::new(file)))
            }
            None => Ok(reconciler),
        }
    }
}

/// Image metadata is optional: generation falls back to defaults without it.
async fn fetch_image_info(store: &KubeStore, image: &ImageRef) -> Option<ImageInfo> {
    match store.image_info(image).await {
        Ok(info) => info,
        Err(e) => {
            warn!(image = %image, error = %e, "Could not read image metadata");
            None
        }
    }
}
