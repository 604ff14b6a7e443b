//! Mapping of generated payloads onto remote actions.
//!
//! Apply looks a resource up and then creates or replaces it. Create and
//! replace failures are fatal and returned as errors. Delete is idempotent:
//! an absent resource is skipped, and a failing delete is reported as an
//! outcome so that a teardown can continue with the next resource.

use mg_core::{Error, OutputFormat, Result, RuntimeParams};
use mg_generator::{Payload, ResourceRef};
use std::io::Write;
use tracing::{info, warn};

use crate::output::render;
use crate::store::{RemoteState, ResourceStore, StoreError};

/// Result of reconciling one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    /// The resource exists and is never overwritten.
    Kept,
    Deleted,
    /// Nothing to delete.
    Skipped,
    DeleteFailed(String),
    /// Dry run, nothing was sent.
    DryRun,
}

pub struct Reconciler {
    store: Option<Box<dyn ResourceStore>>,
    dry_run: bool,
    output: bool,
    format: OutputFormat,
    sink: Box<dyn Write + Send>,
}

impl Reconciler {
    /// Create a reconciler writing rendered payloads to stdout.
    ///
    /// A store is only required when not running dry.
    pub fn new(store: Option<Box<dyn ResourceStore>>, params: &RuntimeParams) -> Self {
        Self {
            store,
            dry_run: params.dry_run,
            output: params.output,
            format: params.format,
            sink: Box::new(std::io::stdout()),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.sink = sink;
        self
    }

    fn store(&self) -> Result<&dyn ResourceStore> {
        self.store
            .as_deref()
            .ok_or_else(|| Error::Internal("no remote store configured".to_string()))
    }

    fn namespace(&self) -> String {
        self.store
            .as_deref()
            .map(|s| s.namespace().to_string())
            .unwrap_or_default()
    }

    fn render(&mut self, payload: &Payload) -> Result<()> {
        let doc = render(payload, self.format)?;
        self.sink.write_all(doc.as_bytes())?;
        self.sink.flush()?;
        Ok(())
    }

    /// Create or replace a resource.
    pub async fn apply(&mut self, mut payload: Payload) -> Result<Outcome> {
        if self.output {
            self.render(&payload)?;
        }
        if self.dry_run {
            return Ok(Outcome::DryRun);
        }

        let target = payload.target();
        let namespace = self.namespace();
        let store = self.store()?;

        let state = store
            .lookup(&target)
            .await
            .map_err(|e| remote_error("get", &target, &namespace, e))?;

        match state {
            RemoteState::Absent => {
                store
                    .create(&payload)
                    .await
                    .map_err(|e| remote_error("create", &target, &namespace, e))?;
                info!(kind = %target.kind, name = %target.name, namespace = %namespace, "Created");
                Ok(Outcome::Created)
            }
            RemoteState::Present { .. } if !target.kind.replaces_existing() => {
                info!(kind = %target.kind, name = %target.name, "Exists, keeping");
                Ok(Outcome::Kept)
            }
            RemoteState::Present { resource_version } => {
                if let Some(version) = resource_version {
                    payload.set_resource_version(&version);
                }
                store
                    .replace(&payload)
                    .await
                    .map_err(|e| remote_error("update", &target, &namespace, e))?;
                info!(kind = %target.kind, name = %target.name, namespace = %namespace, "Updated");
                Ok(Outcome::Updated)
            }
        }
    }

    /// Apply payloads in order, stopping at the first failure. Resources
    /// applied before the failure are left in place.
    pub async fn apply_all(&mut self, payloads: Vec<Payload>) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(payloads.len());
        for payload in payloads {
            outcomes.push(self.apply(payload).await?);
        }
        Ok(outcomes)
    }

    /// Delete a resource if it exists.
    pub async fn delete(&mut self, target: &ResourceRef) -> Outcome {
        if self.dry_run {
            info!(kind = %target.kind, name = %target.name, "Dry run, not deleting");
            return Outcome::DryRun;
        }

        let store = match self.store() {
            Ok(store) => store,
            Err(e) => return Outcome::DeleteFailed(e.to_string()),
        };

        match store.lookup(target).await {
            Ok(RemoteState::Absent) => {
                info!(kind = %target.kind, name = %target.name, "Not found, skipping delete");
                return Outcome::Skipped;
            }
            Ok(RemoteState::Present { .. }) => {}
            Err(e) => {
                warn!(kind = %target.kind, name = %target.name, error = %e, "Lookup failed");
                return Outcome::DeleteFailed(e.to_string());
            }
        }

        match store.delete(target).await {
            Ok(()) => {
                info!(kind = %target.kind, name = %target.name, "Deleted");
                Outcome::Deleted
            }
            Err(StoreError::NotFound) => {
                info!(kind = %target.kind, name = %target.name, "Already gone");
                Outcome::Skipped
            }
            Err(e) => {
                warn!(kind = %target.kind, name = %target.name, error = %e, "Delete failed");
                Outcome::DeleteFailed(e.to_string())
            }
        }
    }

    /// Delete resources in order, continuing past failures.
    pub async fn teardown(&mut self, targets: &[ResourceRef]) -> Vec<(ResourceRef, Outcome)> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = self.delete(target).await;
            outcomes.push((target.clone(), outcome));
        }
        outcomes
    }
}

fn remote_error(action: &'static str, target: &ResourceRef, namespace: &str, e: StoreError) -> Error {
    Error::Remote {
        action,
        kind: target.kind.to_string(),
        name: target.name.clone(),
        namespace: namespace.to_string(),
        message: e.to_string(),
    }
}
