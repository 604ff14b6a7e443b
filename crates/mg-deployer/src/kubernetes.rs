//! Kubernetes/OpenShift backed resource store.

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, DynamicObject, PostParams};
use kube::discovery::ApiResource;
use kube::Client;
use mg_core::image::ImageRef;
use mg_core::{Error, Result};
use mg_generator::{ImageInfo, Payload, ResourceKind, ResourceRef};
use serde_json::Value;
use tracing::{debug, info};

use crate::store::{RemoteState, ResourceStore, StoreError};

/// Store talking to the cluster API.
pub struct KubeStore {
    client: Client,
    namespace: String,
}

impl KubeStore {
    /// Connect using the ambient kubeconfig or in-cluster config. An empty
    /// namespace selects the client's default namespace.
    pub async fn new(namespace: &str) -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(Self::with_client(client, namespace))
    }

    pub fn with_client(client: Client, namespace: &str) -> Self {
        let namespace = if namespace.is_empty() {
            client.default_namespace().to_string()
        } else {
            namespace.to_string()
        };
        info!(namespace = %namespace, "Using namespace");
        Self { client, namespace }
    }

    fn api(&self, kind: ResourceKind) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), &self.namespace, &api_resource(kind))
    }

    /// Environment and exposed ports of an image, read from its image stream
    /// tag. `None` when the tag does not exist.
    pub async fn image_info(&self, image: &ImageRef) -> Result<Option<ImageInfo>> {
        let ar = ApiResource {
            group: "image.openshift.io".to_string(),
            version: "v1".to_string(),
            api_version: "image.openshift.io/v1".to_string(),
            kind: "ImageStreamTag".to_string(),
            plural: "imagestreamtags".to_string(),
        };
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &image.namespace, &ar);

        let tag = match api.get_opt(&image.stream_tag()).await {
            Ok(Some(tag)) => tag,
            Ok(None) => {
                debug!(image = %image, "Image stream tag not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::Remote {
                    action: "get",
                    kind: ar.kind,
                    name: image.stream_tag(),
                    namespace: image.namespace.clone(),
                    message: e.to_string(),
                });
            }
        };

        Ok(Some(image_info_from_tag(&tag.data)))
    }
}

/// API coordinates of a generated kind.
pub fn api_resource(kind: ResourceKind) -> ApiResource {
    ApiResource {
        group: kind.group().to_string(),
        version: kind.version().to_string(),
        api_version: kind.api_version(),
        kind: kind.kind().to_string(),
        plural: kind.plural().to_string(),
    }
}

fn image_info_from_tag(data: &Value) -> ImageInfo {
    let config = data.pointer("/image/dockerImageMetadata/Config");

    let env = config
        .and_then(|c| c.get("Env"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let exposed_ports = config
        .and_then(|c| c.get("ExposedPorts"))
        .and_then(Value::as_object)
        .map(|ports| ports.keys().cloned().collect())
        .unwrap_or_default();

    ImageInfo { env, exposed_ports }
}

fn to_object(payload: &Payload) -> std::result::Result<DynamicObject, StoreError> {
    serde_json::from_value(payload.body().clone()).map_err(|e| StoreError::Other(e.to_string()))
}

#[async_trait]
impl ResourceStore for KubeStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn lookup(&self, target: &ResourceRef) -> std::result::Result<RemoteState, StoreError> {
        let existing = self.api(target.kind).get_opt(&target.name).await?;
        Ok(match existing {
            Some(obj) => RemoteState::Present {
                resource_version: obj.metadata.resource_version,
            },
            None => RemoteState::Absent,
        })
    }

    async fn create(&self, payload: &Payload) -> std::result::Result<(), StoreError> {
        let obj = to_object(payload)?;
        self.api(payload.kind())
            .create(&PostParams::default(), &obj)
            .await?;
        Ok(())
    }

    async fn replace(&self, payload: &Payload) -> std::result::Result<(), StoreError> {
        let obj = to_object(payload)?;
        self.api(payload.kind())
            .replace(payload.name(), &PostParams::default(), &obj)
            .await?;
        Ok(())
    }

    async fn delete(&self, target: &ResourceRef) -> std::result::Result<(), StoreError> {
        self.api(target.kind)
            .delete(&target.name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_resource() {
        let ar = api_resource(ResourceKind::BuildConfig);
        assert_eq!(ar.group, "build.openshift.io");
        assert_eq!(ar.api_version, "build.openshift.io/v1");
        assert_eq!(ar.plural, "buildconfigs");

        let ar = api_resource(ResourceKind::Secret);
        assert_eq!(ar.group, "");
        assert_eq!(ar.api_version, "v1");
    }

    #[test]
    fn test_image_info_from_tag() {
        let data = json!({
            "image": {
                "dockerImageMetadata": {
                    "Config": {
                        "Env": ["PATH=/usr/bin", "JAVA_VERSION=17"],
                        "ExposedPorts": { "8080/tcp": {}, "8443/tcp": {} }
                    }
                }
            }
        });

        let info = image_info_from_tag(&data);
        assert_eq!(info.env, vec!["PATH=/usr/bin", "JAVA_VERSION=17"]);
        assert_eq!(info.exposed_ports, vec!["8080/tcp", "8443/tcp"]);
    }

    #[test]
    fn test_image_info_without_metadata() {
        assert_eq!(image_info_from_tag(&json!({})), ImageInfo::default());
    }
}
