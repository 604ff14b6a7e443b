//! Rendering of payloads for display.

use mg_core::{Error, OutputFormat, Result};
use mg_generator::Payload;
use serde_json::Value;

/// Metadata assigned by the server, never part of a rendered manifest.
const TRANSIENT_METADATA: &[&str] = &[
    "resourceVersion",
    "uid",
    "creationTimestamp",
    "generation",
    "managedFields",
    "selfLink",
];

/// Body of a payload without status and server-assigned metadata.
pub fn strip_transient(payload: &Payload) -> Value {
    let mut body = payload.body().clone();
    if let Some(object) = body.as_object_mut() {
        object.remove("status");
        if let Some(metadata) = object.get_mut("metadata").and_then(Value::as_object_mut) {
            for key in TRANSIENT_METADATA {
                metadata.remove(*key);
            }
        }
    }
    body
}

/// Render a payload as a standalone document.
pub fn render(payload: &Payload, format: OutputFormat) -> Result<String> {
    let body = strip_transient(payload);
    match format {
        OutputFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(&body).map_err(|e| Error::Serialization(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            let out = serde_yaml::to_string(&body).map_err(|e| Error::Serialization(e.to_string()))?;
            Ok(format!("---\n{}", out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mg_generator::ResourceKind;
    use serde_json::json;

    fn payload() -> Payload {
        Payload::new(
            ResourceKind::Service,
            "ordersv2",
            json!({
                "metadata": { "name": "ordersv2", "resourceVersion": "17", "uid": "abc" },
                "spec": { "type": "ClusterIP" },
                "status": { "loadBalancer": {} }
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_strip_transient() {
        let body = strip_transient(&payload());
        assert!(body.get("status").is_none());
        assert_eq!(body["metadata"], json!({ "name": "ordersv2" }));
        assert_eq!(body["kind"], "Service");
    }

    #[test]
    fn test_render_json() {
        let out = render(&payload(), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["spec"]["type"], "ClusterIP");
        assert!(!out.contains("resourceVersion"));
    }

    #[test]
    fn test_render_yaml() {
        let out = render(&payload(), OutputFormat::Yaml).unwrap();
        assert!(out.starts_with("---\n"));
        assert!(out.contains("kind: Service"));
        assert!(out.contains("type: ClusterIP"));
        assert!(!out.contains("status"));
    }
}
