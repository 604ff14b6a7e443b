use mg_core::{Identity, RuntimeParams};

use crate::manifest::ResourceKind;
use crate::object_meta;
use crate::openshift::{ImageStream, ImageStreamSpec};

/// Generate the image stream a component's builds push to.
pub fn generate_imagestream(identity: &Identity, params: &RuntimeParams) -> ImageStream {
    let kind = ResourceKind::ImageStream;
    ImageStream {
        api_version: kind.api_version(),
        kind: kind.kind().to_string(),
        metadata: object_meta(identity.name(), identity, params),
        spec: ImageStreamSpec::default(),
    }
}
