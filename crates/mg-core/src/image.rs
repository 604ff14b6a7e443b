//! Container image references.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::{Error, Result};

pub const DEFAULT_TAG: &str = "latest";

// [host/]namespace/image[:tag]
static IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<host>[A-Za-z0-9.-]+(?::[0-9]+)?)/)?(?P<namespace>[a-z0-9][a-z0-9._-]*)/(?P<image>[a-z0-9][a-z0-9._-]*)(?::(?P<tag>[A-Za-z0-9_][A-Za-z0-9._-]{0,127}))?$",
    )
    .unwrap()
});

/// A parsed image reference pointing at an image stream in a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub host: Option<String>,
    pub namespace: String,
    pub image: String,
    pub tag: String,
}

impl ImageRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let caps = IMAGE_REGEX
            .captures(reference.trim())
            .ok_or_else(|| Error::InvalidImageReference(reference.to_string()))?;

        Ok(Self {
            host: caps.name("host").map(|m| m.as_str().to_string()),
            namespace: caps["namespace"].to_string(),
            image: caps["image"].to_string(),
            tag: caps
                .name("tag")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_TAG.to_string()),
        })
    }

    /// The `image:tag` form used to address an image stream tag.
    pub fn stream_tag(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(host) = &self.host {
            write!(f, "{}/", host)?;
        }
        write!(f, "{}/{}:{}", self.namespace, self.image, self.tag)
    }
}
