//! Build source selection.
//!
//! | base run image | repository | build image | source |
//! |----------------|------------|-------------|--------|
//! | yes            | yes        | any         | binary |
//! | no             | any        | yes         | git    |
//! | otherwise      |            |             | none   |

use crate::spec::ComponentSpec;

/// Input of a build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSource {
    /// The artifact is uploaded when the build is triggered.
    Binary,
    /// The build fetches a source repository.
    Git(GitSource),
    /// Nothing qualifies; the build pipeline carries no source.
    None,
}

impl BuildSource {
    pub fn is_none(&self) -> bool {
        matches!(self, BuildSource::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub uri: String,
    pub reference: String,
    /// Secret granting access to a private repository.
    pub source_secret: Option<String>,
}

/// Choose the build source for a component.
///
/// `ref_override` replaces the declared branch for repository builds when non-empty.
pub fn select_build_source(spec: &ComponentSpec, ref_override: &str) -> BuildSource {
    let s = &spec.spec;

    if !s.base_run_image.is_empty() && !s.repository.is_empty() {
        BuildSource::Binary
    } else if s.base_run_image.is_empty() && !s.build_image.is_empty() {
        let reference = if ref_override.is_empty() {
            s.branch.clone()
        } else {
            ref_override.to_string()
        };
        BuildSource::Git(GitSource {
            uri: s.repository.clone(),
            reference,
            source_secret: (!s.rep_sec_ref.is_empty()).then(|| s.rep_sec_ref.clone()),
        })
    } else {
        BuildSource::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Spec;

    fn spec(base_run_image: &str, repository: &str, build_image: &str) -> ComponentSpec {
        ComponentSpec {
            spec: Spec {
                base_run_image: base_run_image.to_string(),
                repository: repository.to_string(),
                build_image: build_image.to_string(),
                branch: "main".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_binary_source() {
        let s = spec("openshift/jre:17", "https://git/orders.git", "");
        assert_eq!(select_build_source(&s, ""), BuildSource::Binary);
    }

    #[test]
    fn test_binary_wins_over_build_image() {
        let s = spec("openshift/jre:17", "https://git/orders.git", "openshift/maven:3");
        assert_eq!(select_build_source(&s, "feature"), BuildSource::Binary);
    }

    #[test]
    fn test_git_source_uses_branch() {
        let s = spec("", "https://git/orders.git", "openshift/maven:3");
        assert_eq!(
            select_build_source(&s, ""),
            BuildSource::Git(GitSource {
                uri: "https://git/orders.git".to_string(),
                reference: "main".to_string(),
                source_secret: None,
            })
        );
    }

    #[test]
    fn test_git_source_ref_override_and_secret() {
        let mut s = spec("", "https://git/orders.git", "openshift/maven:3");
        s.spec.rep_sec_ref = "git-creds".to_string();

        match select_build_source(&s, "release-2") {
            BuildSource::Git(git) => {
                assert_eq!(git.reference, "release-2");
                assert_eq!(git.source_secret.as_deref(), Some("git-creds"));
            }
            other => panic!("expected git source, got {other:?}"),
        }
    }

    #[test]
    fn test_no_source() {
        assert!(select_build_source(&spec("", "https://git/orders.git", ""), "").is_none());
        assert!(select_build_source(&spec("openshift/jre:17", "", "openshift/maven:3"), "").is_none());
        assert!(select_build_source(&spec("", "", ""), "").is_none());
    }
}
