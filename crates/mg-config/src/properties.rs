//! Properties file generation.

use mg_core::ComponentSpec;
use mg_core::spec::EnvironmentVar;
use std::fmt::Write;

/// Render a properties file listing every overridable variable of a component.
///
/// Required variables are written as `KEY=default`; optional ones are
/// commented out so they only take effect when edited.
pub fn render_properties(spec: &ComponentSpec) -> String {
    let mut out = String::new();
    let env = &spec.spec.environment;

    write_section(&mut out, "local", env.local.iter().filter(|v| !v.is_reference()));
    write_section(&mut out, "build", env.build.iter());

    out
}

fn write_section<'a>(
    out: &mut String,
    scope: &str,
    vars: impl Iterator<Item = &'a EnvironmentVar>,
) {
    let mut vars = vars.peekable();
    if vars.peek().is_none() {
        return;
    }

    let _ = writeln!(out, "# {}", scope);
    for var in vars {
        if var.required {
            let _ = writeln!(out, "{}={}", var.name, var.default);
        } else {
            let _ = writeln!(out, "#{}={}", var.name, var.default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::parse_properties;

    #[test]
    fn test_render_and_read_back() {
        let spec = ComponentSpec::from_json(
            r#"{
                "metadata": { "name": "orders" },
                "spec": {
                    "environment": {
                        "local": [
                            { "name": "DB_HOST", "required": true, "default": "localhost" },
                            { "name": "LOG_LEVEL", "default": "info" },
                            { "name": "CONFIG", "envFrom": "orders-config" }
                        ],
                        "build": [ { "name": "MAVEN_OPTS", "required": true } ]
                    }
                }
            }"#,
        )
        .unwrap();

        let rendered = render_properties(&spec);
        assert_eq!(
            rendered,
            "# local\nDB_HOST=localhost\n#LOG_LEVEL=info\n# build\nMAVEN_OPTS=\n"
        );

        let overrides = parse_properties(&rendered, "rendered").unwrap();
        assert_eq!(overrides.get("DB_HOST"), Some("localhost"));
        assert_eq!(overrides.get("MAVEN_OPTS"), Some(""));
        assert!(!overrides.contains("LOG_LEVEL"));
    }

    #[test]
    fn test_render_empty_spec() {
        assert_eq!(render_properties(&ComponentSpec::default()), "");
    }
}
