use anyhow::Result;
use mg_core::Identity;
use mg_core::inspect::inspect;
use std::path::Path;

use super::load_spec;

/// Print the config maps and secrets a component expects to exist.
pub fn run(spec_path: &Path, version_override: Option<&str>) -> Result<()> {
    let spec = load_spec(spec_path)?;
    let identity = Identity::resolve(&spec, version_override.unwrap_or_default());

    let requirements = inspect(&spec, &identity);
    println!("{} requires:", identity.display_name());
    if requirements.is_empty() {
        println!("  nothing");
    }
    for requirement in requirements {
        println!("  {}", requirement);
    }
    Ok(())
}
