use anyhow::Result;
use mg_config::properties::render_properties;
use std::path::Path;

use super::load_spec;

/// Print a properties file listing every declared variable.
pub fn properties(spec_path: &Path) -> Result<()> {
    let spec = load_spec(spec_path)?;
    print!("{}", render_properties(&spec));
    Ok(())
}
