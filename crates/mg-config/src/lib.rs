//! Configuration inputs for mg.
//!
//! This crate handles:
//! - The user config file (`~/.config/mg/config.kdl`)
//! - Variable overrides from `key=value` pairs and properties files
//! - Rendering properties files from a component spec

pub mod error;
pub mod overrides;
pub mod properties;
pub mod system;

pub use error::{ConfigError, ConfigResult};
pub use overrides::{load_overrides, parse_pair, parse_pairs};
pub use system::{UserConfig, load_user_config, parse_user_config};
