//! Core domain types for the mg component tooling.
//!
//! This crate contains:
//! - The component spec data model
//! - Identity resolution (canonical resource names)
//! - Environment variable resolution and overrides
//! - Build source selection
//! - Image references and runtime parameters

pub mod build_source;
pub mod env;
pub mod error;
pub mod identity;
pub mod image;
pub mod inspect;
pub mod overrides;
pub mod params;
pub mod spec;
pub mod version;

pub use error::{Error, Result};
pub use identity::Identity;
pub use overrides::Overrides;
pub use params::{OutputFormat, RuntimeParams};
pub use spec::ComponentSpec;
