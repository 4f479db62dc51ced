// src/config/mod.rs

//! Graph descriptions read from TOML.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a file from disk.
//! - [`validate`] checks references, spans and acyclicity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, LayoutSection, RawConfigFile, UnitConfig};
pub use validate::topological_order;
