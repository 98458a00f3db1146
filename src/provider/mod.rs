//! Terraform provider for the Cortex catalog
//!
//! # Module Structure
//!
//! - [`root`] - Provider configuration and the resource/data source registry
//! - [`resource`] - `Resource` / `DataSource` traits and request types
//! - [`resources`] - Managed resources (`cortex_*`)
//! - [`data_sources`] - Read-only lookups
//! - [`schema`] - Attribute and block schema with a builder
//! - [`plan`] - Defaults, validators and plan modifiers
//! - [`value`] - JSON value decoding and conversion helpers
//! - [`diagnostics`] - Error and warning accumulation

pub mod data_sources;
pub mod diagnostics;
pub mod plan;
pub mod resource;
pub mod resources;
pub mod root;
pub mod schema;
pub mod value;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use root::CortexProvider;
