//! Terraform provider for the Cortex service catalog
//!
//! - [`cortex`] - REST client for the Cortex API
//! - [`catalog`] - API models and the entity descriptor codec
//! - [`provider`] - Resources, data sources and the provider root

pub mod catalog;
pub mod cortex;
pub mod provider;

/// Version injected at compile time via CORTEX_PROVIDER_VERSION (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("CORTEX_PROVIDER_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
