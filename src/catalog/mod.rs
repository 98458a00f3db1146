//! Cortex catalog models
//!
//! API-side data types for every resource family the provider manages, plus
//! the descriptor codec used to read and write catalog entities and
//! scorecards.
//!
//! # Module Structure
//!
//! - [`entity`] - Catalog entities and their descriptor representation
//! - [`owner`] - Entity owners (email, group, Slack)
//! - [`git`] - Git provider configuration
//! - [`integrations`] - Optional third-party integration blocks
//! - [`descriptor`] - `x-cortex-*` YAML descriptor codec
//! - [`scorecard`], [`team`], [`department`], [`resource_definition`],
//!   [`custom_data`] - remaining API families

pub mod custom_data;
pub mod department;
pub mod descriptor;
pub mod entity;
pub mod git;
pub mod integrations;
pub mod owner;
pub mod resource_definition;
pub mod scorecard;
pub mod team;

/// Whether an optional block carries any configuration.
///
/// Blocks that are not enabled are written to Terraform state as null
/// objects and are left out of descriptors entirely.
pub trait Enabled {
    fn enabled(&self) -> bool;
}

impl<T: Enabled> Enabled for Option<T> {
    fn enabled(&self) -> bool {
        self.as_ref().is_some_and(Enabled::enabled)
    }
}

impl<T> Enabled for Vec<T> {
    fn enabled(&self) -> bool {
        !self.is_empty()
    }
}
