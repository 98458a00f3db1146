//! Cortex REST API client
//!
//! # Module Structure
//!
//! - [`client`] - Shared client handing out one sub-client per API family
//! - [`http`] - Request/response plumbing and debug logging
//! - [`routes`] - Route table keyed by [`routes::Domain`]
//! - [`error`] - Status code translation
//! - [`entities`], [`teams`], [`departments`], [`scorecards`],
//!   [`resource_definitions`], [`custom_data`], [`openapi`] - typed endpoints
//!
//! # Example
//!
//! ```ignore
//! use terraform_provider_cortex::cortex::client::CortexClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = CortexClient::new("https://api.getcortexapp.com", "token")?;
//!     let team = client.teams().get("platform").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod custom_data;
pub mod departments;
pub mod entities;
pub mod error;
pub mod http;
pub mod openapi;
pub mod resource_definitions;
pub mod routes;
pub mod scorecards;
pub mod teams;

pub use client::CortexClient;
pub use error::{ApiError, ApiResult};
