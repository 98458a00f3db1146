//! Resource and data source traits
//!
//! The lifecycle mirrors the Terraform plugin framework: the provider hands
//! each resource the shared client in `configure`, then drives CRUD calls
//! with JSON-encoded plan and state values.

use super::diagnostics::Diagnostics;
use super::schema::Schema;
use crate::cortex::CortexClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct CreateRequest {
    pub planned_state: Value,
    pub config: Value,
}

pub struct ReadRequest {
    pub current_state: Value,
}

pub struct UpdateRequest {
    pub prior_state: Value,
    pub planned_state: Value,
    pub config: Value,
}

pub struct DeleteRequest {
    pub prior_state: Value,
}

pub struct ImportStateRequest {
    /// User-supplied import identifier
    pub id: String,
}

pub struct ReadDataSourceRequest {
    pub config: Value,
}

/// Result of an operation that produces state.
///
/// `state: None` without error diagnostics means the object no longer
/// exists and should be removed from state.
#[derive(Debug, Default)]
pub struct StateResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl StateResponse {
    pub fn state(state: Option<Value>, diagnostics: Diagnostics) -> Self {
        Self { state, diagnostics }
    }

    /// Failed operation; `diagnostics` should carry an error
    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    pub fn removed() -> Self {
        Self::default()
    }

    /// Import of an identifier the API doesn't know
    pub fn import_missing(what: &str, id: &str, mut diagnostics: Diagnostics) -> Self {
        diagnostics.error(
            "Cannot import non-existent remote object",
            format!("{} {} does not exist", what, id),
        );
        Self::failed(diagnostics)
    }
}

#[derive(Debug, Default)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}

#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `cortex_team`. Matches the provider's registry key.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Receive the client built from provider configuration
    fn configure(&mut self, client: Arc<CortexClient>);

    async fn create(&self, request: CreateRequest) -> StateResponse;

    /// Returns no state when the remote object is gone
    async fn read(&self, request: ReadRequest) -> StateResponse;

    async fn update(&self, request: UpdateRequest) -> StateResponse;

    async fn delete(&self, request: DeleteRequest) -> DeleteResponse;

    /// Fetch state for an existing object by its import identifier
    async fn import_state(&self, request: ImportStateRequest) -> StateResponse;
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn configure(&mut self, client: Arc<CortexClient>);

    async fn read(&self, request: ReadDataSourceRequest) -> StateResponse;
}

/// Holds the client between `configure` and the CRUD calls
#[derive(Debug, Clone, Default)]
pub struct ClientSlot(Option<Arc<CortexClient>>);

impl ClientSlot {
    pub fn set(&mut self, client: Arc<CortexClient>) {
        self.0 = Some(client);
    }

    /// The configured client, or an error diagnostic when there is none
    pub fn get(&self, diags: &mut Diagnostics) -> Option<&CortexClient> {
        if self.0.is_none() {
            diags.error(
                "Unconfigured Cortex client",
                "Expected a configured client. Please report this issue to the provider developers.",
            );
        }
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_slot_reports_error() {
        let slot = ClientSlot::default();
        let mut diags = Diagnostics::new();
        assert!(slot.get(&mut diags).is_none());
        assert!(diags.has_errors());
    }

    #[test]
    fn test_removed_response_has_no_diagnostics() {
        let response = StateResponse::removed();
        assert!(response.state.is_none());
        assert!(response.diagnostics.is_empty());
    }
}
