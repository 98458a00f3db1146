//! `cortex_catalog_entity_openapi`

use crate::cortex::openapi::OpenApiSpec;
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{
    id_attribute, AttributeBuilder, PlanModifier, Schema, SchemaBuilder, Validator,
};
use crate::provider::value::{decode, encode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_catalog_entity_openapi";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApiResourceModel {
    pub id: Option<String>,
    pub entity_tag: String,
    pub spec: String,
}

/// The API may hand the document back re-serialized. Both JSON and YAML
/// parse as YAML, so compare parsed documents.
fn same_document(a: &str, b: &str) -> bool {
    match (
        serde_yaml::from_str::<serde_yaml::Value>(a),
        serde_yaml::from_str::<serde_yaml::Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl OpenApiResourceModel {
    pub fn from_api_model(tag: &str, spec: &OpenApiSpec, prior: Option<&Self>) -> Self {
        let spec = match prior {
            Some(prior) if prior.spec == spec.spec || same_document(&prior.spec, &spec.spec) => {
                prior.spec.clone()
            }
            _ => spec.spec.clone(),
        };
        Self {
            id: Some(tag.to_string()),
            entity_tag: tag.to_string(),
            spec,
        }
    }
}

pub fn openapi_schema() -> Schema {
    SchemaBuilder::new()
        .description("OpenAPI document attached to a catalog entity")
        .attribute(id_attribute("Same as entity_tag"))
        .attribute(
            AttributeBuilder::string("entity_tag")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("spec")
                .description("OpenAPI document, JSON or YAML")
                .required()
                .validator(Validator::NonEmpty)
                .build(),
        )
        .build()
}

#[derive(Debug, Default)]
pub struct OpenApiResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<OpenApiSpec>,
    tag: &str,
    prior: Option<&OpenApiResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(spec) => {
            tracing::info!("{} OpenAPI spec for {}", action, tag);
            let state = encode(&OpenApiResourceModel::from_api_model(tag, &spec, prior), &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} OpenAPI spec", action), &e);
            StateResponse::failed(diags)
        }
    }
}

impl OpenApiResource {
    async fn upsert(&self, planned_state: &serde_json::Value, action: &str) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<OpenApiResourceModel>(planned_state, "plan", &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.openapi().upsert(&plan.entity_tag, &plan.spec).await;
        respond(result, &plan.entity_tag, Some(&plan), action, diags)
    }
}

#[async_trait]
impl Resource for OpenApiResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        openapi_schema()
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn create(&self, request: CreateRequest) -> StateResponse {
        self.upsert(&request.planned_state, "create").await
    }

    async fn read(&self, request: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(state) = decode::<OpenApiResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.openapi().get(&state.entity_tag).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    "OpenAPI spec for {} no longer exists, removing from state",
                    state.entity_tag
                );
                StateResponse::removed()
            }
            result => respond(result, &state.entity_tag, Some(&state), "read", diags),
        }
    }

    async fn update(&self, request: UpdateRequest) -> StateResponse {
        self.upsert(&request.planned_state, "update").await
    }

    async fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return DeleteResponse { diagnostics: diags };
        };
        let Some(state) = decode::<OpenApiResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.openapi().delete(&state.entity_tag).await {
            Ok(()) => tracing::info!("deleted OpenAPI spec for {}", state.entity_tag),
            Err(e) if e.is_not_found() => {
                tracing::info!("OpenAPI spec for {} already gone", state.entity_tag)
            }
            Err(e) => diags.api_error("delete OpenAPI spec", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.openapi().get(&request.id).await {
            Err(e) if e.is_not_found() => {
                StateResponse::import_missing("OpenAPI spec for", &request.id, diags)
            }
            result => respond(result, &request.id, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformatted_document_keeps_prior_text() {
        let prior = OpenApiResourceModel {
            id: None,
            entity_tag: "svc".to_string(),
            spec: "openapi: 3.0.1\ninfo:\n  title: svc\n".to_string(),
        };
        let returned = OpenApiSpec {
            spec: r#"{"openapi":"3.0.1","info":{"title":"svc"}}"#.to_string(),
        };
        let state = OpenApiResourceModel::from_api_model("svc", &returned, Some(&prior));
        assert_eq!(state.spec, prior.spec);
        assert_eq!(state.id.as_deref(), Some("svc"));
    }

    #[test]
    fn test_changed_document_replaces_prior_text() {
        let prior = OpenApiResourceModel {
            id: None,
            entity_tag: "svc".to_string(),
            spec: "openapi: 3.0.1\n".to_string(),
        };
        let returned = OpenApiSpec {
            spec: "openapi: 3.1.0\n".to_string(),
        };
        let state = OpenApiResourceModel::from_api_model("svc", &returned, Some(&prior));
        assert_eq!(state.spec, returned.spec);
    }
}
