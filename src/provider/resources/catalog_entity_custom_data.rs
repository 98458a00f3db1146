//! `cortex_catalog_entity_custom_data`
//!
//! One key of custom data on a catalog entity. The id and import
//! identifier are `tag:key`.

use crate::catalog::custom_data::{CustomData, UpsertCustomDataRequest};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{id_attribute, AttributeBuilder, PlanModifier, Schema, SchemaBuilder};
use crate::provider::value::{decode, encode, json_string, parse_json, ConversionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_catalog_entity_custom_data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomDataResourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub key: String,
    /// JSON-encoded value
    pub value: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub date_updated: Option<String>,
}

/// Split a `tag:key` identifier. Keys may contain `:`, tags may not.
pub fn parse_id(id: &str) -> Option<(&str, &str)> {
    id.split_once(':')
        .filter(|(tag, key)| !tag.is_empty() && !key.is_empty())
}

pub fn format_id(tag: &str, key: &str) -> String {
    format!("{}:{}", tag, key)
}

impl CustomDataResourceModel {
    pub fn to_api_model(&self) -> ConversionResult<UpsertCustomDataRequest> {
        Ok(UpsertCustomDataRequest {
            key: self.key.clone(),
            value: parse_json("value", &self.value)?,
            description: self.description.clone(),
            force: false,
        })
    }

    pub fn from_api_model(tag: &str, data: &CustomData, prior: Option<&Self>) -> Self {
        Self {
            id: Some(format_id(tag, &data.key)),
            tag: tag.to_string(),
            key: data.key.clone(),
            value: json_string(&data.value, prior.map(|p| p.value.as_str())),
            description: data.description.clone(),
            source: data.source.clone(),
            date_updated: data.date_updated.map(|d| d.to_rfc3339()),
        }
    }
}

pub fn custom_data_schema() -> Schema {
    SchemaBuilder::new()
        .description("Custom data key on a catalog entity")
        .attribute(id_attribute("tag:key"))
        .attribute(
            AttributeBuilder::string("tag")
                .description("Tag of the catalog entity")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("key")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("value")
                .description("JSON-encoded value, e.g. jsonencode({...})")
                .required()
                .build(),
        )
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(AttributeBuilder::string("source").computed().build())
        .attribute(AttributeBuilder::string("date_updated").computed().build())
        .build()
}

#[derive(Debug, Default)]
pub struct CustomDataResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<CustomData>,
    tag: &str,
    prior: Option<&CustomDataResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(data) => {
            tracing::info!("{} custom data {} on {}", action, data.key, tag);
            let model = CustomDataResourceModel::from_api_model(tag, &data, prior);
            let state = encode(&model, &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} custom data", action), &e);
            StateResponse::failed(diags)
        }
    }
}

impl CustomDataResource {
    async fn upsert(&self, planned_state: &serde_json::Value, action: &str) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<CustomDataResourceModel>(planned_state, "plan", &mut diags) else {
            return StateResponse::failed(diags);
        };
        let body = match plan.to_api_model() {
            Ok(body) => body,
            Err(e) => {
                e.report(&mut diags);
                return StateResponse::failed(diags);
            }
        };

        let result = client.custom_data().upsert(&plan.tag, &body).await;
        respond(result, &plan.tag, Some(&plan), action, diags)
    }
}

#[async_trait]
impl Resource for CustomDataResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        custom_data_schema()
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
        let Some(state) =
            decode::<CustomDataResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.custom_data().get(&state.tag, &state.key).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    "custom data {} on {} no longer exists, removing from state",
                    state.key,
                    state.tag
                );
                StateResponse::removed()
            }
            result => respond(result, &state.tag, Some(&state), "read", diags),
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
        let Some(state) =
            decode::<CustomDataResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.custom_data().delete(&state.tag, &state.key).await {
            Ok(()) => tracing::info!("deleted custom data {} on {}", state.key, state.tag),
            Err(e) if e.is_not_found() => {
                tracing::info!("custom data {} on {} already gone", state.key, state.tag)
            }
            Err(e) => diags.api_error("delete custom data", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some((tag, key)) = parse_id(&request.id) else {
            diags.error(
                "Unexpected Import Identifier",
                format!("Expected an identifier of the form tag:key, got {:?}", request.id),
            );
            return StateResponse::failed(diags);
        };
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.custom_data().get(tag, key).await {
            Err(e) if e.is_not_found() => {
                StateResponse::import_missing("custom data", &request.id, diags)
            }
            result => respond(result, tag, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("svc:cost-center"), Some(("svc", "cost-center")));
        assert_eq!(parse_id("svc:a:b"), Some(("svc", "a:b")));
        assert_eq!(parse_id("svc"), None);
        assert_eq!(parse_id(":key"), None);
        assert_eq!(parse_id("svc:"), None);
    }

    #[test]
    fn test_value_round_trip_keeps_prior_formatting() {
        let plan = CustomDataResourceModel {
            tag: "svc".to_string(),
            key: "owners".to_string(),
            value: "[ \"a\", \"b\" ]".to_string(),
            ..Default::default()
        };
        let body = plan.to_api_model().unwrap();
        assert_eq!(body.value, json!(["a", "b"]));
        assert!(!body.force);

        let data = CustomData {
            key: body.key.clone(),
            value: body.value.clone(),
            source: Some("API".to_string()),
            ..Default::default()
        };
        let state = CustomDataResourceModel::from_api_model("svc", &data, Some(&plan));
        assert_eq!(state.value, plan.value);
        assert_eq!(state.id.as_deref(), Some("svc:owners"));
        assert_eq!(state.source.as_deref(), Some("API"));
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_id() {
        let resource = CustomDataResource::default();
        let response = resource
            .import_state(ImportStateRequest {
                id: "no-separator".to_string(),
            })
            .await;
        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
    }
}
