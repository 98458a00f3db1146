//! `cortex_resource_definition`

use crate::catalog::resource_definition::{ResourceDefinition, ResourceDefinitionSource};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{
    id_attribute, AttributeBuilder, PlanModifier, Schema, SchemaBuilder, Validator,
};
use crate::provider::value::{decode, encode, json_string, parse_json, ConversionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_resource_definition";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinitionResourceModel {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    /// JSON schema, encoded as a string
    pub schema: String,
    pub source: Option<String>,
}

impl ResourceDefinitionResourceModel {
    pub fn to_api_model(&self) -> ConversionResult<ResourceDefinition> {
        Ok(ResourceDefinition {
            kind: self.kind.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            schema: parse_json("schema", &self.schema)?,
            source: ResourceDefinitionSource::Custom,
        })
    }

    /// `prior` keeps the user's formatting of `schema` when equivalent
    pub fn from_api_model(definition: &ResourceDefinition, prior: Option<&Self>) -> Self {
        Self {
            id: Some(definition.kind.clone()),
            kind: definition.kind.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            schema: json_string(&definition.schema, prior.map(|p| p.schema.as_str())),
            source: Some(definition.source.to_string()),
        }
    }
}

pub fn resource_definition_schema() -> Schema {
    SchemaBuilder::new()
        .description("Custom catalog entity type")
        .attribute(id_attribute("Same as type"))
        .attribute(
            AttributeBuilder::string("type")
                .description("Entity type identifier, e.g. s3-bucket")
                .required()
                .validator(Validator::NonEmpty)
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(
            AttributeBuilder::string("schema")
                .description("JSON schema entities of this type must satisfy")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("source")
                .description("CORTEX or CUSTOM")
                .computed()
                .plan_modifier(PlanModifier::UseStateForUnknown)
                .build(),
        )
        .build()
}

#[derive(Debug, Default)]
pub struct ResourceDefinitionResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<ResourceDefinition>,
    prior: Option<&ResourceDefinitionResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(definition) => {
            tracing::info!("{} resource definition {}", action, definition.kind);
            let model = ResourceDefinitionResourceModel::from_api_model(&definition, prior);
            let state = encode(&model, &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} resource definition", action), &e);
            StateResponse::failed(diags)
        }
    }
}

/// Decode a plan and convert it, reporting either failure
fn planned(
    value: &serde_json::Value,
    diags: &mut Diagnostics,
) -> Option<(ResourceDefinitionResourceModel, ResourceDefinition)> {
    let plan = decode::<ResourceDefinitionResourceModel>(value, "plan", diags)?;
    match plan.to_api_model() {
        Ok(definition) => Some((plan, definition)),
        Err(e) => {
            e.report(diags);
            None
        }
    }
}

#[async_trait]
impl Resource for ResourceDefinitionResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        resource_definition_schema()
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn create(&self, request: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some((plan, definition)) = planned(&request.planned_state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.resource_definitions().create(&definition).await;
        respond(result, Some(&plan), "create", diags)
    }

    async fn read(&self, request: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(state) =
            decode::<ResourceDefinitionResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.resource_definitions().get(&state.kind).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    "resource definition {} no longer exists, removing from state",
                    state.kind
                );
                StateResponse::removed()
            }
            result => respond(result, Some(&state), "read", diags),
        }
    }

    async fn update(&self, request: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some((plan, definition)) = planned(&request.planned_state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.resource_definitions().update(&definition).await;
        respond(result, Some(&plan), "update", diags)
    }

    async fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return DeleteResponse { diagnostics: diags };
        };
        let Some(state) =
            decode::<ResourceDefinitionResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.resource_definitions().delete(&state.kind).await {
            Ok(()) => tracing::info!("deleted resource definition {}", state.kind),
            Err(e) if e.is_not_found() => {
                tracing::info!("resource definition {} already gone", state.kind)
            }
            Err(e) => diags.api_error("delete resource definition", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.resource_definitions().get(&request.id).await {
            Err(e) if e.is_not_found() => {
                StateResponse::import_missing("resource definition", &request.id, diags)
            }
            result => respond(result, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(schema: &str) -> ResourceDefinitionResourceModel {
        ResourceDefinitionResourceModel {
            id: None,
            kind: "s3-bucket".to_string(),
            name: "S3 Bucket".to_string(),
            description: None,
            schema: schema.to_string(),
            source: None,
        }
    }

    #[test]
    fn test_schema_string_is_parsed() {
        let definition = model(r#"{"type": "object"}"#).to_api_model().unwrap();
        assert_eq!(definition.schema, json!({"type": "object"}));
        assert_eq!(definition.source, ResourceDefinitionSource::Custom);
    }

    #[test]
    fn test_invalid_schema_json_names_attribute() {
        let err = model("{not json").to_api_model().unwrap_err();
        assert_eq!(err.attribute(), "schema");
    }

    #[test]
    fn test_prior_schema_formatting_is_kept() {
        let prior = model("{ \"required\": [], \"type\": \"object\" }");
        let definition = prior.to_api_model().unwrap();
        let state = ResourceDefinitionResourceModel::from_api_model(&definition, Some(&prior));
        assert_eq!(state.schema, prior.schema);
        assert_eq!(state.id.as_deref(), Some("s3-bucket"));
        assert_eq!(state.source.as_deref(), Some("CUSTOM"));
    }
}
