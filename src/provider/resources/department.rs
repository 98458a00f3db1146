//! `cortex_department`

use super::{member_block, MemberModel};
use crate::catalog::department::{Department, DepartmentMember};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{id_attribute, AttributeBuilder, PlanModifier, Schema, SchemaBuilder};
use crate::provider::value::{decode, encode, null_as_default};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_department";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentResourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<MemberModel>,
}

impl DepartmentResourceModel {
    pub fn to_api_model(&self) -> Department {
        Department {
            department_tag: self.tag.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            members: self
                .members
                .iter()
                .map(|m| DepartmentMember {
                    name: m.name.clone(),
                    email: m.email.clone(),
                    description: m.description.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(department: &Department) -> Self {
        Self {
            id: Some(department.department_tag.clone()),
            tag: department.department_tag.clone(),
            name: department.name.clone(),
            description: department.description.clone(),
            members: department
                .members
                .iter()
                .map(|m| MemberModel {
                    name: m.name.clone(),
                    email: m.email.clone(),
                    description: m.description.clone(),
                })
                .collect(),
        }
    }
}

pub fn department_schema() -> Schema {
    SchemaBuilder::new()
        .description("Cortex department")
        .attribute(id_attribute("Same as tag"))
        .attribute(
            AttributeBuilder::string("tag")
                .description("Unique identifier for the department")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .list("members", member_block())
        .build()
}

#[derive(Debug, Default)]
pub struct DepartmentResource {
    client: ClientSlot,
}

/// Turn an API result into state
fn respond(result: ApiResult<Department>, action: &str, mut diags: Diagnostics) -> StateResponse {
    match result {
        Ok(department) => {
            tracing::info!("{} department {}", action, department.department_tag);
            let state = encode(&DepartmentResourceModel::from_api_model(&department), &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} department", action), &e);
            StateResponse::failed(diags)
        }
    }
}

#[async_trait]
impl Resource for DepartmentResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        department_schema()
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn create(&self, request: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<DepartmentResourceModel>(&request.planned_state, "plan", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        let result = client.departments().create(&plan.to_api_model()).await;
        respond(result, "create", diags)
    }

    async fn read(&self, request: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(state) = decode::<DepartmentResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.departments().get(&state.tag).await {
            Err(e) if e.is_not_found() => {
                tracing::info!("department {} no longer exists, removing from state", state.tag);
                StateResponse::removed()
            }
            result => respond(result, "read", diags),
        }
    }

    async fn update(&self, request: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<DepartmentResourceModel>(&request.planned_state, "plan", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        let result = client.departments().update(&plan.to_api_model()).await;
        respond(result, "update", diags)
    }

    async fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return DeleteResponse { diagnostics: diags };
        };
        let Some(state) = decode::<DepartmentResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.departments().delete(&state.tag).await {
            Ok(()) => tracing::info!("deleted department {}", state.tag),
            Err(e) if e.is_not_found() => tracing::info!("department {} already gone", state.tag),
            Err(e) => diags.api_error("delete department", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.departments().get(&request.id).await {
            Err(e) if e.is_not_found() => StateResponse::import_missing("department", &request.id, diags),
            result => respond(result, "import", diags),
        }
    }
}
