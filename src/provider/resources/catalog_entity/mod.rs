//! `cortex_catalog_entity`
//!
//! Entities are written by upserting their full descriptor and read back from
//! the descriptor endpoint. Integration blocks are null in state unless the
//! descriptor configures them.
//!
//! # Module Structure
//!
//! - [`blocks`] - owners, git, dependencies, alerts, team membership
//! - [`integrations`] - third-party integration blocks

pub mod blocks;
pub mod integrations;

use self::blocks::*;
use self::integrations::*;
use super::{link_block, LinkModel};
use crate::catalog::entity::{CatalogEntityData, DEFAULT_ENTITY_TYPE};
use crate::catalog::integrations::{OnCall, Wiz};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{
    id_attribute, AttributeBuilder, PlanModifier, Schema, SchemaBuilder, Validator,
};
use crate::provider::value::{
    block_or_null, decode, encode, json_string_opt, null_as_default, parse_json_opt,
    prior_list, ConversionError, ConversionResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_catalog_entity";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntityResourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    /// JSON-encoded definition for custom entity types
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owners: Vec<OwnerModel>,
    pub groups: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LinkModel>,
    /// JSON-encoded object of custom metadata
    pub metadata: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<DependencyModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<AlertModel>,
    pub git: Option<GitModel>,
    pub issues: Option<IssuesModel>,
    pub on_call: Option<OnCallModel>,
    pub apm: Option<ApmModel>,
    pub dashboards: Option<DashboardsModel>,
    pub slos: Option<SlosModel>,
    pub static_analysis: Option<StaticAnalysisModel>,
    pub ci_cd: Option<CiCdModel>,
    pub k8s: Option<K8sModel>,
    pub bugsnag: Option<ProjectModel>,
    pub checkmarx: Option<CheckmarxModel>,
    pub coralogix: Option<CoralogixModel>,
    pub firehydrant: Option<FireHydrantModel>,
    pub launch_darkly: Option<LaunchDarklyModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub microsoft_teams: Vec<MicrosoftTeamsModel>,
    pub rollbar: Option<ProjectModel>,
    pub sentry: Option<ProjectModel>,
    pub service_now: Option<ServiceNowModel>,
    pub slack: Option<SlackModel>,
    pub snyk: Option<SnykModel>,
    pub wiz: Option<WizModel>,
    pub team: Option<TeamBlockModel>,
    pub children: Option<Vec<String>>,
    pub parents: Option<Vec<String>>,
}

impl CatalogEntityResourceModel {
    pub fn to_api_model(&self) -> ConversionResult<CatalogEntityData> {
        let metadata = match parse_json_opt("metadata", self.metadata.as_deref())? {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(ConversionError::invalid(
                    "metadata",
                    "must be a JSON object of key/value pairs",
                ))
            }
        };

        let on_call = match &self.on_call {
            None => None,
            Some(model) => match model.targets().as_slice() {
                [] => None,
                [(provider, target)] => Some(OnCall {
                    provider: *provider,
                    id: target.id.clone(),
                    kind: target.kind.clone(),
                }),
                _ => {
                    return Err(ConversionError::invalid(
                        "on_call",
                        "only one on-call provider may be set",
                    ))
                }
            },
        };

        Ok(CatalogEntityData {
            tag: self.tag.clone(),
            title: self.name.clone(),
            description: self.description.clone(),
            entity_type: self
                .entity_type
                .clone()
                .unwrap_or_else(|| DEFAULT_ENTITY_TYPE.to_string()),
            definition: parse_json_opt("definition", self.definition.as_deref())?,
            owners: self
                .owners
                .iter()
                .map(OwnerModel::to_api_model)
                .collect::<ConversionResult<_>>()?,
            groups: self.groups.clone(),
            links: self.links.iter().map(LinkModel::to_api_model).collect(),
            metadata,
            dependencies: self
                .dependencies
                .iter()
                .map(DependencyModel::to_api_model)
                .collect::<ConversionResult<_>>()?,
            alerts: self.alerts.iter().map(AlertModel::to_api_model).collect(),
            git: match &self.git {
                Some(git) => git.to_api_model()?,
                None => None,
            },
            jira: self
                .issues
                .as_ref()
                .and_then(|i| i.jira.as_ref())
                .map(JiraModel::to_api_model),
            on_call,
            apm: self.apm.as_ref().map(ApmModel::to_api_model).unwrap_or_default(),
            dashboards: self
                .dashboards
                .as_ref()
                .map(DashboardsModel::to_api_model)
                .unwrap_or_default(),
            slos: self.slos.as_ref().map(SlosModel::to_api_model).unwrap_or_default(),
            static_analysis: self
                .static_analysis
                .as_ref()
                .map(StaticAnalysisModel::to_api_model)
                .unwrap_or_default(),
            buildkite: self
                .ci_cd
                .as_ref()
                .and_then(|c| c.buildkite.as_ref())
                .map(BuildkiteModel::to_api_model),
            k8s: self.k8s.as_ref().map(K8sModel::to_api_model).unwrap_or_default(),
            bugsnag: self.bugsnag.as_ref().map(ProjectModel::bugsnag).unwrap_or_default(),
            checkmarx: self
                .checkmarx
                .as_ref()
                .map(CheckmarxModel::to_api_model)
                .unwrap_or_default(),
            coralogix: self
                .coralogix
                .as_ref()
                .map(CoralogixModel::to_api_model)
                .unwrap_or_default(),
            firehydrant: self
                .firehydrant
                .as_ref()
                .map(FireHydrantModel::to_api_model)
                .unwrap_or_default(),
            launch_darkly: self
                .launch_darkly
                .as_ref()
                .map(LaunchDarklyModel::to_api_model)
                .unwrap_or_default(),
            microsoft_teams: self
                .microsoft_teams
                .iter()
                .map(MicrosoftTeamsModel::to_api_model)
                .collect(),
            rollbar: self.rollbar.as_ref().map(ProjectModel::rollbar).unwrap_or_default(),
            sentry: self.sentry.as_ref().map(ProjectModel::sentry).unwrap_or_default(),
            service_now: self
                .service_now
                .as_ref()
                .map(ServiceNowModel::to_api_model)
                .unwrap_or_default(),
            slack: self.slack.as_ref().map(SlackModel::to_api_model).unwrap_or_default(),
            snyk: self.snyk.as_ref().map(SnykModel::to_api_model).unwrap_or_default(),
            wiz: self
                .wiz
                .as_ref()
                .map(|w| Wiz {
                    project_ids: w.project_ids.clone(),
                })
                .unwrap_or_default(),
            team: self.team.as_ref().map(TeamBlockModel::to_api_model),
            children: self.children.clone().unwrap_or_default(),
            parents: self.parents.clone().unwrap_or_default(),
        })
    }

    /// Build state from a decoded descriptor. `prior` (the plan or the
    /// previous state) keeps JSON formatting and explicit empty lists.
    pub fn from_api_model(data: &CatalogEntityData, prior: Option<&Self>) -> Self {
        Self {
            id: Some(data.tag.clone()),
            tag: data.tag.clone(),
            name: data.title.clone(),
            description: data.description.clone(),
            entity_type: Some(data.entity_type.clone()),
            definition: json_string_opt(
                data.definition.as_ref(),
                prior.and_then(|p| p.definition.as_deref()),
            ),
            owners: data
                .owners
                .iter()
                .enumerate()
                .map(|(i, o)| OwnerModel::from_api_model(o, prior.and_then(|p| p.owners.get(i))))
                .collect(),
            groups: data.groups.clone(),
            links: data.links.iter().map(LinkModel::from_api_model).collect(),
            metadata: json_string_opt(
                data.metadata.clone().map(Value::Object).as_ref(),
                prior.and_then(|p| p.metadata.as_deref()),
            ),
            dependencies: data
                .dependencies
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    DependencyModel::from_api_model(d, prior.and_then(|p| p.dependencies.get(i)))
                })
                .collect(),
            alerts: data.alerts.iter().map(AlertModel::from_api_model).collect(),
            git: data.git.as_ref().map(GitModel::from_api_model),
            issues: data
                .jira
                .as_ref()
                .and_then(|j| block_or_null(j, JiraModel::from_api_model))
                .map(|jira| IssuesModel { jira: Some(jira) }),
            on_call: data.on_call.as_ref().map(OnCallModel::from_api_model),
            apm: block_or_null(&data.apm, ApmModel::from_api_model),
            dashboards: block_or_null(&data.dashboards, |d| DashboardsModel::from_api_model(d)),
            slos: block_or_null(&data.slos, SlosModel::from_api_model),
            static_analysis: block_or_null(&data.static_analysis, StaticAnalysisModel::from_api_model),
            ci_cd: data
                .buildkite
                .as_ref()
                .and_then(|b| {
                    let prior_buildkite = prior
                        .and_then(|p| p.ci_cd.as_ref())
                        .and_then(|c| c.buildkite.as_ref());
                    block_or_null(b, |b| BuildkiteModel::from_api_model(b, prior_buildkite))
                })
                .map(|buildkite| CiCdModel {
                    buildkite: Some(buildkite),
                }),
            k8s: block_or_null(&data.k8s, K8sModel::from_api_model),
            bugsnag: block_or_null(&data.bugsnag, |b| ProjectModel::of(&b.project)),
            checkmarx: block_or_null(&data.checkmarx, CheckmarxModel::from_api_model),
            coralogix: block_or_null(&data.coralogix, CoralogixModel::from_api_model),
            firehydrant: block_or_null(&data.firehydrant, FireHydrantModel::from_api_model),
            launch_darkly: block_or_null(&data.launch_darkly, LaunchDarklyModel::from_api_model),
            microsoft_teams: data
                .microsoft_teams
                .iter()
                .map(MicrosoftTeamsModel::from_api_model)
                .collect(),
            rollbar: block_or_null(&data.rollbar, |r| ProjectModel::of(&r.project)),
            sentry: block_or_null(&data.sentry, |s| ProjectModel::of(&s.project)),
            service_now: block_or_null(&data.service_now, ServiceNowModel::from_api_model),
            slack: block_or_null(&data.slack, SlackModel::from_api_model),
            snyk: block_or_null(&data.snyk, SnykModel::from_api_model),
            wiz: block_or_null(&data.wiz, |w| WizModel {
                project_ids: w.project_ids.clone(),
            }),
            team: data
                .team
                .as_ref()
                .and_then(|t| block_or_null(t, TeamBlockModel::from_api_model)),
            children: prior_list(&data.children, prior.map(|p| &p.children)),
            parents: prior_list(&data.parents, prior.map(|p| &p.parents)),
        }
    }
}

pub fn catalog_entity_schema() -> Schema {
    SchemaBuilder::new()
        .description("Catalog entity, managed through its descriptor")
        .attribute(id_attribute("Same as tag"))
        .attribute(
            AttributeBuilder::string("tag")
                .description("Unique identifier (x-cortex-tag)")
                .required()
                .validator(Validator::NonEmpty)
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(
            AttributeBuilder::string("type")
                .description("service, resource, domain, team or a custom type")
                .default(json!(DEFAULT_ENTITY_TYPE))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("definition")
                .description("JSON-encoded definition, for custom entity types")
                .optional()
                .build(),
        )
        .attribute(AttributeBuilder::string_list("groups").optional().build())
        .attribute(
            AttributeBuilder::string("metadata")
                .description("JSON-encoded object of custom metadata")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string_list("children")
                .description("Child entity tags, for domains")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string_list("parents")
                .description("Parent domain tags")
                .optional()
                .build(),
        )
        .list("owners", owner_block())
        .list("links", link_block())
        .list("dependencies", dependency_block())
        .list("alerts", alert_block())
        .single("git", git_block())
        .single("issues", issues_block())
        .single("on_call", on_call_block())
        .single("apm", apm_block())
        .single("dashboards", dashboards_block())
        .single("slos", slos_block())
        .single("static_analysis", static_analysis_block())
        .single("ci_cd", ci_cd_block())
        .single("k8s", k8s_block())
        .single("bugsnag", project_block())
        .single("checkmarx", checkmarx_block())
        .single("coralogix", coralogix_block())
        .single("firehydrant", firehydrant_block())
        .single("launch_darkly", launch_darkly_block())
        .list("microsoft_teams", microsoft_teams_block())
        .single("rollbar", project_block())
        .single("sentry", project_block())
        .single("service_now", service_now_block())
        .single("slack", slack_block())
        .single("snyk", snyk_block())
        .single("wiz", wiz_block())
        .single("team", team_block())
        .build()
}

#[derive(Debug, Default)]
pub struct CatalogEntityResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<CatalogEntityData>,
    prior: Option<&CatalogEntityResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(data) => {
            tracing::info!("{} catalog entity {}", action, data.tag);
            let model = CatalogEntityResourceModel::from_api_model(&data, prior);
            let state = encode(&model, &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} catalog entity", action), &e);
            StateResponse::failed(diags)
        }
    }
}

impl CatalogEntityResource {
    async fn upsert(&self, planned_state: &Value, action: &str) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<CatalogEntityResourceModel>(planned_state, "plan", &mut diags)
        else {
            return StateResponse::failed(diags);
        };
        let data = match plan.to_api_model() {
            Ok(data) => data,
            Err(e) => {
                e.report(&mut diags);
                return StateResponse::failed(diags);
            }
        };

        let entities = client.catalog_entities();
        let result = match entities.upsert(&data).await {
            Ok(response) => {
                let tag = response
                    .tag
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| data.tag.clone());
                entities.get_descriptor(&tag).await
            }
            Err(e) => Err(e),
        };
        respond(result, Some(&plan), action, diags)
    }
}

#[async_trait]
impl Resource for CatalogEntityResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        catalog_entity_schema()
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
            decode::<CatalogEntityResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.catalog_entities().get_descriptor(&state.tag).await {
            Err(e) if e.is_not_found() => {
                tracing::info!("catalog entity {} no longer exists, removing from state", state.tag);
                StateResponse::removed()
            }
            result => respond(result, Some(&state), "read", diags),
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
            decode::<CatalogEntityResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.catalog_entities().delete(&state.tag).await {
            Ok(()) => tracing::info!("deleted catalog entity {}", state.tag),
            Err(e) if e.is_not_found() => {
                tracing::info!("catalog entity {} already gone", state.tag)
            }
            Err(e) => diags.api_error("delete catalog entity", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.catalog_entities().get_descriptor(&request.id).await {
            Err(e) if e.is_not_found() => {
                StateResponse::import_missing("catalog entity", &request.id, diags)
            }
            result => respond(result, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::descriptor::{entity_from_yaml, entity_to_yaml};

    fn minimal() -> CatalogEntityResourceModel {
        CatalogEntityResourceModel {
            tag: "payments".to_string(),
            name: "Payments".to_string(),
            ..CatalogEntityResourceModel::default()
        }
    }

    #[test]
    fn test_minimal_entity_has_null_blocks() {
        let data = minimal().to_api_model().unwrap();
        assert_eq!(data.entity_type, DEFAULT_ENTITY_TYPE);

        let state = CatalogEntityResourceModel::from_api_model(&data, None);
        assert_eq!(state.id.as_deref(), Some("payments"));
        assert_eq!(state.entity_type.as_deref(), Some("service"));
        assert!(state.apm.is_none());
        assert!(state.slos.is_none());
        assert!(state.k8s.is_none());
        assert!(state.sentry.is_none());
        assert!(state.issues.is_none());
        assert!(state.team.is_none());
        assert_eq!(state.children, None);
    }

    #[test]
    fn test_metadata_must_be_an_object() {
        let model = CatalogEntityResourceModel {
            metadata: Some("[1, 2]".to_string()),
            ..minimal()
        };
        assert_eq!(model.to_api_model().unwrap_err().attribute(), "metadata");
    }

    #[test]
    fn test_two_on_call_providers_are_rejected() {
        let target = OnCallTargetModel {
            id: "x".to_string(),
            kind: "SCHEDULE".to_string(),
        };
        let model = CatalogEntityResourceModel {
            on_call: Some(OnCallModel {
                pager_duty: Some(target.clone()),
                ops_genie: Some(target),
                victor_ops: None,
            }),
            ..minimal()
        };
        assert_eq!(model.to_api_model().unwrap_err().attribute(), "on_call");
    }

    #[test]
    fn test_plan_survives_descriptor_round_trip() {
        let plan = CatalogEntityResourceModel {
            id: Some("payments".to_string()),
            description: Some(String::new()),
            entity_type: Some("service".to_string()),
            metadata: Some("{ \"tier\": 1 }".to_string()),
            groups: Some(vec!["backend".to_string()]),
            owners: vec![OwnerModel {
                kind: "email".to_string(),
                email: Some("payments@example.com".to_string()),
                ..OwnerModel::default()
            }],
            git: Some(GitModel {
                github: Some(RepositoryModel {
                    repository: "acme/payments".to_string(),
                    base_path: None,
                }),
                ..GitModel::default()
            }),
            issues: Some(IssuesModel {
                jira: Some(JiraModel {
                    projects: Some(vec!["PAY".to_string()]),
                    labels: Some(vec!["payments".to_string()]),
                    ..JiraModel::default()
                }),
            }),
            sentry: Some(ProjectModel::of("payments")),
            children: Some(vec![]),
            ..minimal()
        };

        let yaml = entity_to_yaml(&plan.to_api_model().unwrap()).unwrap();
        let decoded = entity_from_yaml(&yaml).unwrap();
        let state = CatalogEntityResourceModel::from_api_model(&decoded, Some(&plan));
        assert_eq!(state, plan);
    }
}
