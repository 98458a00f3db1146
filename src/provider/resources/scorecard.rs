//! `cortex_scorecard`
//!
//! Scorecards are written as a full descriptor and read back through the
//! descriptor endpoint, so state always reflects the defaults the server
//! applies (rule weight, level rank, evaluation window).

use crate::catalog::scorecard::{
    IncludeExclude, Scorecard, ScorecardEvaluation, ScorecardFilter, ScorecardLadder,
    ScorecardLevel, ScorecardNotifications, ScorecardRule, UpsertScorecardRequest,
    DEFAULT_EVALUATION_WINDOW_HOURS, DEFAULT_RULE_WEIGHT,
};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{
    id_attribute, AttributeBuilder, Block, BlockBuilder, PlanModifier, Schema, SchemaBuilder,
};
use crate::provider::value::{block_or_null, decode, encode, null_as_default, prior_list};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_scorecard";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorecardResourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    pub draft: Option<bool>,
    pub notifications: Option<NotificationsModel>,
    pub ladder: Option<LadderModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<RuleModel>,
    pub filter: Option<FilterModel>,
    pub evaluation: Option<EvaluationModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationsModel {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LadderModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: Vec<LevelModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelModel {
    pub name: String,
    pub rank: i64,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleModel {
    pub title: String,
    pub expression: String,
    pub description: Option<String>,
    pub weight: Option<i64>,
    pub level: Option<String>,
    pub failure_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterModel {
    pub category: Option<String>,
    pub query: Option<String>,
    pub types: Option<IncludeExcludeModel>,
    pub groups: Option<IncludeExcludeModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeExcludeModel {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationModel {
    pub window: Option<i64>,
}

/// The descriptor writes absent strings as `''`. Read them back as null
/// unless the configuration had an empty string.
fn optional_text(api: Option<&str>, prior: Option<&Option<String>>) -> Option<String> {
    match api {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => match prior {
            Some(Some(p)) if p.is_empty() => Some(String::new()),
            _ => None,
        },
    }
}

impl IncludeExcludeModel {
    fn to_api_model(&self) -> IncludeExclude {
        IncludeExclude {
            include: self.include.clone().unwrap_or_default(),
            exclude: self.exclude.clone().unwrap_or_default(),
        }
    }

    fn from_api_model(api: &IncludeExclude, prior: Option<&Self>) -> Self {
        Self {
            include: prior_list(&api.include, prior.map(|p| &p.include)),
            exclude: prior_list(&api.exclude, prior.map(|p| &p.exclude)),
        }
    }
}

impl FilterModel {
    pub fn to_api_model(&self) -> ScorecardFilter {
        ScorecardFilter {
            category: self.category.clone(),
            query: self.query.clone(),
            types: self.types.as_ref().map(IncludeExcludeModel::to_api_model),
            groups: self.groups.as_ref().map(IncludeExcludeModel::to_api_model),
        }
    }

    pub fn from_api_model(filter: &ScorecardFilter, prior: Option<&Self>) -> Self {
        let prior_types = prior.and_then(|p| p.types.as_ref());
        let prior_groups = prior.and_then(|p| p.groups.as_ref());
        Self {
            category: filter.category.clone().filter(|c| !c.is_empty()),
            query: filter.query.clone().filter(|q| !q.is_empty()),
            types: filter.types.as_ref().and_then(|t| {
                block_or_null(t, |t| IncludeExcludeModel::from_api_model(t, prior_types))
            }),
            groups: filter.groups.as_ref().and_then(|g| {
                block_or_null(g, |g| IncludeExcludeModel::from_api_model(g, prior_groups))
            }),
        }
    }
}

impl ScorecardResourceModel {
    pub fn to_api_model(&self) -> Scorecard {
        Scorecard {
            tag: self.tag.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            draft: self.draft.unwrap_or(false),
            notifications: ScorecardNotifications {
                enabled: self.notifications.as_ref().is_some_and(|n| n.enabled),
            },
            ladder: ScorecardLadder {
                levels: self
                    .ladder
                    .iter()
                    .flat_map(|l| l.levels.iter())
                    .map(|l| ScorecardLevel {
                        name: l.name.clone(),
                        rank: l.rank,
                        color: l.color.clone(),
                        description: l.description.clone(),
                    })
                    .collect(),
            },
            rules: self
                .rules
                .iter()
                .map(|r| ScorecardRule {
                    title: r.title.clone(),
                    expression: r.expression.clone(),
                    description: r.description.clone(),
                    weight: r.weight.unwrap_or(DEFAULT_RULE_WEIGHT),
                    level: r.level.clone(),
                    failure_message: r.failure_message.clone(),
                })
                .collect(),
            filter: self.filter.as_ref().map(FilterModel::to_api_model),
            evaluation: ScorecardEvaluation {
                window: self
                    .evaluation
                    .as_ref()
                    .and_then(|e| e.window)
                    .unwrap_or(DEFAULT_EVALUATION_WINDOW_HOURS),
            },
        }
    }

    /// Build state from the API scorecard. Blocks the configuration left out
    /// stay null while the server reports their defaults.
    pub fn from_api_model(scorecard: &Scorecard, prior: Option<&Self>) -> Self {
        let notifications = (scorecard.notifications.enabled
            || prior.is_some_and(|p| p.notifications.is_some()))
        .then(|| NotificationsModel {
            enabled: scorecard.notifications.enabled,
        });
        let evaluation = (scorecard.evaluation.window != DEFAULT_EVALUATION_WINDOW_HOURS
            || prior.is_some_and(|p| p.evaluation.is_some()))
        .then(|| EvaluationModel {
            window: Some(scorecard.evaluation.window),
        });
        let ladder = (!scorecard.ladder.levels.is_empty()
            || prior.is_some_and(|p| p.ladder.is_some()))
        .then(|| LadderModel {
            levels: scorecard
                .ladder
                .levels
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    let prior_level = prior
                        .and_then(|p| p.ladder.as_ref())
                        .and_then(|ladder| ladder.levels.get(i));
                    LevelModel {
                        name: l.name.clone(),
                        rank: l.rank,
                        color: l.color.clone(),
                        description: optional_text(
                            l.description.as_deref(),
                            prior_level.map(|p| &p.description),
                        ),
                    }
                })
                .collect(),
        });

        Self {
            id: Some(scorecard.tag.clone()),
            tag: scorecard.tag.clone(),
            name: scorecard.name.clone(),
            description: optional_text(
                scorecard.description.as_deref(),
                prior.map(|p| &p.description),
            ),
            draft: Some(scorecard.draft),
            notifications,
            ladder,
            rules: scorecard
                .rules
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let prior_rule = prior.and_then(|p| p.rules.get(i));
                    RuleModel {
                        title: r.title.clone(),
                        expression: r.expression.clone(),
                        description: optional_text(
                            r.description.as_deref(),
                            prior_rule.map(|p| &p.description),
                        ),
                        weight: Some(r.weight),
                        level: optional_text(r.level.as_deref(), prior_rule.map(|p| &p.level)),
                        failure_message: optional_text(
                            r.failure_message.as_deref(),
                            prior_rule.map(|p| &p.failure_message),
                        ),
                    }
                })
                .collect(),
            filter: scorecard.filter.as_ref().and_then(|f| {
                block_or_null(f, |f| {
                    FilterModel::from_api_model(f, prior.and_then(|p| p.filter.as_ref()))
                })
            }),
            evaluation,
        }
    }
}

fn include_exclude_block(what: &str) -> Block {
    BlockBuilder::new()
        .description(what)
        .attribute(AttributeBuilder::string_list("include").optional().build())
        .attribute(AttributeBuilder::string_list("exclude").optional().build())
        .build()
}

pub fn scorecard_schema() -> Schema {
    SchemaBuilder::new()
        .description("Cortex scorecard")
        .attribute(id_attribute("Same as tag"))
        .attribute(
            AttributeBuilder::string("tag")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(AttributeBuilder::bool("draft").default(json!(false)).build())
        .single(
            "notifications",
            BlockBuilder::new()
                .attribute(AttributeBuilder::bool("enabled").required().build())
                .build(),
        )
        .single(
            "ladder",
            BlockBuilder::new()
                .list(
                    "levels",
                    BlockBuilder::new()
                        .attribute(AttributeBuilder::string("name").required().build())
                        .attribute(AttributeBuilder::number("rank").required().build())
                        .attribute(
                            AttributeBuilder::string("color")
                                .description("Hex color, e.g. #c38b5f")
                                .required()
                                .build(),
                        )
                        .attribute(AttributeBuilder::string("description").optional().build())
                        .build(),
                )
                .build(),
        )
        .list(
            "rules",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("title").required().build())
                .attribute(
                    AttributeBuilder::string("expression")
                        .description("CQL expression")
                        .required()
                        .build(),
                )
                .attribute(AttributeBuilder::string("description").optional().build())
                .attribute(
                    AttributeBuilder::number("weight")
                        .default(json!(DEFAULT_RULE_WEIGHT))
                        .build(),
                )
                .attribute(
                    AttributeBuilder::string("level")
                        .description("Ladder level the rule belongs to")
                        .optional()
                        .build(),
                )
                .attribute(AttributeBuilder::string("failure_message").optional().build())
                .build(),
        )
        .single(
            "filter",
            BlockBuilder::new()
                .description("Entities the scorecard applies to")
                .attribute(AttributeBuilder::string("category").optional().build())
                .attribute(
                    AttributeBuilder::string("query")
                        .description("CQL query")
                        .optional()
                        .build(),
                )
                .single("types", include_exclude_block("Entity types"))
                .single("groups", include_exclude_block("Entity groups"))
                .build(),
        )
        .single(
            "evaluation",
            BlockBuilder::new()
                .attribute(
                    AttributeBuilder::number("window")
                        .description("Hours between evaluations")
                        .default(json!(DEFAULT_EVALUATION_WINDOW_HOURS))
                        .build(),
                )
                .build(),
        )
        .build()
}

#[derive(Debug, Default)]
pub struct ScorecardResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<Scorecard>,
    prior: Option<&ScorecardResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(scorecard) => {
            tracing::info!("{} scorecard {}", action, scorecard.tag);
            let model = ScorecardResourceModel::from_api_model(&scorecard, prior);
            let state = encode(&model, &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} scorecard", action), &e);
            StateResponse::failed(diags)
        }
    }
}

impl ScorecardResource {
    async fn upsert(&self, planned_state: &serde_json::Value, action: &str) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(plan) = decode::<ScorecardResourceModel>(planned_state, "plan", &mut diags) else {
            return StateResponse::failed(diags);
        };

        let request = UpsertScorecardRequest::from(&plan.to_api_model());
        let scorecards = client.scorecards();
        let result = match scorecards.upsert(&request).await {
            Ok(written) => {
                let tag = if written.tag.is_empty() {
                    &plan.tag
                } else {
                    &written.tag
                };
                scorecards.get_descriptor(tag).await
            }
            Err(e) => Err(e),
        };
        respond(result, Some(&plan), action, diags)
    }
}

#[async_trait]
impl Resource for ScorecardResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        scorecard_schema()
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
            decode::<ScorecardResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.scorecards().get_descriptor(&state.tag).await {
            Err(e) if e.is_not_found() => {
                tracing::info!("scorecard {} no longer exists, removing from state", state.tag);
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
        let Some(state) = decode::<ScorecardResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.scorecards().delete(&state.tag).await {
            Ok(()) => tracing::info!("deleted scorecard {}", state.tag),
            Err(e) if e.is_not_found() => tracing::info!("scorecard {} already gone", state.tag),
            Err(e) => diags.api_error("delete scorecard", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.scorecards().get_descriptor(&request.id).await {
            Err(e) if e.is_not_found() => {
                StateResponse::import_missing("scorecard", &request.id, diags)
            }
            result => respond(result, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ScorecardResourceModel {
        ScorecardResourceModel {
            tag: "production-readiness".to_string(),
            name: "Production Readiness".to_string(),
            rules: vec![RuleModel {
                title: "Has owners".to_string(),
                expression: "ownership != null".to_string(),
                ..RuleModel::default()
            }],
            ..ScorecardResourceModel::default()
        }
    }

    #[test]
    fn test_minimal_model_gets_defaults() {
        let scorecard = minimal().to_api_model();
        assert_eq!(scorecard.rules[0].weight, DEFAULT_RULE_WEIGHT);
        assert_eq!(scorecard.evaluation.window, DEFAULT_EVALUATION_WINDOW_HOURS);
        assert!(!scorecard.notifications.enabled);
        assert!(scorecard.ladder.levels.is_empty());
    }

    #[test]
    fn test_server_defaults_leave_omitted_blocks_null() {
        let plan = minimal();
        let mut scorecard = plan.to_api_model();
        // Upsert writes '' for absent strings
        scorecard.description = Some(String::new());
        scorecard.rules[0].failure_message = Some(String::new());
        scorecard.filter = Some(ScorecardFilter::default());

        let state = ScorecardResourceModel::from_api_model(&scorecard, Some(&plan));
        assert!(state.notifications.is_none());
        assert!(state.evaluation.is_none());
        assert!(state.ladder.is_none());
        assert!(state.filter.is_none());
        assert_eq!(state.description, None);
        assert_eq!(state.rules[0].failure_message, None);
        assert_eq!(state.rules[0].weight, Some(DEFAULT_RULE_WEIGHT));
    }

    #[test]
    fn test_configured_blocks_survive_round_trip() {
        let plan = ScorecardResourceModel {
            description: Some(String::new()),
            evaluation: Some(EvaluationModel { window: Some(4) }),
            filter: Some(FilterModel {
                category: Some("SERVICE".to_string()),
                types: Some(IncludeExcludeModel {
                    include: Some(vec!["service".to_string()]),
                    exclude: Some(vec![]),
                }),
                ..FilterModel::default()
            }),
            ..minimal()
        };
        let state = ScorecardResourceModel::from_api_model(&plan.to_api_model(), Some(&plan));
        assert_eq!(state.description.as_deref(), Some(""));
        assert_eq!(state.evaluation, Some(EvaluationModel { window: Some(4) }));
        assert_eq!(state.filter, plan.filter);
    }

    #[test]
    fn test_upsert_request_drops_empty_filter() {
        let plan = ScorecardResourceModel {
            filter: Some(FilterModel {
                category: Some(String::new()),
                ..FilterModel::default()
            }),
            ..minimal()
        };
        let request = UpsertScorecardRequest::from(&plan.to_api_model());
        assert!(request.filter.is_none());
    }

    #[test]
    fn test_unset_include_exclude_lists_stay_null() {
        let plan = ScorecardResourceModel {
            filter: Some(FilterModel {
                types: Some(IncludeExcludeModel {
                    include: Some(vec!["service".to_string()]),
                    exclude: None,
                }),
                groups: Some(IncludeExcludeModel {
                    include: None,
                    exclude: Some(vec!["legacy".to_string()]),
                }),
                ..FilterModel::default()
            }),
            ..minimal()
        };

        let state = ScorecardResourceModel::from_api_model(&plan.to_api_model(), Some(&plan));
        assert_eq!(state.filter, plan.filter);

        let encoded = encode(&state, &mut Diagnostics::new()).unwrap();
        assert_eq!(encoded["filter"]["types"]["exclude"], serde_json::Value::Null);
        assert_eq!(encoded["filter"]["groups"]["include"], serde_json::Value::Null);
    }

    #[test]
    fn test_null_include_exclude_lists_decode_from_plan() {
        let planned = json!({
            "id": null,
            "tag": "production-readiness",
            "name": "Production Readiness",
            "description": null,
            "draft": false,
            "notifications": null,
            "ladder": null,
            "rules": null,
            "filter": {
                "category": null,
                "query": null,
                "types": {"include": ["service"], "exclude": null},
                "groups": null
            },
            "evaluation": null
        });
        let mut diags = Diagnostics::new();
        let plan = decode::<ScorecardResourceModel>(&planned, "plan", &mut diags).unwrap();
        assert!(diags.is_empty());

        let state = ScorecardResourceModel::from_api_model(&plan.to_api_model(), Some(&plan));
        let encoded = encode(&state, &mut diags).unwrap();
        assert_eq!(encoded["filter"], planned["filter"]);
        assert!(state.rules.is_empty());
    }
}
