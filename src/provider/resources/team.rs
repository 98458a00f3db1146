//! `cortex_team`

use super::{link_block, member_block, LinkModel, MemberModel};
use crate::catalog::team::{
    CortexTeam, IdpGroup, Team, TeamKind, TeamMember, TeamMetadata, TeamSlackChannel,
};
use crate::cortex::{ApiResult, CortexClient};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::*;
use crate::provider::schema::{
    id_attribute, AttributeBuilder, BlockBuilder, PlanModifier, Schema, SchemaBuilder,
};
use crate::provider::value::{decode, encode, null_as_default, ConversionError, ConversionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_team";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamResourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    /// `CORTEX` or `IDP`, derived from which block is set
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_archived: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LinkModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slack_channels: Vec<SlackChannelModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_members: Vec<MemberModel>,
    pub cortex_team: Option<CortexTeamModel>,
    pub idp_group: Option<IdpGroupModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackChannelModel {
    pub name: String,
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CortexTeamModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<MemberModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdpGroupModel {
    pub group: String,
    pub provider: String,
}

fn member_to_api(member: &MemberModel) -> TeamMember {
    TeamMember {
        name: member.name.clone(),
        email: member.email.clone(),
        description: member.description.clone(),
    }
}

fn member_from_api(member: &TeamMember) -> MemberModel {
    MemberModel {
        name: member.name.clone(),
        email: member.email.clone(),
        description: member.description.clone(),
    }
}

impl TeamResourceModel {
    pub fn to_api_model(&self) -> ConversionResult<Team> {
        let kind = match (&self.cortex_team, &self.idp_group) {
            (Some(_), Some(_)) => {
                return Err(ConversionError::invalid(
                    "idp_group",
                    "a team is either Cortex-managed or backed by an IdP group, not both",
                ))
            }
            (_, Some(idp)) => TeamKind::Idp {
                idp_group: IdpGroup {
                    group: idp.group.clone(),
                    provider: idp.provider.clone(),
                },
            },
            (cortex, None) => TeamKind::Cortex {
                cortex_team: CortexTeam {
                    members: cortex
                        .iter()
                        .flat_map(|c| c.members.iter())
                        .map(member_to_api)
                        .collect(),
                },
            },
        };

        Ok(Team {
            team_tag: self.tag.clone(),
            catalog_entity_tag: None,
            metadata: TeamMetadata {
                name: self.name.clone(),
                description: self.description.clone(),
                summary: self.summary.clone(),
            },
            links: self.links.iter().map(LinkModel::to_api_model).collect(),
            slack_channels: self
                .slack_channels
                .iter()
                .map(|c| TeamSlackChannel {
                    name: c.name.clone(),
                    notifications_enabled: c.notifications_enabled,
                })
                .collect(),
            additional_members: self.additional_members.iter().map(member_to_api).collect(),
            is_archived: self.is_archived.unwrap_or(false),
            kind,
        })
    }

    /// Build state from the API team. A Cortex team without members keeps
    /// `cortex_team` null when the prior value left it out.
    pub fn from_api_model(team: &Team, prior: Option<&Self>) -> Self {
        let (cortex_team, idp_group) = match &team.kind {
            TeamKind::Cortex { cortex_team } => (
                (!cortex_team.members.is_empty()
                    || !prior.is_some_and(|p| p.cortex_team.is_none()))
                .then(|| CortexTeamModel {
                    members: cortex_team.members.iter().map(member_from_api).collect(),
                }),
                None,
            ),
            TeamKind::Idp { idp_group } => (
                None,
                Some(IdpGroupModel {
                    group: idp_group.group.clone(),
                    provider: idp_group.provider.clone(),
                }),
            ),
        };

        Self {
            id: Some(team.team_tag.clone()),
            tag: team.team_tag.clone(),
            name: team.metadata.name.clone(),
            description: team.metadata.description.clone(),
            summary: team.metadata.summary.clone(),
            kind: Some(team.kind.as_str().to_string()),
            is_archived: Some(team.is_archived),
            links: team.links.iter().map(LinkModel::from_api_model).collect(),
            slack_channels: team
                .slack_channels
                .iter()
                .map(|c| SlackChannelModel {
                    name: c.name.clone(),
                    notifications_enabled: c.notifications_enabled,
                })
                .collect(),
            additional_members: team.additional_members.iter().map(member_from_api).collect(),
            cortex_team,
            idp_group,
        }
    }
}

pub fn team_schema() -> Schema {
    SchemaBuilder::new()
        .description("Cortex team, managed in Cortex or backed by an identity provider group")
        .attribute(id_attribute("Same as tag"))
        .attribute(
            AttributeBuilder::string("tag")
                .required()
                .plan_modifier(PlanModifier::RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(AttributeBuilder::string("summary").optional().build())
        .attribute(
            AttributeBuilder::string("type")
                .description("CORTEX or IDP")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::bool("is_archived")
                .optional()
                .computed()
                .plan_modifier(PlanModifier::UseStateForUnknown)
                .build(),
        )
        .list("links", link_block())
        .list(
            "slack_channels",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("name").required().build())
                .attribute(AttributeBuilder::bool("notifications_enabled").required().build())
                .build(),
        )
        .list("additional_members", member_block())
        .single(
            "cortex_team",
            BlockBuilder::new()
                .description("Members of a Cortex-managed team")
                .list("members", member_block())
                .build(),
        )
        .single(
            "idp_group",
            BlockBuilder::new()
                .description("Identity provider group backing the team")
                .attribute(AttributeBuilder::string("group").required().build())
                .attribute(
                    AttributeBuilder::string("provider")
                        .description("e.g. OKTA, AZURE_AD, GOOGLE")
                        .required()
                        .build(),
                )
                .build(),
        )
        .build()
}

#[derive(Debug, Default)]
pub struct TeamResource {
    client: ClientSlot,
}

fn respond(
    result: ApiResult<Team>,
    prior: Option<&TeamResourceModel>,
    action: &str,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(team) => {
            tracing::info!("{} team {}", action, team.team_tag);
            let state = encode(&TeamResourceModel::from_api_model(&team, prior), &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) => {
            diags.api_error(&format!("{} team", action), &e);
            StateResponse::failed(diags)
        }
    }
}

impl TeamResource {
    fn planned_team(
        planned: &serde_json::Value,
        diags: &mut Diagnostics,
    ) -> Option<(TeamResourceModel, Team)> {
        let plan = decode::<TeamResourceModel>(planned, "plan", diags)?;
        match plan.to_api_model() {
            Ok(team) => Some((plan, team)),
            Err(e) => {
                e.report(diags);
                None
            }
        }
    }
}

#[async_trait]
impl Resource for TeamResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        team_schema()
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn create(&self, request: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some((plan, team)) = Self::planned_team(&request.planned_state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.teams().create(&team).await;
        respond(result, Some(&plan), "create", diags)
    }

    async fn read(&self, request: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(state) = decode::<TeamResourceModel>(&request.current_state, "state", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        match client.teams().get(&state.tag).await {
            Err(e) if e.is_not_found() => {
                tracing::info!("team {} no longer exists, removing from state", state.tag);
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
        let Some((plan, team)) = Self::planned_team(&request.planned_state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.teams().update(&team).await;
        respond(result, Some(&plan), "update", diags)
    }

    async fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return DeleteResponse { diagnostics: diags };
        };
        let Some(state) = decode::<TeamResourceModel>(&request.prior_state, "state", &mut diags)
        else {
            return DeleteResponse { diagnostics: diags };
        };

        match client.teams().delete(&state.tag).await {
            Ok(()) => tracing::info!("deleted team {}", state.tag),
            Err(e) if e.is_not_found() => tracing::info!("team {} already gone", state.tag),
            Err(e) => diags.api_error("delete team", &e),
        }
        DeleteResponse { diagnostics: diags }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };

        match client.teams().get(&request.id).await {
            Err(e) if e.is_not_found() => StateResponse::import_missing("team", &request.id, diags),
            result => respond(result, None, "import", diags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TeamResourceModel {
        TeamResourceModel {
            id: Some("platform".to_string()),
            tag: "platform".to_string(),
            name: "Platform".to_string(),
            description: None,
            summary: Some("Runs the platform".to_string()),
            kind: Some("IDP".to_string()),
            is_archived: Some(false),
            links: vec![],
            slack_channels: vec![SlackChannelModel {
                name: "platform".to_string(),
                notifications_enabled: true,
            }],
            additional_members: vec![],
            cortex_team: None,
            idp_group: Some(IdpGroupModel {
                group: "platform-eng".to_string(),
                provider: "OKTA".to_string(),
            }),
        }
    }

    #[test]
    fn test_idp_team_round_trip() {
        let model = model();
        let team = model.to_api_model().unwrap();
        assert!(matches!(team.kind, TeamKind::Idp { .. }));
        assert_eq!(TeamResourceModel::from_api_model(&team, Some(&model)), model);
    }

    #[test]
    fn test_team_without_blocks_is_cortex_managed() {
        let model = TeamResourceModel {
            idp_group: None,
            ..model()
        };
        let team = model.to_api_model().unwrap();
        assert_eq!(team.kind, TeamKind::default());
        let state = TeamResourceModel::from_api_model(&team, None);
        assert_eq!(state.kind.as_deref(), Some("CORTEX"));
        assert_eq!(state.cortex_team, Some(CortexTeamModel::default()));
    }

    #[test]
    fn test_team_without_blocks_keeps_them_null_in_state() {
        let planned = serde_json::json!({
            "id": null,
            "tag": "platform",
            "name": "Platform",
            "description": null,
            "summary": null,
            "type": null,
            "is_archived": null,
            "links": null,
            "slack_channels": null,
            "additional_members": null,
            "cortex_team": null,
            "idp_group": null
        });
        let mut diags = Diagnostics::new();
        let (plan, team) = TeamResource::planned_team(&planned, &mut diags).unwrap();
        assert!(diags.is_empty());

        let state = TeamResourceModel::from_api_model(&team, Some(&plan));
        assert_eq!(state.kind.as_deref(), Some("CORTEX"));
        assert_eq!(state.cortex_team, None);
        let encoded = encode(&state, &mut diags).unwrap();
        assert_eq!(encoded["cortex_team"], serde_json::Value::Null);
        assert_eq!(encoded["idp_group"], serde_json::Value::Null);
    }

    #[test]
    fn test_configured_empty_cortex_team_is_kept() {
        let plan = TeamResourceModel {
            idp_group: None,
            cortex_team: Some(CortexTeamModel::default()),
            ..model()
        };
        let team = plan.to_api_model().unwrap();
        let state = TeamResourceModel::from_api_model(&team, Some(&plan));
        assert_eq!(state.cortex_team, Some(CortexTeamModel::default()));
    }

    #[test]
    fn test_both_kinds_is_a_conversion_error() {
        let model = TeamResourceModel {
            cortex_team: Some(CortexTeamModel::default()),
            ..model()
        };
        let err = model.to_api_model().unwrap_err();
        assert_eq!(err.attribute(), "idp_group");
    }
}
