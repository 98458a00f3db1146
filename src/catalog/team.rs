//! Teams
//!
//! A team is either managed in Cortex (explicit member list) or backed by an
//! identity-provider group. The wire format carries a `type` discriminator
//! next to `cortexTeam` / `idpGroup`, which maps onto [`TeamKind`].

use super::entity::EntityLink;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_tag: String,
    #[serde(default)]
    pub catalog_entity_tag: Option<String>,
    pub metadata: TeamMetadata,
    #[serde(default)]
    pub links: Vec<EntityLink>,
    #[serde(default)]
    pub slack_channels: Vec<TeamSlackChannel>,
    #[serde(default)]
    pub additional_members: Vec<TeamMember>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(flatten)]
    pub kind: TeamKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TeamKind {
    #[serde(rename = "CORTEX", rename_all = "camelCase")]
    Cortex { cortex_team: CortexTeam },
    #[serde(rename = "IDP", rename_all = "camelCase")]
    Idp { idp_group: IdpGroup },
}

impl Default for TeamKind {
    fn default() -> Self {
        TeamKind::Cortex {
            cortex_team: CortexTeam::default(),
        }
    }
}

impl TeamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamKind::Cortex { .. } => "CORTEX",
            TeamKind::Idp { .. } => "IDP",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexTeam {
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpGroup {
    pub group: String,
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamSlackChannel {
    pub name: String,
    pub notifications_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamList {
    pub teams: Vec<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_idp_team_decodes_kind() {
        let team: Team = serde_json::from_value(json!({
            "teamTag": "platform",
            "metadata": {"name": "Platform"},
            "type": "IDP",
            "idpGroup": {"group": "platform-eng", "provider": "OKTA"},
            "cortexTeam": null
        }))
        .unwrap();

        assert_eq!(
            team.kind,
            TeamKind::Idp {
                idp_group: IdpGroup {
                    group: "platform-eng".to_string(),
                    provider: "OKTA".to_string(),
                }
            }
        );
        assert!(team.links.is_empty());
    }

    #[test]
    fn test_cortex_team_serializes_type_discriminator() {
        let team = Team {
            team_tag: "payments".to_string(),
            catalog_entity_tag: None,
            metadata: TeamMetadata {
                name: "Payments".to_string(),
                ..TeamMetadata::default()
            },
            links: vec![],
            slack_channels: vec![],
            additional_members: vec![],
            is_archived: false,
            kind: TeamKind::Cortex {
                cortex_team: CortexTeam {
                    members: vec![TeamMember {
                        name: "Ada".to_string(),
                        email: "ada@example.com".to_string(),
                        description: None,
                    }],
                },
            },
        };

        let value = serde_json::to_value(&team).unwrap();
        assert_eq!(value["type"], "CORTEX");
        assert_eq!(value["cortexTeam"]["members"][0]["email"], "ada@example.com");
        assert_eq!(value["teamTag"], "payments");
    }
}
