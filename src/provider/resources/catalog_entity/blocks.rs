//! Owner, git, dependency, alert and team blocks of a catalog entity

use crate::catalog::entity::{
    EntityAlert, EntityDependency, TeamDescriptor, TeamDescriptorGroup, TeamDescriptorMember,
};
use crate::catalog::git::GitProvider;
use crate::catalog::owner::{EntityOwner, OwnerKind};
use crate::provider::schema::{AttributeBuilder, Block, BlockBuilder, Validator};
use crate::provider::value::{
    json_string_opt, null_as_default, parse_json_opt, ConversionError, ConversionResult,
};
use serde::{Deserialize, Serialize};

// =========================================================================
// Owners
// =========================================================================

/// Flat owner block; which fields apply depends on `type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub inheritance: Option<String>,
    pub channel: Option<String>,
    pub notifications_enabled: Option<bool>,
}

fn require(value: &Option<String>, attribute: &str, kind: OwnerKind) -> ConversionResult<String> {
    value.clone().ok_or_else(|| {
        ConversionError::invalid(
            format!("owners.{}", attribute),
            format!("{} owners need {}", kind, attribute),
        )
    })
}

impl OwnerModel {
    pub fn to_api_model(&self) -> ConversionResult<EntityOwner> {
        let kind: OwnerKind = self
            .kind
            .parse()
            .map_err(|message: String| ConversionError::invalid("owners.type", message))?;

        Ok(match kind {
            OwnerKind::Email => EntityOwner::Email {
                email: require(&self.email, "email", kind)?,
                description: self.description.clone(),
            },
            OwnerKind::Group => EntityOwner::Group {
                name: require(&self.name, "name", kind)?,
                provider: self.provider.clone(),
                description: self.description.clone(),
                inheritance: self.inheritance.clone(),
            },
            OwnerKind::Slack => EntityOwner::Slack {
                channel: require(&self.channel, "channel", kind)?,
                notifications_enabled: self.notifications_enabled.unwrap_or(false),
                description: self.description.clone(),
            },
        })
    }

    /// A slack owner whose prior `notifications_enabled` was null keeps it
    /// null while the server reports the `false` default
    pub fn from_api_model(owner: &EntityOwner, prior: Option<&Self>) -> Self {
        let kind = owner.kind().as_str().to_string();
        match owner {
            EntityOwner::Email { email, description } => Self {
                kind,
                email: Some(email.clone()),
                description: description.clone(),
                ..Self::default()
            },
            EntityOwner::Group {
                name,
                provider,
                description,
                inheritance,
            } => Self {
                kind,
                name: Some(name.clone()),
                provider: provider.clone(),
                description: description.clone(),
                inheritance: inheritance.clone(),
                ..Self::default()
            },
            EntityOwner::Slack {
                channel,
                notifications_enabled,
                description,
            } => Self {
                kind,
                channel: Some(channel.clone()),
                notifications_enabled: (*notifications_enabled
                    || !prior.is_some_and(|p| p.notifications_enabled.is_none()))
                .then_some(*notifications_enabled),
                description: description.clone(),
                ..Self::default()
            },
        }
    }
}

pub fn owner_block() -> Block {
    BlockBuilder::new()
        .attribute(
            AttributeBuilder::string("type")
                .required()
                .validator(Validator::one_of(&OwnerKind::ALL))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("name")
                .description("Group name, for group owners")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("email")
                .description("For email owners")
                .optional()
                .build(),
        )
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(
            AttributeBuilder::string("provider")
                .description("Identity provider of a group owner, e.g. OKTA")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("inheritance")
                .description("APPEND, FALLBACK or NONE")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("channel")
                .description("Slack channel, for slack owners")
                .optional()
                .build(),
        )
        .attribute(AttributeBuilder::bool("notifications_enabled").optional().build())
        .build()
}

// =========================================================================
// Git
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitModel {
    pub github: Option<RepositoryModel>,
    pub gitlab: Option<RepositoryModel>,
    pub azure: Option<AzureRepositoryModel>,
    pub bitbucket: Option<BitbucketRepositoryModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryModel {
    pub repository: String,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AzureRepositoryModel {
    pub project: String,
    pub repository: String,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BitbucketRepositoryModel {
    pub repository: String,
}

impl GitModel {
    /// `None` when no provider is set; more than one is an error
    pub fn to_api_model(&self) -> ConversionResult<Option<GitProvider>> {
        let mut providers = Vec::new();
        if let Some(r) = &self.github {
            providers.push(GitProvider::Github {
                repository: r.repository.clone(),
                base_path: r.base_path.clone(),
            });
        }
        if let Some(r) = &self.gitlab {
            providers.push(GitProvider::Gitlab {
                repository: r.repository.clone(),
                base_path: r.base_path.clone(),
            });
        }
        if let Some(r) = &self.azure {
            providers.push(GitProvider::AzureDevops {
                project: r.project.clone(),
                repository: r.repository.clone(),
                base_path: r.base_path.clone(),
            });
        }
        if let Some(r) = &self.bitbucket {
            providers.push(GitProvider::Bitbucket {
                repository: r.repository.clone(),
            });
        }

        if providers.len() > 1 {
            let keys: Vec<_> = providers.iter().map(GitProvider::key).collect();
            return Err(ConversionError::invalid(
                "git",
                format!("only one git provider may be set, got {}", keys.join(", ")),
            ));
        }
        Ok(providers.pop())
    }

    pub fn from_api_model(git: &GitProvider) -> Self {
        match git {
            GitProvider::Github {
                repository,
                base_path,
            } => Self {
                github: Some(RepositoryModel {
                    repository: repository.clone(),
                    base_path: base_path.clone(),
                }),
                ..Self::default()
            },
            GitProvider::Gitlab {
                repository,
                base_path,
            } => Self {
                gitlab: Some(RepositoryModel {
                    repository: repository.clone(),
                    base_path: base_path.clone(),
                }),
                ..Self::default()
            },
            GitProvider::AzureDevops {
                project,
                repository,
                base_path,
            } => Self {
                azure: Some(AzureRepositoryModel {
                    project: project.clone(),
                    repository: repository.clone(),
                    base_path: base_path.clone(),
                }),
                ..Self::default()
            },
            GitProvider::Bitbucket { repository } => Self {
                bitbucket: Some(BitbucketRepositoryModel {
                    repository: repository.clone(),
                }),
                ..Self::default()
            },
        }
    }
}

pub fn git_block() -> Block {
    let repository = || {
        BlockBuilder::new()
            .attribute(
                AttributeBuilder::string("repository")
                    .description("org/repo")
                    .required()
                    .build(),
            )
            .attribute(AttributeBuilder::string("base_path").optional().build())
            .build()
    };
    BlockBuilder::new()
        .description("Source repository. Only one provider may be set.")
        .single("github", repository())
        .single("gitlab", repository())
        .single(
            "azure",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("project").required().build())
                .attribute(AttributeBuilder::string("repository").required().build())
                .attribute(AttributeBuilder::string("base_path").optional().build())
                .build(),
        )
        .single(
            "bitbucket",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("repository").required().build())
                .build(),
        )
        .build()
}

// =========================================================================
// Dependencies and alerts
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyModel {
    pub tag: String,
    pub method: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    /// JSON-encoded
    pub metadata: Option<String>,
}

impl DependencyModel {
    pub fn to_api_model(&self) -> ConversionResult<EntityDependency> {
        Ok(EntityDependency {
            tag: self.tag.clone(),
            method: self.method.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
            metadata: parse_json_opt("dependencies.metadata", self.metadata.as_deref())?,
        })
    }

    pub fn from_api_model(dependency: &EntityDependency, prior: Option<&Self>) -> Self {
        Self {
            tag: dependency.tag.clone(),
            method: dependency.method.clone(),
            path: dependency.path.clone(),
            description: dependency.description.clone(),
            metadata: json_string_opt(
                dependency.metadata.as_ref(),
                prior.and_then(|p| p.metadata.as_deref()),
            ),
        }
    }
}

pub fn dependency_block() -> Block {
    BlockBuilder::new()
        .attribute(AttributeBuilder::string("tag").required().build())
        .attribute(
            AttributeBuilder::string("method")
                .description("HTTP method, for API dependencies")
                .optional()
                .validator(Validator::one_of(&[
                    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE",
                ]))
                .build(),
        )
        .attribute(AttributeBuilder::string("path").optional().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .attribute(
            AttributeBuilder::string("metadata")
                .description("JSON-encoded metadata")
                .optional()
                .build(),
        )
        .build()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
    pub value: String,
}

impl AlertModel {
    pub fn to_api_model(&self) -> EntityAlert {
        EntityAlert {
            kind: self.kind.clone(),
            tag: self.tag.clone(),
            value: self.value.clone(),
        }
    }

    pub fn from_api_model(alert: &EntityAlert) -> Self {
        Self {
            kind: alert.kind.clone(),
            tag: alert.tag.clone(),
            value: alert.value.clone(),
        }
    }
}

pub fn alert_block() -> Block {
    BlockBuilder::new()
        .attribute(
            AttributeBuilder::string("type")
                .description("opsgenie, pagerduty, ...")
                .required()
                .build(),
        )
        .attribute(AttributeBuilder::string("tag").required().build())
        .attribute(AttributeBuilder::string("value").required().build())
        .build()
}

// =========================================================================
// Team membership (team entities only)
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamBlockModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<TeamGroupModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<TeamMemberModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamGroupModel {
    pub name: String,
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberModel {
    pub name: String,
    pub email: String,
    pub notifications_enabled: bool,
}

impl TeamBlockModel {
    pub fn to_api_model(&self) -> TeamDescriptor {
        TeamDescriptor {
            groups: self
                .groups
                .iter()
                .map(|g| TeamDescriptorGroup {
                    name: g.name.clone(),
                    provider: g.provider.clone(),
                })
                .collect(),
            members: self
                .members
                .iter()
                .map(|m| TeamDescriptorMember {
                    name: m.name.clone(),
                    email: m.email.clone(),
                    notifications_enabled: m.notifications_enabled,
                })
                .collect(),
        }
    }

    pub fn from_api_model(team: &TeamDescriptor) -> Self {
        Self {
            groups: team
                .groups
                .iter()
                .map(|g| TeamGroupModel {
                    name: g.name.clone(),
                    provider: g.provider.clone(),
                })
                .collect(),
            members: team
                .members
                .iter()
                .map(|m| TeamMemberModel {
                    name: m.name.clone(),
                    email: m.email.clone(),
                    notifications_enabled: m.notifications_enabled,
                })
                .collect(),
        }
    }
}

pub fn team_block() -> Block {
    BlockBuilder::new()
        .description("Membership of a team entity")
        .list(
            "groups",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("name").required().build())
                .attribute(AttributeBuilder::string("provider").required().build())
                .build(),
        )
        .list(
            "members",
            BlockBuilder::new()
                .attribute(AttributeBuilder::string("name").required().build())
                .attribute(AttributeBuilder::string("email").required().build())
                .attribute(AttributeBuilder::bool("notifications_enabled").required().build())
                .build(),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_variants_round_trip() {
        let owners = [
            OwnerModel {
                kind: "email".to_string(),
                email: Some("ada@example.com".to_string()),
                ..OwnerModel::default()
            },
            OwnerModel {
                kind: "group".to_string(),
                name: Some("platform".to_string()),
                provider: Some("OKTA".to_string()),
                inheritance: Some("APPEND".to_string()),
                ..OwnerModel::default()
            },
            OwnerModel {
                kind: "slack".to_string(),
                channel: Some("platform-eng".to_string()),
                notifications_enabled: Some(true),
                description: Some(String::new()),
                ..OwnerModel::default()
            },
        ];
        for owner in owners {
            let api = owner.to_api_model().unwrap();
            assert_eq!(OwnerModel::from_api_model(&api, Some(&owner)), owner);
        }
    }

    #[test]
    fn test_unset_slack_notifications_stay_null() {
        let owner = OwnerModel {
            kind: "slack".to_string(),
            channel: Some("platform-eng".to_string()),
            ..OwnerModel::default()
        };
        let api = owner.to_api_model().unwrap();
        assert_eq!(OwnerModel::from_api_model(&api, Some(&owner)), owner);

        let configured = OwnerModel {
            notifications_enabled: Some(false),
            ..owner.clone()
        };
        assert_eq!(
            OwnerModel::from_api_model(&api, Some(&configured)),
            configured
        );
        assert_eq!(
            OwnerModel::from_api_model(&api, None).notifications_enabled,
            Some(false)
        );
    }

    #[test]
    fn test_owner_with_unknown_type_is_rejected() {
        let owner = OwnerModel {
            kind: "pager".to_string(),
            ..OwnerModel::default()
        };
        assert_eq!(owner.to_api_model().unwrap_err().attribute(), "owners.type");
    }

    #[test]
    fn test_owner_missing_its_key_field_is_rejected() {
        let owner = OwnerModel {
            kind: "slack".to_string(),
            name: Some("wrong field".to_string()),
            ..OwnerModel::default()
        };
        assert_eq!(owner.to_api_model().unwrap_err().attribute(), "owners.channel");
    }

    #[test]
    fn test_git_allows_at_most_one_provider() {
        let git = GitModel {
            github: Some(RepositoryModel {
                repository: "org/svc".to_string(),
                base_path: None,
            }),
            bitbucket: Some(BitbucketRepositoryModel {
                repository: "org/svc".to_string(),
            }),
            ..GitModel::default()
        };
        assert!(git.to_api_model().is_err());
        assert_eq!(GitModel::default().to_api_model().unwrap(), None);
    }

    #[test]
    fn test_dependency_metadata_keeps_prior_formatting() {
        let plan = DependencyModel {
            tag: "db".to_string(),
            metadata: Some("{ \"tables\": [\"users\"] }".to_string()),
            ..DependencyModel::default()
        };
        let api = plan.to_api_model().unwrap();
        assert_eq!(DependencyModel::from_api_model(&api, Some(&plan)), plan);
    }
}
