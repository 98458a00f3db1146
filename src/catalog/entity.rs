//! Catalog entities
//!
//! [`CatalogEntity`] is the summary returned by `GET /api/v1/catalog/{tag}`.
//! [`CatalogEntityData`] is the full descriptor, which is what the provider
//! reads and writes (every write replaces the whole document).

use super::git::GitProvider;
use super::integrations::*;
use super::owner::EntityOwner;
use super::Enabled;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entity type used when a descriptor does not name one
pub const DEFAULT_ENTITY_TYPE: &str = "service";

/// Entity summary from the catalog API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogEntity {
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub is_archived: bool,
    pub groups: Vec<String>,
    pub links: Vec<EntityLink>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One page of `GET /api/v1/catalog`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogEntityPage {
    pub entities: Vec<CatalogEntity>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityLink {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDependency {
    pub tag: String,
    pub method: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityAlert {
    pub kind: String,
    pub tag: String,
    pub value: String,
}

/// Members and identity-provider groups of a `team` entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDescriptor {
    pub groups: Vec<TeamDescriptorGroup>,
    pub members: Vec<TeamDescriptorMember>,
}

impl Enabled for TeamDescriptor {
    fn enabled(&self) -> bool {
        self.groups.enabled() || self.members.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDescriptorGroup {
    pub name: String,
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDescriptorMember {
    pub name: String,
    pub email: String,
    pub notifications_enabled: bool,
}

/// Full catalog entity descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntityData {
    pub tag: String,
    pub title: String,
    pub description: Option<String>,
    pub entity_type: String,
    /// Free-form definition for custom resource types
    pub definition: Option<Value>,
    pub owners: Vec<EntityOwner>,
    pub groups: Option<Vec<String>>,
    pub links: Vec<EntityLink>,
    pub metadata: Option<Map<String, Value>>,
    pub dependencies: Vec<EntityDependency>,
    pub alerts: Vec<EntityAlert>,
    pub git: Option<GitProvider>,
    pub jira: Option<Jira>,
    pub on_call: Option<OnCall>,
    pub apm: Apm,
    pub dashboards: Vec<DashboardEmbed>,
    pub slos: Slos,
    pub static_analysis: StaticAnalysis,
    pub buildkite: Option<Buildkite>,
    pub k8s: K8s,
    pub bugsnag: Bugsnag,
    pub checkmarx: Checkmarx,
    pub coralogix: Coralogix,
    pub firehydrant: FireHydrant,
    pub launch_darkly: LaunchDarkly,
    pub microsoft_teams: Vec<MicrosoftTeamsChannel>,
    pub rollbar: Rollbar,
    pub sentry: Sentry,
    pub service_now: ServiceNow,
    pub slack: Slack,
    pub snyk: Snyk,
    pub wiz: Wiz,
    pub team: Option<TeamDescriptor>,
    pub children: Vec<String>,
    pub parents: Vec<String>,
}

impl Default for CatalogEntityData {
    fn default() -> Self {
        Self {
            tag: String::new(),
            title: String::new(),
            description: None,
            entity_type: DEFAULT_ENTITY_TYPE.to_string(),
            definition: None,
            owners: Vec::new(),
            groups: None,
            links: Vec::new(),
            metadata: None,
            dependencies: Vec::new(),
            alerts: Vec::new(),
            git: None,
            jira: None,
            on_call: None,
            apm: Apm::default(),
            dashboards: Vec::new(),
            slos: Slos::default(),
            static_analysis: StaticAnalysis::default(),
            buildkite: None,
            k8s: K8s::default(),
            bugsnag: Bugsnag::default(),
            checkmarx: Checkmarx::default(),
            coralogix: Coralogix::default(),
            firehydrant: FireHydrant::default(),
            launch_darkly: LaunchDarkly::default(),
            microsoft_teams: Vec::new(),
            rollbar: Rollbar::default(),
            sentry: Sentry::default(),
            service_now: ServiceNow::default(),
            slack: Slack::default(),
            snyk: Snyk::default(),
            wiz: Wiz::default(),
            team: None,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }
}

impl CatalogEntityData {
    pub fn new(tag: &str, title: &str) -> Self {
        Self {
            tag: tag.to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn is_team(&self) -> bool {
        self.entity_type == "team"
    }

    pub fn is_domain(&self) -> bool {
        self.entity_type == "domain"
    }
}
