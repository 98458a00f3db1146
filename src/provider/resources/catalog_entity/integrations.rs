//! Terraform models for the integration blocks of a catalog entity
//!
//! Every model converts to and from its `catalog::integrations` counterpart.
//! Blocks whose API struct is not [`Enabled`](crate::catalog::Enabled) are
//! written to state as null by the caller.

use crate::catalog::integrations::*;
use crate::provider::schema::{AttributeBuilder, AttributeType, Block, BlockBuilder};
use crate::provider::value::{null_as_default, prior_list};
use serde::{Deserialize, Serialize};

fn string(name: &str) -> AttributeBuilder {
    AttributeBuilder::string(name)
}

fn strings(name: &str) -> AttributeBuilder {
    AttributeBuilder::string_list(name)
}

// =========================================================================
// Issues
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuesModel {
    pub jira: Option<JiraModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraModel {
    pub default_jql: Option<String>,
    pub projects: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub components: Option<Vec<String>>,
}

impl JiraModel {
    pub fn to_api_model(&self) -> Jira {
        Jira {
            default_jql: self.default_jql.clone(),
            projects: self.projects.clone(),
            labels: self.labels.clone(),
            components: self.components.clone(),
        }
    }

    pub fn from_api_model(jira: &Jira) -> Self {
        Self {
            default_jql: jira.default_jql.clone(),
            projects: jira.projects.clone(),
            labels: jira.labels.clone(),
            components: jira.components.clone(),
        }
    }
}

pub fn issues_block() -> Block {
    BlockBuilder::new()
        .single(
            "jira",
            BlockBuilder::new()
                .attribute(string("default_jql").optional().build())
                .attribute(strings("projects").optional().build())
                .attribute(strings("labels").optional().build())
                .attribute(strings("components").optional().build())
                .build(),
        )
        .build()
}

// =========================================================================
// On-call
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnCallModel {
    pub pager_duty: Option<OnCallTargetModel>,
    pub ops_genie: Option<OnCallTargetModel>,
    pub victor_ops: Option<OnCallTargetModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnCallTargetModel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl OnCallModel {
    /// Configured providers, in declaration order
    pub fn targets(&self) -> Vec<(OnCallProvider, &OnCallTargetModel)> {
        [
            (OnCallProvider::PagerDuty, &self.pager_duty),
            (OnCallProvider::OpsGenie, &self.ops_genie),
            (OnCallProvider::VictorOps, &self.victor_ops),
        ]
        .into_iter()
        .filter_map(|(provider, target)| target.as_ref().map(|t| (provider, t)))
        .collect()
    }

    pub fn from_api_model(on_call: &OnCall) -> Self {
        let target = Some(OnCallTargetModel {
            id: on_call.id.clone(),
            kind: on_call.kind.clone(),
        });
        match on_call.provider {
            OnCallProvider::PagerDuty => Self {
                pager_duty: target,
                ..Self::default()
            },
            OnCallProvider::OpsGenie => Self {
                ops_genie: target,
                ..Self::default()
            },
            OnCallProvider::VictorOps => Self {
                victor_ops: target,
                ..Self::default()
            },
        }
    }
}

pub fn on_call_block() -> Block {
    let target = || {
        BlockBuilder::new()
            .attribute(string("id").required().build())
            .attribute(
                string("type")
                    .description("SCHEDULE, SERVICE, TEAM, ...")
                    .required()
                    .build(),
            )
            .build()
    };
    BlockBuilder::new()
        .description("On-call rotation. Only one provider may be set.")
        .single("pager_duty", target())
        .single("ops_genie", target())
        .single("victor_ops", target())
        .build()
}

// =========================================================================
// APM and dashboards
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApmModel {
    pub datadog: Option<DatadogApmModel>,
    pub dynatrace: Option<DynatraceApmModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_relic: Vec<NewRelicModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatadogApmModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub monitors: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynatraceApmModel {
    pub entity_ids: Option<Vec<String>>,
    pub entity_name_matchers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRelicModel {
    pub application_id: i64,
    pub alias: Option<String>,
}

impl ApmModel {
    pub fn to_api_model(&self) -> Apm {
        Apm {
            datadog: self.datadog.as_ref().map(|d| DatadogApm {
                monitors: d.monitors.clone(),
            }),
            dynatrace: self.dynatrace.as_ref().map(|d| DynatraceApm {
                entity_ids: d.entity_ids.clone(),
                entity_name_matchers: d.entity_name_matchers.clone(),
            }),
            new_relic: self
                .new_relic
                .iter()
                .map(|n| NewRelicApplication {
                    application_id: n.application_id,
                    alias: n.alias.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(apm: &Apm) -> Self {
        Self {
            datadog: apm.datadog.as_ref().map(|d| DatadogApmModel {
                monitors: d.monitors.clone(),
            }),
            dynatrace: apm.dynatrace.as_ref().map(|d| DynatraceApmModel {
                entity_ids: d.entity_ids.clone(),
                entity_name_matchers: d.entity_name_matchers.clone(),
            }),
            new_relic: apm
                .new_relic
                .iter()
                .map(|n| NewRelicModel {
                    application_id: n.application_id,
                    alias: n.alias.clone(),
                })
                .collect(),
        }
    }
}

pub fn apm_block() -> Block {
    BlockBuilder::new()
        .single(
            "datadog",
            BlockBuilder::new()
                .attribute(
                    AttributeBuilder::new("monitors", AttributeType::list_of(AttributeType::Number))
                        .required()
                        .build(),
                )
                .build(),
        )
        .single(
            "dynatrace",
            BlockBuilder::new()
                .attribute(strings("entity_ids").optional().build())
                .attribute(strings("entity_name_matchers").optional().build())
                .build(),
        )
        .list(
            "new_relic",
            BlockBuilder::new()
                .attribute(AttributeBuilder::number("application_id").required().build())
                .attribute(string("alias").optional().build())
                .build(),
        )
        .build()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardsModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub embeds: Vec<DashboardEmbedModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardEmbedModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl DashboardsModel {
    pub fn to_api_model(&self) -> Vec<DashboardEmbed> {
        self.embeds
            .iter()
            .map(|e| DashboardEmbed {
                kind: e.kind.clone(),
                url: e.url.clone(),
            })
            .collect()
    }

    pub fn from_api_model(embeds: &[DashboardEmbed]) -> Self {
        Self {
            embeds: embeds
                .iter()
                .map(|e| DashboardEmbedModel {
                    kind: e.kind.clone(),
                    url: e.url.clone(),
                })
                .collect(),
        }
    }
}

pub fn dashboards_block() -> Block {
    BlockBuilder::new()
        .list(
            "embeds",
            BlockBuilder::new()
                .attribute(
                    string("type")
                        .description("datadog, grafana or newrelic")
                        .required()
                        .build(),
                )
                .attribute(string("url").required().build())
                .build(),
        )
        .build()
}

// =========================================================================
// SLOs
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlosModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub datadog: Vec<SloIdModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dynatrace: Vec<SloIdModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lightstep: Vec<LightstepModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prometheus: Vec<PrometheusModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub signalfx: Vec<SignalFxModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sumologic: Vec<SloIdModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SloIdModel {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightstepModel {
    pub stream_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latency_targets: Vec<LightstepTargetModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightstepTargetModel {
    pub percentile: f64,
    pub target: i64,
    pub slo: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrometheusModel {
    pub error_query: String,
    pub total_query: String,
    pub slo: f64,
    pub alias: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalFxModel {
    pub query: String,
    pub rollup: String,
    pub target: i64,
    pub lookback: String,
    pub operation: String,
}

fn slo_ids_to_api(ids: &[SloIdModel]) -> Vec<SloId> {
    ids.iter().map(|s| SloId { id: s.id.clone() }).collect()
}

fn slo_ids_from_api(ids: &[SloId]) -> Vec<SloIdModel> {
    ids.iter().map(|s| SloIdModel { id: s.id.clone() }).collect()
}

impl SlosModel {
    pub fn to_api_model(&self) -> Slos {
        Slos {
            datadog: slo_ids_to_api(&self.datadog),
            dynatrace: slo_ids_to_api(&self.dynatrace),
            lightstep: self
                .lightstep
                .iter()
                .map(|l| LightstepSlo {
                    stream_id: l.stream_id.clone(),
                    latency_targets: l
                        .latency_targets
                        .iter()
                        .map(|t| LightstepTarget {
                            percentile: t.percentile,
                            target: t.target,
                            slo: t.slo,
                        })
                        .collect(),
                })
                .collect(),
            prometheus: self
                .prometheus
                .iter()
                .map(|p| PrometheusSlo {
                    error_query: p.error_query.clone(),
                    total_query: p.total_query.clone(),
                    slo: p.slo,
                    alias: p.alias.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            signalfx: self
                .signalfx
                .iter()
                .map(|s| SignalFxSlo {
                    query: s.query.clone(),
                    rollup: s.rollup.clone(),
                    target: s.target,
                    lookback: s.lookback.clone(),
                    operation: s.operation.clone(),
                })
                .collect(),
            sumologic: slo_ids_to_api(&self.sumologic),
        }
    }

    pub fn from_api_model(slos: &Slos) -> Self {
        Self {
            datadog: slo_ids_from_api(&slos.datadog),
            dynatrace: slo_ids_from_api(&slos.dynatrace),
            lightstep: slos
                .lightstep
                .iter()
                .map(|l| LightstepModel {
                    stream_id: l.stream_id.clone(),
                    latency_targets: l
                        .latency_targets
                        .iter()
                        .map(|t| LightstepTargetModel {
                            percentile: t.percentile,
                            target: t.target,
                            slo: t.slo,
                        })
                        .collect(),
                })
                .collect(),
            prometheus: slos
                .prometheus
                .iter()
                .map(|p| PrometheusModel {
                    error_query: p.error_query.clone(),
                    total_query: p.total_query.clone(),
                    slo: p.slo,
                    alias: p.alias.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            signalfx: slos
                .signalfx
                .iter()
                .map(|s| SignalFxModel {
                    query: s.query.clone(),
                    rollup: s.rollup.clone(),
                    target: s.target,
                    lookback: s.lookback.clone(),
                    operation: s.operation.clone(),
                })
                .collect(),
            sumologic: slo_ids_from_api(&slos.sumologic),
        }
    }
}

pub fn slos_block() -> Block {
    let ids = || {
        BlockBuilder::new()
            .attribute(string("id").required().build())
            .build()
    };
    BlockBuilder::new()
        .list("datadog", ids())
        .list("dynatrace", ids())
        .list(
            "lightstep",
            BlockBuilder::new()
                .attribute(string("stream_id").required().build())
                .list(
                    "latency_targets",
                    BlockBuilder::new()
                        .attribute(AttributeBuilder::number("percentile").required().build())
                        .attribute(AttributeBuilder::number("target").required().build())
                        .attribute(AttributeBuilder::number("slo").required().build())
                        .build(),
                )
                .build(),
        )
        .list(
            "prometheus",
            BlockBuilder::new()
                .attribute(string("error_query").required().build())
                .attribute(string("total_query").required().build())
                .attribute(AttributeBuilder::number("slo").required().build())
                .attribute(string("alias").optional().build())
                .attribute(string("name").optional().build())
                .build(),
        )
        .list(
            "signalfx",
            BlockBuilder::new()
                .attribute(string("query").required().build())
                .attribute(string("rollup").required().build())
                .attribute(AttributeBuilder::number("target").required().build())
                .attribute(string("lookback").required().build())
                .attribute(string("operation").required().build())
                .build(),
        )
        .list("sumologic", ids())
        .build()
}

// =========================================================================
// Static analysis
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticAnalysisModel {
    pub code_cov: Option<CodeCovModel>,
    pub mend: Option<MendModel>,
    pub sonar_qube: Option<SonarQubeModel>,
    pub veracode: Option<VeracodeModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeCovModel {
    pub owner: String,
    pub repo: String,
    pub provider: String,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MendModel {
    pub application_ids: Option<Vec<String>>,
    pub project_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SonarQubeModel {
    pub project: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VeracodeModel {
    pub application_names: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sandboxes: Vec<VeracodeSandboxModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VeracodeSandboxModel {
    pub application_name: String,
    pub sandbox_name: String,
}

impl StaticAnalysisModel {
    pub fn to_api_model(&self) -> StaticAnalysis {
        StaticAnalysis {
            codecov: self.code_cov.as_ref().map(|c| CodeCov {
                owner: c.owner.clone(),
                repo: c.repo.clone(),
                provider: c.provider.clone(),
                flag: c.flag.clone(),
            }),
            mend: self.mend.as_ref().map(|m| Mend {
                application_ids: m.application_ids.clone(),
                project_ids: m.project_ids.clone(),
            }),
            sonarqube: self.sonar_qube.as_ref().map(|s| SonarQube {
                project: s.project.clone(),
                alias: s.alias.clone(),
            }),
            veracode: self.veracode.as_ref().map(|v| Veracode {
                application_names: v.application_names.clone(),
                sandboxes: v
                    .sandboxes
                    .iter()
                    .map(|s| VeracodeSandbox {
                        application_name: s.application_name.clone(),
                        sandbox_name: s.sandbox_name.clone(),
                    })
                    .collect(),
            }),
        }
    }

    pub fn from_api_model(analysis: &StaticAnalysis) -> Self {
        Self {
            code_cov: analysis.codecov.as_ref().map(|c| CodeCovModel {
                owner: c.owner.clone(),
                repo: c.repo.clone(),
                provider: c.provider.clone(),
                flag: c.flag.clone(),
            }),
            mend: analysis.mend.as_ref().map(|m| MendModel {
                application_ids: m.application_ids.clone(),
                project_ids: m.project_ids.clone(),
            }),
            sonar_qube: analysis.sonarqube.as_ref().map(|s| SonarQubeModel {
                project: s.project.clone(),
                alias: s.alias.clone(),
            }),
            veracode: analysis.veracode.as_ref().map(|v| VeracodeModel {
                application_names: v.application_names.clone(),
                sandboxes: v
                    .sandboxes
                    .iter()
                    .map(|s| VeracodeSandboxModel {
                        application_name: s.application_name.clone(),
                        sandbox_name: s.sandbox_name.clone(),
                    })
                    .collect(),
            }),
        }
    }
}

pub fn static_analysis_block() -> Block {
    BlockBuilder::new()
        .single(
            "code_cov",
            BlockBuilder::new()
                .attribute(string("owner").required().build())
                .attribute(string("repo").required().build())
                .attribute(string("provider").required().build())
                .attribute(string("flag").optional().build())
                .build(),
        )
        .single(
            "mend",
            BlockBuilder::new()
                .attribute(strings("application_ids").optional().build())
                .attribute(strings("project_ids").optional().build())
                .build(),
        )
        .single(
            "sonar_qube",
            BlockBuilder::new()
                .attribute(string("project").required().build())
                .attribute(string("alias").optional().build())
                .build(),
        )
        .single(
            "veracode",
            BlockBuilder::new()
                .attribute(strings("application_names").optional().build())
                .list(
                    "sandboxes",
                    BlockBuilder::new()
                        .attribute(string("application_name").required().build())
                        .attribute(string("sandbox_name").required().build())
                        .build(),
                )
                .build(),
        )
        .build()
}

// =========================================================================
// CI/CD and Kubernetes
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiCdModel {
    pub buildkite: Option<BuildkiteModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildkiteModel {
    pub pipelines: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl BuildkiteModel {
    pub fn to_api_model(&self) -> Buildkite {
        Buildkite {
            pipelines: self.pipelines.clone().unwrap_or_default(),
            tags: self.tags.clone().unwrap_or_default(),
        }
    }

    pub fn from_api_model(buildkite: &Buildkite, prior: Option<&Self>) -> Self {
        Self {
            pipelines: prior_list(&buildkite.pipelines, prior.map(|p| &p.pipelines)),
            tags: prior_list(&buildkite.tags, prior.map(|p| &p.tags)),
        }
    }
}

pub fn ci_cd_block() -> Block {
    BlockBuilder::new()
        .single(
            "buildkite",
            BlockBuilder::new()
                .attribute(strings("pipelines").optional().build())
                .attribute(strings("tags").optional().build())
                .build(),
        )
        .build()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct K8sModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployments: Vec<K8sResourceModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub argo_rollouts: Vec<K8sResourceModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stateful_sets: Vec<K8sResourceModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cron_jobs: Vec<K8sResourceModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct K8sResourceModel {
    pub identifier: String,
    pub cluster: Option<String>,
}

fn k8s_to_api(resources: &[K8sResourceModel]) -> Vec<K8sResource> {
    resources
        .iter()
        .map(|r| K8sResource {
            identifier: r.identifier.clone(),
            cluster: r.cluster.clone(),
        })
        .collect()
}

fn k8s_from_api(resources: &[K8sResource]) -> Vec<K8sResourceModel> {
    resources
        .iter()
        .map(|r| K8sResourceModel {
            identifier: r.identifier.clone(),
            cluster: r.cluster.clone(),
        })
        .collect()
}

impl K8sModel {
    pub fn to_api_model(&self) -> K8s {
        K8s {
            deployments: k8s_to_api(&self.deployments),
            argo_rollouts: k8s_to_api(&self.argo_rollouts),
            stateful_sets: k8s_to_api(&self.stateful_sets),
            cron_jobs: k8s_to_api(&self.cron_jobs),
        }
    }

    pub fn from_api_model(k8s: &K8s) -> Self {
        Self {
            deployments: k8s_from_api(&k8s.deployments),
            argo_rollouts: k8s_from_api(&k8s.argo_rollouts),
            stateful_sets: k8s_from_api(&k8s.stateful_sets),
            cron_jobs: k8s_from_api(&k8s.cron_jobs),
        }
    }
}

pub fn k8s_block() -> Block {
    let resource = || {
        BlockBuilder::new()
            .attribute(
                string("identifier")
                    .description("namespace/name")
                    .required()
                    .build(),
            )
            .attribute(string("cluster").optional().build())
            .build()
    };
    BlockBuilder::new()
        .list("deployments", resource())
        .list("argo_rollouts", resource())
        .list("stateful_sets", resource())
        .list("cron_jobs", resource())
        .build()
}

// =========================================================================
// Single-project integrations (Bugsnag, Rollbar, Sentry)
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    pub project: String,
}

impl ProjectModel {
    pub fn bugsnag(&self) -> Bugsnag {
        Bugsnag {
            project: self.project.clone(),
        }
    }

    pub fn rollbar(&self) -> Rollbar {
        Rollbar {
            project: self.project.clone(),
        }
    }

    pub fn sentry(&self) -> Sentry {
        Sentry {
            project: self.project.clone(),
        }
    }

    pub fn of(project: &str) -> Self {
        Self {
            project: project.to_string(),
        }
    }
}

pub fn project_block() -> Block {
    BlockBuilder::new()
        .attribute(string("project").required().build())
        .build()
}

// =========================================================================
// Multi-project integrations
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckmarxModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<CheckmarxProjectModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckmarxProjectModel {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl CheckmarxModel {
    pub fn to_api_model(&self) -> Checkmarx {
        Checkmarx {
            projects: self
                .projects
                .iter()
                .map(|p| CheckmarxProject {
                    id: p.id,
                    name: p.name.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(checkmarx: &Checkmarx) -> Self {
        Self {
            projects: checkmarx
                .projects
                .iter()
                .map(|p| CheckmarxProjectModel {
                    id: p.id,
                    name: p.name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoralogixModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub applications: Vec<CoralogixApplicationModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoralogixApplicationModel {
    pub name: String,
    pub alias: Option<String>,
}

impl CoralogixModel {
    pub fn to_api_model(&self) -> Coralogix {
        Coralogix {
            applications: self
                .applications
                .iter()
                .map(|a| CoralogixApplication {
                    name: a.name.clone(),
                    alias: a.alias.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(coralogix: &Coralogix) -> Self {
        Self {
            applications: coralogix
                .applications
                .iter()
                .map(|a| CoralogixApplicationModel {
                    name: a.name.clone(),
                    alias: a.alias.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireHydrantModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<FireHydrantServiceModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireHydrantServiceModel {
    pub identifier: String,
    pub identifier_type: String,
}

impl FireHydrantModel {
    pub fn to_api_model(&self) -> FireHydrant {
        FireHydrant {
            services: self
                .services
                .iter()
                .map(|s| FireHydrantService {
                    identifier: s.identifier.clone(),
                    identifier_type: s.identifier_type.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(firehydrant: &FireHydrant) -> Self {
        Self {
            services: firehydrant
                .services
                .iter()
                .map(|s| FireHydrantServiceModel {
                    identifier: s.identifier.clone(),
                    identifier_type: s.identifier_type.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchDarklyModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<LaunchDarklyProjectModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchDarklyProjectModel {
    pub key: String,
    pub environments: Option<Vec<String>>,
    pub alias: Option<String>,
}

impl LaunchDarklyModel {
    pub fn to_api_model(&self) -> LaunchDarkly {
        LaunchDarkly {
            projects: self
                .projects
                .iter()
                .map(|p| LaunchDarklyProject {
                    key: p.key.clone(),
                    environments: p.environments.clone(),
                    alias: p.alias.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(launch_darkly: &LaunchDarkly) -> Self {
        Self {
            projects: launch_darkly
                .projects
                .iter()
                .map(|p| LaunchDarklyProjectModel {
                    key: p.key.clone(),
                    environments: p.environments.clone(),
                    alias: p.alias.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceNowModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceNowServiceModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceNowServiceModel {
    pub id: i64,
    pub table_name: String,
}

impl ServiceNowModel {
    pub fn to_api_model(&self) -> ServiceNow {
        ServiceNow {
            services: self
                .services
                .iter()
                .map(|s| ServiceNowService {
                    id: s.id,
                    table_name: s.table_name.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(service_now: &ServiceNow) -> Self {
        Self {
            services: service_now
                .services
                .iter()
                .map(|s| ServiceNowServiceModel {
                    id: s.id,
                    table_name: s.table_name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnykModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<SnykProjectModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnykProjectModel {
    pub organization: String,
    pub project_id: String,
    pub source: Option<String>,
}

impl SnykModel {
    pub fn to_api_model(&self) -> Snyk {
        Snyk {
            projects: self
                .projects
                .iter()
                .map(|p| SnykProject {
                    organization: p.organization.clone(),
                    project_id: p.project_id.clone(),
                    source: p.source.clone(),
                })
                .collect(),
        }
    }

    pub fn from_api_model(snyk: &Snyk) -> Self {
        Self {
            projects: snyk
                .projects
                .iter()
                .map(|p| SnykProjectModel {
                    organization: p.organization.clone(),
                    project_id: p.project_id.clone(),
                    source: p.source.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_ids: Vec<String>,
}

pub fn checkmarx_block() -> Block {
    BlockBuilder::new()
        .list(
            "projects",
            BlockBuilder::new()
                .attribute(AttributeBuilder::number("id").optional().build())
                .attribute(string("name").optional().build())
                .build(),
        )
        .build()
}

pub fn coralogix_block() -> Block {
    BlockBuilder::new()
        .list(
            "applications",
            BlockBuilder::new()
                .attribute(string("name").required().build())
                .attribute(string("alias").optional().build())
                .build(),
        )
        .build()
}

pub fn firehydrant_block() -> Block {
    BlockBuilder::new()
        .list(
            "services",
            BlockBuilder::new()
                .attribute(string("identifier").required().build())
                .attribute(string("identifier_type").required().build())
                .build(),
        )
        .build()
}

pub fn launch_darkly_block() -> Block {
    BlockBuilder::new()
        .list(
            "projects",
            BlockBuilder::new()
                .attribute(string("key").required().build())
                .attribute(strings("environments").optional().build())
                .attribute(string("alias").optional().build())
                .build(),
        )
        .build()
}

pub fn service_now_block() -> Block {
    BlockBuilder::new()
        .list(
            "services",
            BlockBuilder::new()
                .attribute(AttributeBuilder::number("id").required().build())
                .attribute(string("table_name").required().build())
                .build(),
        )
        .build()
}

pub fn snyk_block() -> Block {
    BlockBuilder::new()
        .list(
            "projects",
            BlockBuilder::new()
                .attribute(string("organization").required().build())
                .attribute(string("project_id").required().build())
                .attribute(string("source").optional().build())
                .build(),
        )
        .build()
}

pub fn wiz_block() -> Block {
    BlockBuilder::new()
        .attribute(strings("project_ids").required().build())
        .build()
}

// =========================================================================
// Chat
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub channels: Vec<SlackChannelModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackChannelModel {
    pub name: String,
    pub notifications_enabled: bool,
}

impl SlackModel {
    pub fn to_api_model(&self) -> Slack {
        Slack {
            channels: self
                .channels
                .iter()
                .map(|c| SlackChannel {
                    name: c.name.clone(),
                    notifications_enabled: c.notifications_enabled,
                })
                .collect(),
        }
    }

    pub fn from_api_model(slack: &Slack) -> Self {
        Self {
            channels: slack
                .channels
                .iter()
                .map(|c| SlackChannelModel {
                    name: c.name.clone(),
                    notifications_enabled: c.notifications_enabled,
                })
                .collect(),
        }
    }
}

pub fn slack_block() -> Block {
    BlockBuilder::new()
        .list(
            "channels",
            BlockBuilder::new()
                .attribute(string("name").required().build())
                .attribute(AttributeBuilder::bool("notifications_enabled").required().build())
                .build(),
        )
        .build()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicrosoftTeamsModel {
    pub name: String,
    pub description: Option<String>,
    pub notifications_enabled: bool,
}

impl MicrosoftTeamsModel {
    pub fn to_api_model(&self) -> MicrosoftTeamsChannel {
        MicrosoftTeamsChannel {
            name: self.name.clone(),
            description: self.description.clone(),
            notifications_enabled: self.notifications_enabled,
        }
    }

    pub fn from_api_model(channel: &MicrosoftTeamsChannel) -> Self {
        Self {
            name: channel.name.clone(),
            description: channel.description.clone(),
            notifications_enabled: channel.notifications_enabled,
        }
    }
}

pub fn microsoft_teams_block() -> Block {
    BlockBuilder::new()
        .attribute(string("name").required().build())
        .attribute(string("description").optional().build())
        .attribute(AttributeBuilder::bool("notifications_enabled").required().build())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_call_targets_lists_configured_providers() {
        let model = OnCallModel {
            ops_genie: Some(OnCallTargetModel {
                id: "abc".to_string(),
                kind: "SCHEDULE".to_string(),
            }),
            ..OnCallModel::default()
        };
        let targets = model.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, OnCallProvider::OpsGenie);
    }

    #[test]
    fn test_on_call_from_api_sets_one_provider() {
        let model = OnCallModel::from_api_model(&OnCall {
            provider: OnCallProvider::VictorOps,
            id: "team-1".to_string(),
            kind: "SCHEDULE".to_string(),
        });
        assert!(model.pager_duty.is_none());
        assert!(model.ops_genie.is_none());
        assert_eq!(model.victor_ops.unwrap().id, "team-1");
    }

    #[test]
    fn test_slos_round_trip() {
        let model = SlosModel {
            prometheus: vec![PrometheusModel {
                error_query: "errors".to_string(),
                total_query: "total".to_string(),
                slo: 99.9,
                alias: None,
                name: Some("availability".to_string()),
            }],
            sumologic: vec![SloIdModel {
                id: "000000000001234".to_string(),
            }],
            ..SlosModel::default()
        };
        assert_eq!(SlosModel::from_api_model(&model.to_api_model()), model);
    }

    #[test]
    fn test_static_analysis_round_trip() {
        let model = StaticAnalysisModel {
            sonar_qube: Some(SonarQubeModel {
                project: "svc".to_string(),
                alias: None,
            }),
            veracode: Some(VeracodeModel {
                application_names: Some(vec![]),
                sandboxes: vec![VeracodeSandboxModel {
                    application_name: "app".to_string(),
                    sandbox_name: "sandbox".to_string(),
                }],
            }),
            ..StaticAnalysisModel::default()
        };
        assert_eq!(
            StaticAnalysisModel::from_api_model(&model.to_api_model()),
            model
        );
    }

    #[test]
    fn test_buildkite_lists_keep_null_and_empty_apart() {
        let model = BuildkiteModel {
            pipelines: Some(vec!["deploy".to_string()]),
            tags: None,
        };
        let api = model.to_api_model();
        assert!(api.tags.is_empty());
        assert_eq!(BuildkiteModel::from_api_model(&api, Some(&model)), model);

        let explicit = BuildkiteModel {
            tags: Some(vec![]),
            ..model.clone()
        };
        assert_eq!(BuildkiteModel::from_api_model(&api, Some(&explicit)), explicit);
        assert_eq!(BuildkiteModel::from_api_model(&api, None), model);
    }
}
