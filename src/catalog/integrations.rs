//! Third-party integration blocks of a catalog entity
//!
//! Each block mirrors one `x-cortex-*` descriptor key. Optional scalar fields
//! are `Option` so an explicitly empty value survives a round trip.

use super::Enabled;

// =========================================================================
// Issue tracking
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jira {
    pub default_jql: Option<String>,
    pub projects: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub components: Option<Vec<String>>,
}

impl Enabled for Jira {
    fn enabled(&self) -> bool {
        self.default_jql.is_some()
            || self.projects.is_some()
            || self.labels.is_some()
            || self.components.is_some()
    }
}

// =========================================================================
// On-call
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCallProvider {
    PagerDuty,
    OpsGenie,
    VictorOps,
}

impl OnCallProvider {
    pub const ALL: [OnCallProvider; 3] = [
        OnCallProvider::PagerDuty,
        OnCallProvider::OpsGenie,
        OnCallProvider::VictorOps,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OnCallProvider::PagerDuty => "pagerduty",
            OnCallProvider::OpsGenie => "opsgenie",
            OnCallProvider::VictorOps => "victorops",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnCall {
    pub provider: OnCallProvider,
    pub id: String,
    /// SERVICE, SCHEDULE or ESCALATION_POLICY
    pub kind: String,
}

// =========================================================================
// APM
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Apm {
    pub datadog: Option<DatadogApm>,
    pub dynatrace: Option<DynatraceApm>,
    pub new_relic: Vec<NewRelicApplication>,
}

impl Enabled for Apm {
    fn enabled(&self) -> bool {
        self.datadog.is_some() || self.dynatrace.is_some() || self.new_relic.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatadogApm {
    pub monitors: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynatraceApm {
    pub entity_ids: Option<Vec<String>>,
    pub entity_name_matchers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRelicApplication {
    pub application_id: i64,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardEmbed {
    /// grafana, datadog or newrelic
    pub kind: String,
    pub url: String,
}

// =========================================================================
// SLOs
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slos {
    pub datadog: Vec<SloId>,
    pub dynatrace: Vec<SloId>,
    pub lightstep: Vec<LightstepSlo>,
    pub prometheus: Vec<PrometheusSlo>,
    pub signalfx: Vec<SignalFxSlo>,
    pub sumologic: Vec<SloId>,
}

impl Enabled for Slos {
    fn enabled(&self) -> bool {
        self.datadog.enabled()
            || self.dynatrace.enabled()
            || self.lightstep.enabled()
            || self.prometheus.enabled()
            || self.signalfx.enabled()
            || self.sumologic.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SloId {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightstepSlo {
    pub stream_id: String,
    pub latency_targets: Vec<LightstepTarget>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightstepTarget {
    pub percentile: f64,
    pub target: i64,
    pub slo: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrometheusSlo {
    pub error_query: String,
    pub total_query: String,
    pub slo: f64,
    pub alias: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFxSlo {
    pub query: String,
    pub rollup: String,
    pub target: i64,
    pub lookback: String,
    pub operation: String,
}

// =========================================================================
// Static analysis
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticAnalysis {
    pub codecov: Option<CodeCov>,
    pub mend: Option<Mend>,
    pub sonarqube: Option<SonarQube>,
    pub veracode: Option<Veracode>,
}

impl Enabled for StaticAnalysis {
    fn enabled(&self) -> bool {
        self.codecov.is_some()
            || self.mend.is_some()
            || self.sonarqube.is_some()
            || self.veracode.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeCov {
    pub owner: String,
    pub repo: String,
    pub provider: String,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mend {
    pub application_ids: Option<Vec<String>>,
    pub project_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SonarQube {
    pub project: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Veracode {
    pub application_names: Option<Vec<String>>,
    pub sandboxes: Vec<VeracodeSandbox>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VeracodeSandbox {
    pub application_name: String,
    pub sandbox_name: String,
}

// =========================================================================
// CI/CD and runtime
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buildkite {
    pub pipelines: Vec<String>,
    pub tags: Vec<String>,
}

impl Enabled for Buildkite {
    fn enabled(&self) -> bool {
        self.pipelines.enabled() || self.tags.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct K8s {
    pub deployments: Vec<K8sResource>,
    pub argo_rollouts: Vec<K8sResource>,
    pub stateful_sets: Vec<K8sResource>,
    pub cron_jobs: Vec<K8sResource>,
}

impl Enabled for K8s {
    fn enabled(&self) -> bool {
        self.deployments.enabled()
            || self.argo_rollouts.enabled()
            || self.stateful_sets.enabled()
            || self.cron_jobs.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct K8sResource {
    pub identifier: String,
    pub cluster: Option<String>,
}

// =========================================================================
// Named SaaS integrations
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bugsnag {
    pub project: String,
}

impl Enabled for Bugsnag {
    fn enabled(&self) -> bool {
        !self.project.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkmarx {
    pub projects: Vec<CheckmarxProject>,
}

impl Enabled for Checkmarx {
    fn enabled(&self) -> bool {
        self.projects.enabled()
    }
}

/// Checkmarx projects are referenced by id or by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckmarxProject {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coralogix {
    pub applications: Vec<CoralogixApplication>,
}

impl Enabled for Coralogix {
    fn enabled(&self) -> bool {
        self.applications.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoralogixApplication {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireHydrant {
    pub services: Vec<FireHydrantService>,
}

impl Enabled for FireHydrant {
    fn enabled(&self) -> bool {
        self.services.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireHydrantService {
    pub identifier: String,
    /// ID or SLUG
    pub identifier_type: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchDarkly {
    pub projects: Vec<LaunchDarklyProject>,
}

impl Enabled for LaunchDarkly {
    fn enabled(&self) -> bool {
        self.projects.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchDarklyProject {
    pub key: String,
    pub environments: Option<Vec<String>>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MicrosoftTeamsChannel {
    pub name: String,
    pub description: Option<String>,
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollbar {
    pub project: String,
}

impl Enabled for Rollbar {
    fn enabled(&self) -> bool {
        !self.project.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentry {
    pub project: String,
}

impl Enabled for Sentry {
    fn enabled(&self) -> bool {
        !self.project.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceNow {
    pub services: Vec<ServiceNowService>,
}

impl Enabled for ServiceNow {
    fn enabled(&self) -> bool {
        self.services.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceNowService {
    pub id: i64,
    pub table_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slack {
    pub channels: Vec<SlackChannel>,
}

impl Enabled for Slack {
    fn enabled(&self) -> bool {
        self.channels.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlackChannel {
    pub name: String,
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snyk {
    pub projects: Vec<SnykProject>,
}

impl Enabled for Snyk {
    fn enabled(&self) -> bool {
        self.projects.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnykProject {
    pub organization: String,
    pub project_id: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wiz {
    pub project_ids: Vec<String>,
}

impl Enabled for Wiz {
    fn enabled(&self) -> bool {
        self.project_ids.enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks_are_disabled() {
        assert!(!Jira::default().enabled());
        assert!(!Apm::default().enabled());
        assert!(!Slos::default().enabled());
        assert!(!StaticAnalysis::default().enabled());
        assert!(!K8s::default().enabled());
        assert!(!Bugsnag::default().enabled());
        assert!(!Slack::default().enabled());
    }

    #[test]
    fn test_empty_list_field_enables_jira() {
        let jira = Jira {
            labels: Some(vec![]),
            ..Jira::default()
        };
        assert!(jira.enabled());
    }

    #[test]
    fn test_apm_enabled_by_any_vendor() {
        let apm = Apm {
            new_relic: vec![NewRelicApplication {
                application_id: 42,
                alias: None,
            }],
            ..Apm::default()
        };
        assert!(apm.enabled());
    }
}
