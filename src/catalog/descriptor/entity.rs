//! Catalog entity descriptors
//!
//! ```yaml
//! openapi: 3.0.1
//! info:
//!   title: Payments
//!   x-cortex-tag: payments
//!   x-cortex-type: service
//!   x-cortex-owners:
//!     - type: email
//!       email: payments@example.com
//! ```

use super::{DescriptorError, DescriptorResult, MapBuilder, Node};
use crate::catalog::entity::*;
use crate::catalog::git::GitProvider;
use crate::catalog::integrations::*;
use crate::catalog::owner::{EntityOwner, OwnerKind};
use crate::catalog::Enabled;
use serde_yaml::Value;

const OPENAPI_VERSION: &str = "3.0.1";

/// Parse a YAML descriptor document
pub fn entity_from_yaml(document: &str) -> DescriptorResult<CatalogEntityData> {
    let value: Value = serde_yaml::from_str(document).map_err(DescriptorError::syntax)?;
    decode_entity(&value)
}

/// Render a descriptor document for upsert
pub fn entity_to_yaml(data: &CatalogEntityData) -> DescriptorResult<String> {
    serde_yaml::to_string(&encode_entity(data)).map_err(DescriptorError::syntax)
}

// =========================================================================
// Decoding
// =========================================================================

pub fn decode_entity(document: &Value) -> DescriptorResult<CatalogEntityData> {
    let root = Node::root(document);
    let info_child = root.required("info")?;
    let info = info_child.node();
    info.mapping()?;

    let metadata = match info.get("x-cortex-custom-metadata")? {
        Some(child) => {
            let node = child.node();
            node.mapping()?;
            match node.as_json()? {
                serde_json::Value::Object(map) => Some(map),
                _ => return Err(node.invalid("a map with string keys")),
            }
        }
        None => None,
    };

    let entity_type = info
        .str_field("x-cortex-type")?
        .unwrap_or_else(|| DEFAULT_ENTITY_TYPE.to_string());

    Ok(CatalogEntityData {
        tag: info.required_str("x-cortex-tag")?,
        title: info.str_field("title")?.unwrap_or_default(),
        description: info.str_field("description")?,
        entity_type,
        definition: info
            .get("x-cortex-definition")?
            .map(|c| c.node().as_json())
            .transpose()?,
        owners: info.list_of("x-cortex-owners", decode_owner)?,
        groups: info.string_list("x-cortex-groups")?,
        links: info.list_of("x-cortex-link", decode_link)?,
        metadata,
        dependencies: info.list_of("x-cortex-dependency", decode_dependency)?,
        alerts: info.list_of("x-cortex-alerts", |n| {
            Ok(EntityAlert {
                kind: n.required_str("type")?,
                tag: n.required_str("tag")?,
                value: n.required_str("value")?,
            })
        })?,
        git: info.map_of("x-cortex-git", decode_git)?.flatten(),
        jira: info
            .map_of("x-cortex-issues", |n| n.map_of("jira", decode_jira))?
            .flatten(),
        on_call: info.map_of("x-cortex-oncall", decode_on_call)?.flatten(),
        apm: info.map_of("x-cortex-apm", decode_apm)?.unwrap_or_default(),
        dashboards: info
            .map_of("x-cortex-dashboards", |n| {
                n.list_of("embeds", |e| {
                    Ok(DashboardEmbed {
                        kind: e.required_str("type")?,
                        url: e.required_str("url")?,
                    })
                })
            })?
            .unwrap_or_default(),
        slos: info.map_of("x-cortex-slos", decode_slos)?.unwrap_or_default(),
        static_analysis: info
            .map_of("x-cortex-static-analysis", decode_static_analysis)?
            .unwrap_or_default(),
        buildkite: info
            .map_of("x-cortex-ci-cd", |n| n.map_of("buildkite", decode_buildkite))?
            .flatten(),
        k8s: info.map_of("x-cortex-k8s", decode_k8s)?.unwrap_or_default(),
        bugsnag: info
            .map_of("x-cortex-bugsnag", |n| {
                Ok(Bugsnag {
                    project: n.required_str("project")?,
                })
            })?
            .unwrap_or_default(),
        checkmarx: info
            .map_of("x-cortex-checkmarx", |n| {
                Ok(Checkmarx {
                    projects: n.list_of("projects", |p| {
                        Ok(CheckmarxProject {
                            id: p.i64_field("projectId")?,
                            name: p.str_field("projectName")?,
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        coralogix: info
            .map_of("x-cortex-coralogix", |n| {
                Ok(Coralogix {
                    applications: n.list_of("applications", |a| {
                        Ok(CoralogixApplication {
                            name: a.required_str("applicationName")?,
                            alias: a.str_field("alias")?,
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        firehydrant: info
            .map_of("x-cortex-firehydrant", |n| {
                Ok(FireHydrant {
                    services: n.list_of("services", |s| {
                        Ok(FireHydrantService {
                            identifier: s.required_str("identifier")?,
                            identifier_type: s.required_str("identifierType")?,
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        launch_darkly: info
            .map_of("x-cortex-launch-darkly", |n| {
                Ok(LaunchDarkly {
                    projects: n.list_of("projects", decode_launch_darkly_project)?,
                })
            })?
            .unwrap_or_default(),
        microsoft_teams: info.list_of("x-cortex-microsoft-teams", |n| {
            Ok(MicrosoftTeamsChannel {
                name: n.required_str("name")?,
                description: n.str_field("description")?,
                notifications_enabled: n.bool_field("notificationsEnabled")?.unwrap_or(false),
            })
        })?,
        rollbar: info
            .map_of("x-cortex-rollbar", |n| {
                Ok(Rollbar {
                    project: n.required_str("project")?,
                })
            })?
            .unwrap_or_default(),
        sentry: info
            .map_of("x-cortex-sentry", |n| {
                Ok(Sentry {
                    project: n.required_str("project")?,
                })
            })?
            .unwrap_or_default(),
        service_now: info
            .map_of("x-cortex-servicenow", |n| {
                Ok(ServiceNow {
                    services: n.list_of("services", |s| {
                        Ok(ServiceNowService {
                            id: s.i64_field("id")?.unwrap_or_default(),
                            table_name: s.required_str("tableName")?,
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        slack: info
            .map_of("x-cortex-slack", |n| {
                Ok(Slack {
                    channels: n.list_of("channels", |c| {
                        Ok(SlackChannel {
                            name: c.required_str("name")?,
                            notifications_enabled: c
                                .bool_field("notificationsEnabled")?
                                .unwrap_or(false),
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        snyk: info
            .map_of("x-cortex-snyk", |n| {
                Ok(Snyk {
                    projects: n.list_of("projects", |p| {
                        Ok(SnykProject {
                            organization: p.required_str("organization")?,
                            project_id: p.required_str("projectId")?,
                            source: p.str_field("source")?,
                        })
                    })?,
                })
            })?
            .unwrap_or_default(),
        wiz: info
            .map_of("x-cortex-wiz", |n| {
                Ok(Wiz {
                    project_ids: n.list_of("projects", |p| p.required_str("projectId"))?,
                })
            })?
            .unwrap_or_default(),
        team: info.map_of("x-cortex-team", decode_team)?,
        children: info.list_of("x-cortex-children", |n| n.required_str("tag"))?,
        parents: info.list_of("x-cortex-parents", |n| n.required_str("tag"))?,
    })
}

fn decode_owner(node: Node<'_>) -> DescriptorResult<EntityOwner> {
    let kind_child = node.required("type")?;
    let kind_node = kind_child.node();
    let kind: OwnerKind = kind_node
        .as_string()?
        .parse()
        .map_err(|_| kind_node.invalid(format!("one of {:?}", OwnerKind::ALL)))?;

    let description = node.str_field("description")?;
    Ok(match kind {
        OwnerKind::Email => EntityOwner::Email {
            email: node.required_str("email")?,
            description,
        },
        OwnerKind::Group => EntityOwner::Group {
            name: node.required_str("name")?,
            provider: node.str_field("provider")?,
            description,
            inheritance: node.str_field("inheritance")?,
        },
        OwnerKind::Slack => EntityOwner::Slack {
            channel: node.required_str("channel")?,
            notifications_enabled: node.bool_field("notificationsEnabled")?.unwrap_or(false),
            description,
        },
    })
}

fn decode_link(node: Node<'_>) -> DescriptorResult<EntityLink> {
    Ok(EntityLink {
        name: node.required_str("name")?,
        kind: node.str_field("type")?.unwrap_or_default(),
        url: node.required_str("url")?,
        description: node.str_field("description")?,
    })
}

fn decode_dependency(node: Node<'_>) -> DescriptorResult<EntityDependency> {
    Ok(EntityDependency {
        tag: node.required_str("tag")?,
        method: node.str_field("method")?,
        path: node.str_field("path")?,
        description: node.str_field("description")?,
        metadata: node
            .get("metadata")?
            .map(|c| c.node().as_json())
            .transpose()?,
    })
}

fn decode_git(node: Node<'_>) -> DescriptorResult<Option<GitProvider>> {
    let mut providers = Vec::new();

    if let Some(gh) = node.map_of("github", |n| {
        Ok(GitProvider::Github {
            repository: n.required_str("repository")?,
            base_path: n.str_field("basepath")?,
        })
    })? {
        providers.push(gh);
    }
    if let Some(gl) = node.map_of("gitlab", |n| {
        Ok(GitProvider::Gitlab {
            repository: n.required_str("repository")?,
            base_path: n.str_field("basepath")?,
        })
    })? {
        providers.push(gl);
    }
    if let Some(az) = node.map_of("azure", |n| {
        Ok(GitProvider::AzureDevops {
            project: n.required_str("project")?,
            repository: n.required_str("repository")?,
            base_path: n.str_field("basepath")?,
        })
    })? {
        providers.push(az);
    }
    if let Some(bb) = node.map_of("bitbucket", |n| {
        Ok(GitProvider::Bitbucket {
            repository: n.required_str("repository")?,
        })
    })? {
        providers.push(bb);
    }

    if providers.len() > 1 {
        return Err(node.invalid("at most one git provider"));
    }
    Ok(providers.pop())
}

fn decode_jira(node: Node<'_>) -> DescriptorResult<Jira> {
    Ok(Jira {
        default_jql: node.str_field("defaultJql")?,
        projects: node.string_list("projects")?,
        labels: node.string_list("labels")?,
        components: node.string_list("components")?,
    })
}

fn decode_on_call(node: Node<'_>) -> DescriptorResult<Option<OnCall>> {
    let mut found = None;
    for provider in OnCallProvider::ALL {
        let Some(child) = node.get(provider.key())? else {
            continue;
        };
        if found.is_some() {
            return Err(node.invalid("at most one on-call provider"));
        }
        let n = child.node();
        found = Some(OnCall {
            provider,
            id: n.required_str("id")?,
            kind: n.str_field("type")?.unwrap_or_default(),
        });
    }
    Ok(found)
}

fn decode_apm(node: Node<'_>) -> DescriptorResult<Apm> {
    Ok(Apm {
        datadog: node.map_of("datadog", |n| {
            Ok(DatadogApm {
                monitors: n.list_of("monitors", |m| m.as_i64())?,
            })
        })?,
        dynatrace: node.map_of("dynatrace", |n| {
            Ok(DynatraceApm {
                entity_ids: n.string_list("entityIds")?,
                entity_name_matchers: n.string_list("entityNameMatchers")?,
            })
        })?,
        new_relic: node
            .map_of("newrelic", |n| {
                n.list_of("applications", |a| {
                    Ok(NewRelicApplication {
                        application_id: a.required("applicationId")?.node().as_i64()?,
                        alias: a.str_field("alias")?,
                    })
                })
            })?
            .unwrap_or_default(),
    })
}

fn decode_slo_id(node: Node<'_>) -> DescriptorResult<SloId> {
    Ok(SloId {
        id: node.required_str("id")?,
    })
}

fn decode_slos(node: Node<'_>) -> DescriptorResult<Slos> {
    Ok(Slos {
        datadog: node.list_of("datadog", decode_slo_id)?,
        dynatrace: node.list_of("dynatrace", decode_slo_id)?,
        lightstep: node.list_of("lightstep", |n| {
            Ok(LightstepSlo {
                stream_id: n.required_str("streamId")?,
                latency_targets: n
                    .map_of("targets", |t| {
                        t.list_of("latency", |l| {
                            Ok(LightstepTarget {
                                percentile: l.f64_field("percentile")?.unwrap_or_default(),
                                target: l.i64_field("target")?.unwrap_or_default(),
                                slo: l.f64_field("slo")?.unwrap_or_default(),
                            })
                        })
                    })?
                    .unwrap_or_default(),
            })
        })?,
        prometheus: node.list_of("prometheus", |n| {
            Ok(PrometheusSlo {
                error_query: n.required_str("errorQuery")?,
                total_query: n.required_str("totalQuery")?,
                slo: n.f64_field("slo")?.unwrap_or_default(),
                alias: n.str_field("alias")?,
                name: n.str_field("name")?,
            })
        })?,
        signalfx: node.list_of("signalfx", |n| {
            Ok(SignalFxSlo {
                query: n.required_str("query")?,
                rollup: n.str_field("rollup")?.unwrap_or_default(),
                target: n.i64_field("target")?.unwrap_or_default(),
                lookback: n.str_field("lookback")?.unwrap_or_default(),
                operation: n.str_field("operation")?.unwrap_or_default(),
            })
        })?,
        sumologic: node.list_of("sumologic", decode_slo_id)?,
    })
}

fn decode_static_analysis(node: Node<'_>) -> DescriptorResult<StaticAnalysis> {
    Ok(StaticAnalysis {
        codecov: node.map_of("codecov", |n| {
            Ok(CodeCov {
                owner: n.str_field("owner")?.unwrap_or_default(),
                repo: n.str_field("repo")?.unwrap_or_default(),
                provider: n.str_field("provider")?.unwrap_or_default(),
                flag: n.str_field("flag")?,
            })
        })?,
        mend: node.map_of("mend", |n| {
            Ok(Mend {
                application_ids: n.string_list("applicationIds")?,
                project_ids: n.string_list("projectIds")?,
            })
        })?,
        sonarqube: node.map_of("sonarqube", |n| {
            Ok(SonarQube {
                project: n.required_str("project")?,
                alias: n.str_field("alias")?,
            })
        })?,
        veracode: node.map_of("veracode", |n| {
            Ok(Veracode {
                application_names: n.string_list("applicationNames")?,
                sandboxes: n.list_of("sandboxes", |s| {
                    Ok(VeracodeSandbox {
                        application_name: s.required_str("applicationName")?,
                        sandbox_name: s.required_str("sandboxName")?,
                    })
                })?,
            })
        })?,
    })
}

fn decode_buildkite(node: Node<'_>) -> DescriptorResult<Buildkite> {
    Ok(Buildkite {
        pipelines: node.list_of("pipelines", |p| p.required_str("slug"))?,
        tags: node.list_of("tags", |t| t.required_str("tag"))?,
    })
}

fn decode_k8s_resource(node: Node<'_>) -> DescriptorResult<K8sResource> {
    Ok(K8sResource {
        identifier: node.required_str("identifier")?,
        cluster: node.str_field("cluster")?,
    })
}

fn decode_k8s(node: Node<'_>) -> DescriptorResult<K8s> {
    Ok(K8s {
        deployments: node.list_of("deployment", decode_k8s_resource)?,
        argo_rollouts: node.list_of("argorollout", decode_k8s_resource)?,
        stateful_sets: node.list_of("statefulset", decode_k8s_resource)?,
        cron_jobs: node.list_of("cronjob", decode_k8s_resource)?,
    })
}

fn decode_launch_darkly_project(node: Node<'_>) -> DescriptorResult<LaunchDarklyProject> {
    let environments = match node.get("environments")? {
        Some(child) => Some(
            child
                .node()
                .items()?
                .iter()
                .map(|e| e.node().required_str("environmentName"))
                .collect::<DescriptorResult<Vec<_>>>()?,
        ),
        None => None,
    };

    Ok(LaunchDarklyProject {
        key: node.required_str("key")?,
        environments,
        alias: node.str_field("alias")?,
    })
}

fn decode_team(node: Node<'_>) -> DescriptorResult<TeamDescriptor> {
    Ok(TeamDescriptor {
        groups: node.list_of("groups", |g| {
            Ok(TeamDescriptorGroup {
                name: g.required_str("name")?,
                provider: g.str_field("provider")?.unwrap_or_default(),
            })
        })?,
        members: node.list_of("members", |m| {
            Ok(TeamDescriptorMember {
                name: m.str_field("name")?.unwrap_or_default(),
                email: m.required_str("email")?,
                notifications_enabled: m.bool_field("notificationsEnabled")?.unwrap_or(false),
            })
        })?,
    })
}

// =========================================================================
// Encoding
// =========================================================================

pub fn encode_entity(data: &CatalogEntityData) -> Value {
    let mut info = MapBuilder::new()
        .str("title", &data.title)
        .opt_str("description", data.description.as_deref())
        .str("x-cortex-tag", &data.tag)
        .str("x-cortex-type", &data.entity_type)
        .json("x-cortex-definition", data.definition.as_ref())
        .seq("x-cortex-owners", data.owners.iter().map(encode_owner).collect())
        .opt_strings("x-cortex-groups", data.groups.as_deref())
        .seq("x-cortex-link", data.links.iter().map(encode_link).collect());

    if let Some(metadata) = &data.metadata {
        info = info.json(
            "x-cortex-custom-metadata",
            Some(&serde_json::Value::Object(metadata.clone())),
        );
    }

    info = info
        .seq(
            "x-cortex-dependency",
            data.dependencies.iter().map(encode_dependency).collect(),
        )
        .seq(
            "x-cortex-alerts",
            data.alerts
                .iter()
                .map(|a| {
                    MapBuilder::new()
                        .str("type", &a.kind)
                        .str("tag", &a.tag)
                        .str("value", &a.value)
                        .build()
                })
                .collect(),
        );

    if let Some(git) = &data.git {
        info = info.map("x-cortex-git", encode_git(git));
    }
    if let Some(jira) = data.jira.as_ref().filter(|j| j.enabled()) {
        info = info.map("x-cortex-issues", MapBuilder::new().map("jira", encode_jira(jira)));
    }
    if let Some(on_call) = &data.on_call {
        info = info.map(
            "x-cortex-oncall",
            MapBuilder::new().map(
                on_call.provider.key(),
                MapBuilder::new()
                    .str("id", &on_call.id)
                    .non_empty_str("type", &on_call.kind),
            ),
        );
    }
    if data.apm.enabled() {
        info = info.map("x-cortex-apm", encode_apm(&data.apm));
    }
    info = info.map(
        "x-cortex-dashboards",
        MapBuilder::new().seq(
            "embeds",
            data.dashboards
                .iter()
                .map(|d| MapBuilder::new().str("type", &d.kind).str("url", &d.url).build())
                .collect(),
        ),
    );
    if data.slos.enabled() {
        info = info.map("x-cortex-slos", encode_slos(&data.slos));
    }
    if data.static_analysis.enabled() {
        info = info.map(
            "x-cortex-static-analysis",
            encode_static_analysis(&data.static_analysis),
        );
    }
    if let Some(buildkite) = data.buildkite.as_ref().filter(|b| b.enabled()) {
        info = info.map(
            "x-cortex-ci-cd",
            MapBuilder::new().map("buildkite", encode_buildkite(buildkite)),
        );
    }
    if data.k8s.enabled() {
        info = info.map("x-cortex-k8s", encode_k8s(&data.k8s));
    }

    info = encode_named_integrations(info, data);

    if data.is_team() {
        if let Some(team) = data.team.as_ref().filter(|t| t.enabled()) {
            info = info.map("x-cortex-team", encode_team(team));
        }
    }

    let tag_refs = |tags: &[String]| -> Vec<Value> {
        tags.iter()
            .map(|t| MapBuilder::new().str("tag", t).build())
            .collect()
    };
    info = info
        .seq("x-cortex-children", tag_refs(&data.children))
        .seq("x-cortex-parents", tag_refs(&data.parents));

    MapBuilder::new()
        .str("openapi", OPENAPI_VERSION)
        .value("info", info.build())
        .build()
}

fn encode_owner(owner: &EntityOwner) -> Value {
    let builder = MapBuilder::new().str("type", owner.kind().as_str());
    let builder = match owner {
        EntityOwner::Email { email, .. } => builder.str("email", email),
        EntityOwner::Group {
            name,
            provider,
            inheritance,
            ..
        } => builder
            .str("name", name)
            .opt_str("provider", provider.as_deref())
            .opt_str("inheritance", inheritance.as_deref()),
        EntityOwner::Slack {
            channel,
            notifications_enabled,
            ..
        } => builder
            .str("channel", channel)
            .bool("notificationsEnabled", *notifications_enabled),
    };
    builder
        .opt_str("description", owner.description())
        .build()
}

fn encode_link(link: &EntityLink) -> Value {
    MapBuilder::new()
        .str("name", &link.name)
        .str("type", &link.kind)
        .str("url", &link.url)
        .opt_str("description", link.description.as_deref())
        .build()
}

fn encode_dependency(dep: &EntityDependency) -> Value {
    MapBuilder::new()
        .str("tag", &dep.tag)
        .opt_str("method", dep.method.as_deref())
        .opt_str("path", dep.path.as_deref())
        .opt_str("description", dep.description.as_deref())
        .json("metadata", dep.metadata.as_ref())
        .build()
}

fn encode_git(git: &GitProvider) -> MapBuilder {
    let inner = match git {
        GitProvider::Github {
            repository,
            base_path,
        }
        | GitProvider::Gitlab {
            repository,
            base_path,
        } => MapBuilder::new()
            .str("repository", repository)
            .opt_str("basepath", base_path.as_deref()),
        GitProvider::AzureDevops {
            project,
            repository,
            base_path,
        } => MapBuilder::new()
            .str("project", project)
            .str("repository", repository)
            .opt_str("basepath", base_path.as_deref()),
        GitProvider::Bitbucket { repository } => MapBuilder::new().str("repository", repository),
    };
    MapBuilder::new().map(git.key(), inner)
}

fn encode_jira(jira: &Jira) -> MapBuilder {
    MapBuilder::new()
        .opt_str("defaultJql", jira.default_jql.as_deref())
        .opt_strings("projects", jira.projects.as_deref())
        .opt_strings("labels", jira.labels.as_deref())
        .opt_strings("components", jira.components.as_deref())
}

fn encode_apm(apm: &Apm) -> MapBuilder {
    let mut builder = MapBuilder::new();
    if let Some(datadog) = &apm.datadog {
        builder = builder.value(
            "datadog",
            MapBuilder::new()
                .value(
                    "monitors",
                    Value::Sequence(
                        datadog
                            .monitors
                            .iter()
                            .map(|m| Value::Number((*m).into()))
                            .collect(),
                    ),
                )
                .build(),
        );
    }
    if let Some(dynatrace) = &apm.dynatrace {
        builder = builder.value(
            "dynatrace",
            MapBuilder::new()
                .opt_strings("entityIds", dynatrace.entity_ids.as_deref())
                .opt_strings("entityNameMatchers", dynatrace.entity_name_matchers.as_deref())
                .build(),
        );
    }
    builder.map(
        "newrelic",
        MapBuilder::new().seq(
            "applications",
            apm.new_relic
                .iter()
                .map(|a| {
                    MapBuilder::new()
                        .i64("applicationId", a.application_id)
                        .opt_str("alias", a.alias.as_deref())
                        .build()
                })
                .collect(),
        ),
    )
}

fn encode_slo_ids(ids: &[SloId]) -> Vec<Value> {
    ids.iter()
        .map(|s| MapBuilder::new().str("id", &s.id).build())
        .collect()
}

fn encode_slos(slos: &Slos) -> MapBuilder {
    MapBuilder::new()
        .seq("datadog", encode_slo_ids(&slos.datadog))
        .seq("dynatrace", encode_slo_ids(&slos.dynatrace))
        .seq(
            "lightstep",
            slos.lightstep
                .iter()
                .map(|l| {
                    MapBuilder::new()
                        .str("streamId", &l.stream_id)
                        .map(
                            "targets",
                            MapBuilder::new().seq(
                                "latency",
                                l.latency_targets
                                    .iter()
                                    .map(|t| {
                                        MapBuilder::new()
                                            .f64("percentile", t.percentile)
                                            .i64("target", t.target)
                                            .f64("slo", t.slo)
                                            .build()
                                    })
                                    .collect(),
                            ),
                        )
                        .build()
                })
                .collect(),
        )
        .seq(
            "prometheus",
            slos.prometheus
                .iter()
                .map(|p| {
                    MapBuilder::new()
                        .str("errorQuery", &p.error_query)
                        .str("totalQuery", &p.total_query)
                        .f64("slo", p.slo)
                        .opt_str("alias", p.alias.as_deref())
                        .opt_str("name", p.name.as_deref())
                        .build()
                })
                .collect(),
        )
        .seq(
            "signalfx",
            slos.signalfx
                .iter()
                .map(|s| {
                    MapBuilder::new()
                        .str("query", &s.query)
                        .non_empty_str("rollup", &s.rollup)
                        .i64("target", s.target)
                        .non_empty_str("lookback", &s.lookback)
                        .non_empty_str("operation", &s.operation)
                        .build()
                })
                .collect(),
        )
        .seq("sumologic", encode_slo_ids(&slos.sumologic))
}

fn encode_static_analysis(sa: &StaticAnalysis) -> MapBuilder {
    let mut builder = MapBuilder::new();
    if let Some(codecov) = &sa.codecov {
        builder = builder.value(
            "codecov",
            MapBuilder::new()
                .non_empty_str("owner", &codecov.owner)
                .non_empty_str("repo", &codecov.repo)
                .non_empty_str("provider", &codecov.provider)
                .opt_str("flag", codecov.flag.as_deref())
                .build(),
        );
    }
    if let Some(mend) = &sa.mend {
        builder = builder.value(
            "mend",
            MapBuilder::new()
                .opt_strings("applicationIds", mend.application_ids.as_deref())
                .opt_strings("projectIds", mend.project_ids.as_deref())
                .build(),
        );
    }
    if let Some(sonarqube) = &sa.sonarqube {
        builder = builder.value(
            "sonarqube",
            MapBuilder::new()
                .str("project", &sonarqube.project)
                .opt_str("alias", sonarqube.alias.as_deref())
                .build(),
        );
    }
    if let Some(veracode) = &sa.veracode {
        builder = builder.value(
            "veracode",
            MapBuilder::new()
                .opt_strings("applicationNames", veracode.application_names.as_deref())
                .seq(
                    "sandboxes",
                    veracode
                        .sandboxes
                        .iter()
                        .map(|s| {
                            MapBuilder::new()
                                .str("applicationName", &s.application_name)
                                .str("sandboxName", &s.sandbox_name)
                                .build()
                        })
                        .collect(),
                )
                .build(),
        );
    }
    builder
}

fn encode_buildkite(buildkite: &Buildkite) -> MapBuilder {
    MapBuilder::new()
        .seq(
            "pipelines",
            buildkite
                .pipelines
                .iter()
                .map(|p| MapBuilder::new().str("slug", p).build())
                .collect(),
        )
        .seq(
            "tags",
            buildkite
                .tags
                .iter()
                .map(|t| MapBuilder::new().str("tag", t).build())
                .collect(),
        )
}

fn encode_k8s_resources(resources: &[K8sResource]) -> Vec<Value> {
    resources
        .iter()
        .map(|r| {
            MapBuilder::new()
                .str("identifier", &r.identifier)
                .opt_str("cluster", r.cluster.as_deref())
                .build()
        })
        .collect()
}

fn encode_k8s(k8s: &K8s) -> MapBuilder {
    MapBuilder::new()
        .seq("deployment", encode_k8s_resources(&k8s.deployments))
        .seq("argorollout", encode_k8s_resources(&k8s.argo_rollouts))
        .seq("statefulset", encode_k8s_resources(&k8s.stateful_sets))
        .seq("cronjob", encode_k8s_resources(&k8s.cron_jobs))
}

fn encode_named_integrations(info: MapBuilder, data: &CatalogEntityData) -> MapBuilder {
    info.map(
        "x-cortex-bugsnag",
        MapBuilder::new().non_empty_str("project", &data.bugsnag.project),
    )
    .map(
        "x-cortex-checkmarx",
        MapBuilder::new().seq(
            "projects",
            data.checkmarx
                .projects
                .iter()
                .map(|p| {
                    MapBuilder::new()
                        .opt_i64("projectId", p.id)
                        .opt_str("projectName", p.name.as_deref())
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-coralogix",
        MapBuilder::new().seq(
            "applications",
            data.coralogix
                .applications
                .iter()
                .map(|a| {
                    MapBuilder::new()
                        .str("applicationName", &a.name)
                        .opt_str("alias", a.alias.as_deref())
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-firehydrant",
        MapBuilder::new().seq(
            "services",
            data.firehydrant
                .services
                .iter()
                .map(|s| {
                    MapBuilder::new()
                        .str("identifier", &s.identifier)
                        .str("identifierType", &s.identifier_type)
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-launch-darkly",
        MapBuilder::new().seq(
            "projects",
            data.launch_darkly
                .projects
                .iter()
                .map(|p| {
                    let mut project = MapBuilder::new().str("key", &p.key);
                    if let Some(envs) = &p.environments {
                        project = project.value(
                            "environments",
                            Value::Sequence(
                                envs.iter()
                                    .map(|e| MapBuilder::new().str("environmentName", e).build())
                                    .collect(),
                            ),
                        );
                    }
                    project.opt_str("alias", p.alias.as_deref()).build()
                })
                .collect(),
        ),
    )
    .seq(
        "x-cortex-microsoft-teams",
        data.microsoft_teams
            .iter()
            .map(|c| {
                MapBuilder::new()
                    .str("name", &c.name)
                    .opt_str("description", c.description.as_deref())
                    .bool("notificationsEnabled", c.notifications_enabled)
                    .build()
            })
            .collect(),
    )
    .map(
        "x-cortex-rollbar",
        MapBuilder::new().non_empty_str("project", &data.rollbar.project),
    )
    .map(
        "x-cortex-sentry",
        MapBuilder::new().non_empty_str("project", &data.sentry.project),
    )
    .map(
        "x-cortex-servicenow",
        MapBuilder::new().seq(
            "services",
            data.service_now
                .services
                .iter()
                .map(|s| {
                    MapBuilder::new()
                        .i64("id", s.id)
                        .str("tableName", &s.table_name)
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-slack",
        MapBuilder::new().seq(
            "channels",
            data.slack
                .channels
                .iter()
                .map(|c| {
                    MapBuilder::new()
                        .str("name", &c.name)
                        .bool("notificationsEnabled", c.notifications_enabled)
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-snyk",
        MapBuilder::new().seq(
            "projects",
            data.snyk
                .projects
                .iter()
                .map(|p| {
                    MapBuilder::new()
                        .str("organization", &p.organization)
                        .str("projectId", &p.project_id)
                        .opt_str("source", p.source.as_deref())
                        .build()
                })
                .collect(),
        ),
    )
    .map(
        "x-cortex-wiz",
        MapBuilder::new().seq(
            "projects",
            data.wiz
                .project_ids
                .iter()
                .map(|p| MapBuilder::new().str("projectId", p).build())
                .collect(),
        ),
    )
}

fn encode_team(team: &TeamDescriptor) -> MapBuilder {
    MapBuilder::new()
        .seq(
            "groups",
            team.groups
                .iter()
                .map(|g| {
                    MapBuilder::new()
                        .str("name", &g.name)
                        .non_empty_str("provider", &g.provider)
                        .build()
                })
                .collect(),
        )
        .seq(
            "members",
            team.members
                .iter()
                .map(|m| {
                    MapBuilder::new()
                        .non_empty_str("name", &m.name)
                        .str("email", &m.email)
                        .bool("notificationsEnabled", m.notifications_enabled)
                        .build()
                })
                .collect(),
        )
}
