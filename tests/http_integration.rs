//! Integration tests for the Cortex client using wiremock
//!
//! These tests drive the client and resources against mocked endpoints,
//! checking routes, request bodies and status code handling.

use serde_json::json;
use terraform_provider_cortex::catalog::entity::CatalogEntityData;
use terraform_provider_cortex::catalog::scorecard::{Scorecard, UpsertScorecardRequest};
use terraform_provider_cortex::cortex::{ApiError, CortexClient};
use terraform_provider_cortex::provider::resource::{
    CreateRequest, DeleteRequest, ImportStateRequest, ReadDataSourceRequest, ReadRequest,
};
use terraform_provider_cortex::provider::CortexProvider;
use wiremock::matchers::{bearer_token, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CortexClient {
    CortexClient::with_debug(&server.uri(), "test-token", false).expect("client should build")
}

fn provider(server: &MockServer) -> CortexProvider {
    let mut provider = CortexProvider::new();
    let diags = provider.configure(&json!({
        "base_api_url": server.uri(),
        "token": "test-token",
    }));
    assert!(!diags.has_errors(), "configure failed: {:?}", diags);
    provider
}

/// Status code handling
mod status_tests {
    use super::*;

    #[tokio::test]
    async fn test_404_is_not_found_only() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "type": "NOT_FOUND",
                "message": "Team not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server).teams().get("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "resource not found");
    }

    #[tokio::test]
    async fn test_401_message_carries_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/platform"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "UNAUTHORIZED",
                "details": "token expired",
                "message": "Invalid credentials",
                "httpStatus": 401,
                "requestId": "req-42"
            })))
            .mount(&server)
            .await;

        let err = client(&server).teams().get("platform").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        let message = err.to_string();
        assert!(message.contains("unauthorized"));
        assert!(message.contains("UNAUTHORIZED"));
        assert!(message.contains("token expired"));
        assert!(message.contains("Invalid credentials"));
        assert!(message.contains("req-42"));
    }

    #[tokio::test]
    async fn test_other_status_includes_code_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/platform"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
            .mount(&server)
            .await;

        let err = client(&server).teams().get("platform").await.unwrap_err();
        match &err {
            ApiError::Status { status, body } => {
                assert_eq!(*status, 500);
                assert!(body.contains("internal failure"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/platform"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client(&server).teams().get("platform").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { format: "JSON", .. }));
    }
}

/// Routes and request bodies
mod route_tests {
    use super::*;

    #[tokio::test]
    async fn test_scorecard_upsert_posts_yaml_descriptor() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/scorecards/descriptor"))
            .and(bearer_token("test-token"))
            .and(header("content-type", "application/yaml"))
            .and(body_string_contains("tag: test-scorecard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"scorecard": {"tag": "test-scorecard"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let scorecard = Scorecard {
            tag: "test-scorecard".to_string(),
            name: "Test Scorecard".to_string(),
            ..Scorecard::default()
        };
        let written = client(&server)
            .scorecards()
            .upsert(&UpsertScorecardRequest::from(&scorecard))
            .await
            .expect("upsert should succeed");

        assert_eq!(written.tag, "test-scorecard");
    }

    #[tokio::test]
    async fn test_entity_upsert_sends_openapi_descriptor() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/open-api"))
            .and(header("content-type", "application/openapi;charset=UTF-8"))
            .and(body_string_contains("x-cortex-tag: payments"))
            .and(body_string_contains("x-cortex-type: service"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "tag": "payments"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = CatalogEntityData::new("payments", "Payments");
        let response = client(&server)
            .catalog_entities()
            .upsert(&data)
            .await
            .expect("upsert should succeed");

        assert_eq!(response.tag.as_deref(), Some("payments"));
    }

    #[tokio::test]
    async fn test_department_lookup_uses_query_parameter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/departments"))
            .and(query_param("departmentTag", "engineering"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "departmentTag": "engineering",
                "name": "Engineering",
                "members": [{"name": "Ada", "email": "ada@example.com"}]
            })))
            .mount(&server)
            .await;

        let department = client(&server)
            .departments()
            .get("engineering")
            .await
            .expect("get should succeed");

        assert_eq!(department.name, "Engineering");
        assert_eq!(department.members.len(), 1);
        assert_eq!(department.description, None);
    }

    #[tokio::test]
    async fn test_team_delete_uses_query_parameter() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/teams"))
            .and(query_param("teamTag", "platform"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .teams()
            .delete("platform")
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn test_custom_data_delete_passes_key_as_query() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/catalog/payments/custom-data"))
            .and(query_param("key", "owner:primary"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .custom_data()
            .delete("payments", "owner:primary")
            .await
            .expect("delete should succeed");
    }
}

/// Resource and data source behavior over HTTP
mod resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_custom_data_read_404_removes_silently() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/payments/custom-data/tier"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_catalog_entity_custom_data")
            .expect("resource registered");
        let response = resource
            .read(ReadRequest {
                current_state: json!({
                    "id": "payments:tier",
                    "tag": "payments",
                    "key": "tier",
                    "value": "\"gold\"",
                    "description": null,
                    "source": "API",
                    "date_updated": null
                }),
            })
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_department_create_returns_state() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/teams/departments"))
            .and(body_string_contains("\"departmentTag\":\"engineering\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "departmentTag": "engineering",
                "name": "Engineering",
                "members": []
            })))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_department")
            .expect("resource registered");
        let planned_state = json!({
            "id": null,
            "tag": "engineering",
            "name": "Engineering",
            "description": null,
            "members": []
        });
        let response = resource
            .create(CreateRequest {
                config: planned_state.clone(),
                planned_state,
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state["id"], "engineering");
        assert_eq!(state["name"], "Engineering");
    }

    #[tokio::test]
    async fn test_team_delete_of_missing_team_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/teams"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_team")
            .expect("resource registered");
        let response = resource
            .delete(DeleteRequest {
                prior_state: json!({"id": "platform", "tag": "platform", "name": "Platform"}),
            })
            .await;

        assert!(!response.diagnostics.has_errors());
    }

    #[tokio::test]
    async fn test_import_of_missing_department_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/departments"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_department")
            .expect("resource registered");
        let response = resource
            .import_state(ImportStateRequest {
                id: "ghost".to_string(),
            })
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
    }

    #[tokio::test]
    async fn test_catalog_entity_data_source_reads_summary() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tag": "payments",
                "name": "Payments",
                "description": "Takes money",
                "type": "service",
                "isArchived": false,
                "groups": ["tier-1"],
                "links": [],
                "lastUpdated": "2024-05-01T12:00:00Z"
            })))
            .mount(&server)
            .await;

        let data_source = provider(&server)
            .data_source("cortex_catalog_entity")
            .expect("data source registered");
        let response = data_source
            .read(ReadDataSourceRequest {
                config: json!({"tag": "payments"}),
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state["name"], "Payments");
        assert_eq!(state["groups"], json!(["tier-1"]));
        assert_eq!(state["last_updated"], "2024-05-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn test_data_source_404_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let data_source = provider(&server)
            .data_source("cortex_team")
            .expect("data source registered");
        let response = data_source
            .read(ReadDataSourceRequest {
                config: json!({"tag": "ghost"}),
            })
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
    }
}

/// List endpoints and pagination
mod list_tests {
    use super::*;
    use terraform_provider_cortex::cortex::entities::ListEntitiesParams;

    #[tokio::test]
    async fn test_entity_list_follows_pages() {
        let server = MockServer::start().await;

        for page in 0..2 {
            Mock::given(method("GET"))
                .and(path("/api/v1/catalog"))
                .and(query_param("page", page.to_string()))
                .and(query_param("types", "service,domain"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "entities": [{"tag": format!("svc-{}", page), "name": "Service", "type": "service"}],
                    "page": page,
                    "totalPages": 2,
                    "total": 2
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let params = ListEntitiesParams {
            types: vec!["service".to_string(), "domain".to_string()],
            ..ListEntitiesParams::default()
        };
        let entities = client(&server)
            .catalog_entities()
            .list(&params)
            .await
            .expect("list should succeed");

        let tags: Vec<_> = entities.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["svc-0", "svc-1"]);
    }

    #[tokio::test]
    async fn test_team_list_passes_archived_flag() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams"))
            .and(query_param("includeArchived", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "teams": [{
                    "teamTag": "platform",
                    "metadata": {"name": "Platform"},
                    "type": "CORTEX",
                    "cortexTeam": {"members": []},
                    "isArchived": true
                }]
            })))
            .mount(&server)
            .await;

        let teams = client(&server).teams().list(true).await.expect("list");
        assert_eq!(teams.len(), 1);
        assert!(teams[0].is_archived);
    }

    #[tokio::test]
    async fn test_scorecard_get_and_list_apply_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/scorecards/test-scorecard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"scorecard": {"tag": "test-scorecard"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/scorecards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scorecards": [{"tag": "a"}, {"tag": "b"}]
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let scorecard = client.scorecards().get("test-scorecard").await.expect("get");
        assert_eq!(scorecard.evaluation.window, 4);
        assert_eq!(client.scorecards().list().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn test_resource_definition_and_custom_data_lists() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/definitions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "definitions": [{
                    "type": "queue",
                    "name": "Queue",
                    "schema": {"type": "object"},
                    "source": "CUSTOM"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/payments/custom-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"key": "tier", "value": "gold"},
                {"key": "limits", "value": {"rps": 100}}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let definitions = client.resource_definitions().list().await.expect("list");
        assert_eq!(definitions[0].kind, "queue");
        assert_eq!(definitions[0].schema, json!({"type": "object"}));

        let data = client.custom_data().list("payments").await.expect("list");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].value, json!({"rps": 100}));
    }

    #[tokio::test]
    async fn test_openapi_upsert_with_empty_response_echoes_spec() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/catalog/payments/documentation/openapi"))
            .and(body_string_contains("openapi: 3.0.1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let written = client(&server)
            .openapi()
            .upsert("payments", "openapi: 3.0.1\ninfo:\n  title: Payments\n")
            .await
            .expect("upsert");
        assert!(written.spec.starts_with("openapi: 3.0.1"));
    }
}

/// Descriptor-backed resources: upsert, re-read and removal
mod descriptor_resource_tests {
    use super::*;

    const PAYMENTS_DESCRIPTOR: &str = r#"
openapi: 3.0.1
info:
  title: Payments
  x-cortex-tag: payments
  x-cortex-type: service
  x-cortex-ci-cd:
    buildkite:
      pipelines:
        - slug: deploy
"#;

    const SCORECARD_DESCRIPTOR: &str = r#"
tag: test-scorecard
name: Test Scorecard
description: ''
rules:
  - title: Has owners
    expression: ownership != null
    weight: 1
    failureMessage: ''
filter:
  types:
    include:
      - service
"#;

    fn planned_entity() -> serde_json::Value {
        json!({
            "id": null,
            "tag": "payments",
            "name": "Payments",
            "type": "service",
            "groups": null,
            "children": null,
            "parents": null,
            "ci_cd": {
                "buildkite": {"pipelines": ["deploy"], "tags": null}
            }
        })
    }

    fn planned_scorecard() -> serde_json::Value {
        json!({
            "id": null,
            "tag": "test-scorecard",
            "name": "Test Scorecard",
            "description": null,
            "draft": false,
            "notifications": null,
            "ladder": null,
            "rules": [{
                "title": "Has owners",
                "expression": "ownership != null",
                "description": null,
                "weight": 1,
                "level": null,
                "failure_message": null
            }],
            "filter": {
                "category": null,
                "query": null,
                "types": {"include": ["service"], "exclude": null},
                "groups": null
            },
            "evaluation": null
        })
    }

    async fn mount_entity_descriptor(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/payments/openapi"))
            .and(query_param("yaml", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAYMENTS_DESCRIPTOR))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_scorecard_descriptor(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/scorecards/test-scorecard/descriptor"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SCORECARD_DESCRIPTOR))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_entity_create_reads_back_descriptor() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/open-api"))
            .and(body_string_contains("x-cortex-tag: payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "tag": "payments"
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_entity_descriptor(&server).await;

        let resource = provider(&server)
            .resource("cortex_catalog_entity")
            .expect("resource registered");
        let planned_state = planned_entity();
        let response = resource
            .create(CreateRequest {
                config: planned_state.clone(),
                planned_state,
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state["id"], "payments");
        assert_eq!(state["type"], "service");
        assert_eq!(state["ci_cd"]["buildkite"]["pipelines"], json!(["deploy"]));
        assert_eq!(state["ci_cd"]["buildkite"]["tags"], serde_json::Value::Null);
        assert_eq!(state["children"], serde_json::Value::Null);
        assert_eq!(state["git"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_entity_upsert_without_tag_uses_planned_tag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/open-api"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_entity_descriptor(&server).await;

        let resource = provider(&server)
            .resource("cortex_catalog_entity")
            .expect("resource registered");
        let planned_state = planned_entity();
        let response = resource
            .create(CreateRequest {
                config: planned_state.clone(),
                planned_state,
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.state.expect("state")["tag"], "payments");
    }

    #[tokio::test]
    async fn test_entity_read_404_removes_silently() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/catalog/payments/openapi"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_catalog_entity")
            .expect("resource registered");
        let response = resource
            .read(ReadRequest {
                current_state: json!({"id": "payments", "tag": "payments", "name": "Payments"}),
            })
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_scorecard_create_reads_back_descriptor() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/scorecards/descriptor"))
            .and(body_string_contains("tag: test-scorecard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"scorecard": {"tag": "test-scorecard"}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_scorecard_descriptor(&server).await;

        let resource = provider(&server)
            .resource("cortex_scorecard")
            .expect("resource registered");
        let planned_state = planned_scorecard();
        let response = resource
            .create(CreateRequest {
                config: planned_state.clone(),
                planned_state: planned_state.clone(),
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state["filter"], planned_state["filter"]);
        assert_eq!(state["rules"], planned_state["rules"]);
        assert_eq!(state["description"], serde_json::Value::Null);
        assert_eq!(state["notifications"], serde_json::Value::Null);
        assert_eq!(state["evaluation"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_scorecard_upsert_without_tag_uses_planned_tag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/scorecards/descriptor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scorecard": {}})))
            .expect(1)
            .mount(&server)
            .await;
        mount_scorecard_descriptor(&server).await;

        let resource = provider(&server)
            .resource("cortex_scorecard")
            .expect("resource registered");
        let planned_state = planned_scorecard();
        let response = resource
            .create(CreateRequest {
                config: planned_state.clone(),
                planned_state,
            })
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.state.expect("state")["tag"], "test-scorecard");
    }

    #[tokio::test]
    async fn test_scorecard_read_404_removes_silently() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/scorecards/test-scorecard/descriptor"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = provider(&server)
            .resource("cortex_scorecard")
            .expect("resource registered");
        let response = resource
            .read(ReadRequest {
                current_state: planned_scorecard(),
            })
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.is_empty());
    }
}
