//! OpenAPI documentation attached to catalog entities

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiSpec {
    /// The spec document, JSON or YAML
    pub spec: String,
}

pub struct OpenApiDocs<'a> {
    client: &'a CortexClient,
}

impl<'a> OpenApiDocs<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    fn url(&self, tag: &str) -> String {
        self.client.url(
            Domain::Catalog,
            &format!("/{}/documentation/openapi", segment(tag)),
        )
    }

    pub async fn get(&self, tag: &str) -> ApiResult<OpenApiSpec> {
        self.client.http().get_json(&self.url(tag), &[]).await
    }

    /// `PUT /api/v1/catalog/{tag}/documentation/openapi`
    pub async fn upsert(&self, tag: &str, spec: &str) -> ApiResult<OpenApiSpec> {
        let body = Body::json(&OpenApiSpec {
            spec: spec.to_string(),
        })?;
        let response: Option<OpenApiSpec> = self.client.http().put(&self.url(tag), &[], body).await?;
        Ok(response.unwrap_or_else(|| OpenApiSpec {
            spec: spec.to_string(),
        }))
    }

    pub async fn delete(&self, tag: &str) -> ApiResult<()> {
        self.client.http().delete(&self.url(tag), &[]).await
    }
}
