//! Resource definition endpoints

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use crate::catalog::resource_definition::{ResourceDefinition, ResourceDefinitionList};

pub struct ResourceDefinitions<'a> {
    client: &'a CortexClient,
}

impl<'a> ResourceDefinitions<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    fn type_url(&self, kind: &str) -> String {
        self.client
            .url(Domain::ResourceDefinitions, &format!("/{}", segment(kind)))
    }

    pub async fn get(&self, kind: &str) -> ApiResult<ResourceDefinition> {
        self.client.http().get_json(&self.type_url(kind), &[]).await
    }

    pub async fn list(&self) -> ApiResult<Vec<ResourceDefinition>> {
        let url = self.client.url(Domain::ResourceDefinitions, "");
        let list: ResourceDefinitionList = self.client.http().get_json(&url, &[]).await?;
        Ok(list.definitions)
    }

    pub async fn create(&self, definition: &ResourceDefinition) -> ApiResult<ResourceDefinition> {
        let url = self.client.url(Domain::ResourceDefinitions, "");
        self.client.http().post(&url, Body::json(definition)?).await
    }

    pub async fn update(&self, definition: &ResourceDefinition) -> ApiResult<ResourceDefinition> {
        self.client
            .http()
            .put(&self.type_url(&definition.kind), &[], Body::json(definition)?)
            .await
    }

    pub async fn delete(&self, kind: &str) -> ApiResult<()> {
        self.client.http().delete(&self.type_url(kind), &[]).await
    }
}
