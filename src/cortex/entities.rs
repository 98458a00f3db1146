//! Catalog entity endpoints

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use crate::catalog::descriptor::{decode_entity, entity_to_yaml};
use crate::catalog::entity::{CatalogEntity, CatalogEntityData, CatalogEntityPage};
use serde::Deserialize;

/// Media type the descriptor endpoint expects
pub const OPENAPI_CONTENT_TYPE: &str = "application/openapi;charset=UTF-8";

const DEFAULT_PAGE_SIZE: u32 = 250;

/// Filters for [`CatalogEntities::list`]
#[derive(Debug, Clone, Default)]
pub struct ListEntitiesParams {
    pub types: Vec<String>,
    pub groups: Vec<String>,
    pub include_archived: bool,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpsertEntityResponse {
    pub ok: bool,
    pub tag: Option<String>,
}

pub struct CatalogEntities<'a> {
    client: &'a CortexClient,
}

impl<'a> CatalogEntities<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    /// `GET /api/v1/catalog/{tag}`
    pub async fn get(&self, tag: &str) -> ApiResult<CatalogEntity> {
        let url = self
            .client
            .url(Domain::Catalog, &format!("/{}", segment(tag)));
        self.client.http().get_json(&url, &[]).await
    }

    /// Full descriptor, `GET /api/v1/catalog/{tag}/openapi?yaml=true`
    pub async fn get_descriptor(&self, tag: &str) -> ApiResult<CatalogEntityData> {
        let url = self
            .client
            .url(Domain::Catalog, &format!("/{}/openapi", segment(tag)));
        let document = self.client.http().get_yaml(&url, &[("yaml", "true")]).await?;
        Ok(decode_entity(&document)?)
    }

    /// Every entity matching `params`, following pagination to the last page
    pub async fn list(&self, params: &ListEntitiesParams) -> ApiResult<Vec<CatalogEntity>> {
        let url = self.client.url(Domain::Catalog, "");
        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string();
        let types = params.types.join(",");
        let groups = params.groups.join(",");
        let include_archived = params.include_archived.to_string();

        let mut entities = Vec::new();
        let mut page: u32 = 0;
        loop {
            let page_str = page.to_string();
            let mut query = vec![
                ("page", page_str.as_str()),
                ("pageSize", page_size.as_str()),
                ("includeArchived", include_archived.as_str()),
            ];
            if !types.is_empty() {
                query.push(("types", types.as_str()));
            }
            if !groups.is_empty() {
                query.push(("groups", groups.as_str()));
            }

            let result: CatalogEntityPage = self.client.http().get_json(&url, &query).await?;
            tracing::debug!(
                "catalog page {}/{}: {} entities",
                result.page + 1,
                result.total_pages,
                result.entities.len()
            );
            entities.extend(result.entities);

            page += 1;
            if page >= result.total_pages {
                break;
            }
        }

        Ok(entities)
    }

    /// Replace the entity's descriptor with `data`, creating it if needed
    pub async fn upsert(&self, data: &CatalogEntityData) -> ApiResult<UpsertEntityResponse> {
        let url = self.client.url(Domain::Descriptors, "");
        let document = entity_to_yaml(data)?;
        let body = Body::yaml(document, OPENAPI_CONTENT_TYPE);
        let response: Option<UpsertEntityResponse> = self.client.http().post(&url, body).await?;
        Ok(response.unwrap_or_default())
    }

    /// `DELETE /api/v1/catalog/{tag}`
    pub async fn delete(&self, tag: &str) -> ApiResult<()> {
        let url = self
            .client
            .url(Domain::Catalog, &format!("/{}", segment(tag)));
        self.client.http().delete(&url, &[]).await
    }
}
