//! `cortex_catalog_entity` data source

use super::found;
use crate::catalog::entity::CatalogEntity;
use crate::cortex::CortexClient;
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::{ClientSlot, DataSource, ReadDataSourceRequest, StateResponse};
use crate::provider::resources::{link_block, LinkModel};
use crate::provider::schema::{AttributeBuilder, Schema, SchemaBuilder};
use crate::provider::value::{decode, null_as_default};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TYPE_NAME: &str = "cortex_catalog_entity";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntityDataSourceModel {
    pub id: Option<String>,
    pub tag: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub is_archived: Option<bool>,
    pub groups: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LinkModel>,
    /// RFC 3339
    pub last_updated: Option<String>,
}

impl CatalogEntityDataSourceModel {
    pub fn from_api_model(entity: &CatalogEntity) -> Self {
        Self {
            id: Some(entity.tag.clone()),
            tag: entity.tag.clone(),
            name: Some(entity.name.clone()),
            description: entity.description.clone(),
            entity_type: Some(entity.entity_type.clone()),
            is_archived: Some(entity.is_archived),
            groups: Some(entity.groups.clone()),
            links: entity.links.iter().map(LinkModel::from_api_model).collect(),
            last_updated: entity.last_updated.map(|t| t.to_rfc3339()),
        }
    }
}

pub fn catalog_entity_data_source_schema() -> Schema {
    let computed = |name: &str| AttributeBuilder::string(name).computed().build();
    SchemaBuilder::new()
        .attribute(computed("id"))
        .attribute(AttributeBuilder::string("tag").required().build())
        .attribute(computed("name"))
        .attribute(computed("description"))
        .attribute(computed("type"))
        .attribute(AttributeBuilder::bool("is_archived").computed().build())
        .attribute(AttributeBuilder::string_list("groups").computed().build())
        .attribute(computed("last_updated"))
        .list("links", link_block())
        .build()
        .into_data_source("Look up a catalog entity by tag", &["tag"])
}

#[derive(Debug, Default)]
pub struct CatalogEntityDataSource {
    client: ClientSlot,
}

#[async_trait]
impl DataSource for CatalogEntityDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        catalog_entity_data_source_schema()
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn read(&self, request: ReadDataSourceRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(config) =
            decode::<CatalogEntityDataSourceModel>(&request.config, "config", &mut diags)
        else {
            return StateResponse::failed(diags);
        };

        let result = client.catalog_entities().get(&config.tag).await;
        found(
            result,
            "catalog entity",
            &config.tag,
            CatalogEntityDataSourceModel::from_api_model,
            diags,
        )
    }
}
