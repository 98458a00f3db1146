//! `cortex_resource_definition` data source

use super::found;
use crate::cortex::CortexClient;
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::{ClientSlot, DataSource, ReadDataSourceRequest, StateResponse};
use crate::provider::resources::resource_definition::{
    resource_definition_schema, ResourceDefinitionResourceModel, TYPE_NAME,
};
use crate::provider::schema::Schema;
use crate::provider::value::decode;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Lookup {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Default)]
pub struct ResourceDefinitionDataSource {
    client: ClientSlot,
}

#[async_trait]
impl DataSource for ResourceDefinitionDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        resource_definition_schema()
            .into_data_source("Look up a resource definition by type", &["type"])
    }

    fn configure(&mut self, client: Arc<CortexClient>) {
        self.client.set(client);
    }

    async fn read(&self, request: ReadDataSourceRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(client) = self.client.get(&mut diags) else {
            return StateResponse::failed(diags);
        };
        let Some(lookup) = decode::<Lookup>(&request.config, "config", &mut diags) else {
            return StateResponse::failed(diags);
        };

        let result = client.resource_definitions().get(&lookup.kind).await;
        found(
            result,
            "resource definition",
            &lookup.kind,
            |definition| ResourceDefinitionResourceModel::from_api_model(definition, None),
            diags,
        )
    }
}
