//! `cortex_catalog_entity_custom_data` data source

use super::found;
use crate::cortex::CortexClient;
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::{ClientSlot, DataSource, ReadDataSourceRequest, StateResponse};
use crate::provider::resources::catalog_entity_custom_data::{
    custom_data_schema, format_id, CustomDataResourceModel, TYPE_NAME,
};
use crate::provider::schema::Schema;
use crate::provider::value::decode;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Lookup {
    tag: String,
    key: String,
}

#[derive(Debug, Default)]
pub struct CustomDataDataSource {
    client: ClientSlot,
}

#[async_trait]
impl DataSource for CustomDataDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        custom_data_schema().into_data_source("Look up one custom data key", &["tag", "key"])
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

        let result = client.custom_data().get(&lookup.tag, &lookup.key).await;
        found(
            result,
            "custom data",
            &format_id(&lookup.tag, &lookup.key),
            |data| CustomDataResourceModel::from_api_model(&lookup.tag, data, None),
            diags,
        )
    }
}
