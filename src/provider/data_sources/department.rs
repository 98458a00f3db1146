//! `cortex_department` data source

use super::found;
use crate::cortex::CortexClient;
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::{ClientSlot, DataSource, ReadDataSourceRequest, StateResponse};
use crate::provider::resources::department::{
    department_schema, DepartmentResourceModel, TYPE_NAME,
};
use crate::provider::schema::Schema;
use crate::provider::value::decode;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Lookup {
    tag: String,
}

#[derive(Debug, Default)]
pub struct DepartmentDataSource {
    client: ClientSlot,
}

#[async_trait]
impl DataSource for DepartmentDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        department_schema().into_data_source("Look up a department by tag", &["tag"])
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

        let result = client.departments().get(&lookup.tag).await;
        found(
            result,
            "department",
            &lookup.tag,
            DepartmentResourceModel::from_api_model,
            diags,
        )
    }
}
