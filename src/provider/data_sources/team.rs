//! `cortex_team` data source

use super::found;
use crate::cortex::CortexClient;
use crate::provider::diagnostics::Diagnostics;
use crate::provider::resource::{ClientSlot, DataSource, ReadDataSourceRequest, StateResponse};
use crate::provider::resources::team::{team_schema, TeamResourceModel, TYPE_NAME};
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
pub struct TeamDataSource {
    client: ClientSlot,
}

#[async_trait]
impl DataSource for TeamDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        team_schema().into_data_source("Look up a team by tag", &["tag"])
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

        let result = client.teams().get(&lookup.tag).await;
        found(
            result,
            "team",
            &lookup.tag,
            |team| TeamResourceModel::from_api_model(team, None),
            diags,
        )
    }
}
