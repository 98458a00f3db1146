//! Custom data endpoints, scoped to one catalog entity

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use crate::catalog::custom_data::{CustomData, UpsertCustomDataRequest};

pub struct CustomDataClient<'a> {
    client: &'a CortexClient,
}

impl<'a> CustomDataClient<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    fn url(&self, tag: &str, suffix: &str) -> String {
        self.client.url(
            Domain::Catalog,
            &format!("/{}/custom-data{}", segment(tag), suffix),
        )
    }

    /// `GET /api/v1/catalog/{tag}/custom-data/{key}`
    pub async fn get(&self, tag: &str, key: &str) -> ApiResult<CustomData> {
        let url = self.url(tag, &format!("/{}", segment(key)));
        self.client.http().get_json(&url, &[]).await
    }

    pub async fn list(&self, tag: &str) -> ApiResult<Vec<CustomData>> {
        self.client.http().get_json(&self.url(tag, ""), &[]).await
    }

    pub async fn upsert(
        &self,
        tag: &str,
        request: &UpsertCustomDataRequest,
    ) -> ApiResult<CustomData> {
        self.client
            .http()
            .post(&self.url(tag, ""), Body::json(request)?)
            .await
    }

    /// `DELETE /api/v1/catalog/{tag}/custom-data?key={key}`
    pub async fn delete(&self, tag: &str, key: &str) -> ApiResult<()> {
        self.client
            .http()
            .delete(&self.url(tag, ""), &[("key", key)])
            .await
    }
}
