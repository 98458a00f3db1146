//! Scorecard endpoints

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use crate::catalog::scorecard::{Scorecard, ScorecardList, ScorecardResponse, UpsertScorecardRequest};

pub const YAML_CONTENT_TYPE: &str = "application/yaml";

pub struct Scorecards<'a> {
    client: &'a CortexClient,
}

impl<'a> Scorecards<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    /// `GET /api/v1/scorecards/{tag}`
    pub async fn get(&self, tag: &str) -> ApiResult<Scorecard> {
        let url = self
            .client
            .url(Domain::Scorecards, &format!("/{}", segment(tag)));
        let response: ScorecardResponse = self.client.http().get_json(&url, &[]).await?;
        Ok(response.scorecard)
    }

    /// `GET /api/v1/scorecards/{tag}/descriptor`, with descriptor defaults applied
    pub async fn get_descriptor(&self, tag: &str) -> ApiResult<Scorecard> {
        let url = self
            .client
            .url(Domain::Scorecards, &format!("/{}/descriptor", segment(tag)));
        let document = self.client.http().get_yaml(&url, &[]).await?;
        Ok(Scorecard::decode_descriptor(&document)?)
    }

    pub async fn list(&self) -> ApiResult<Vec<Scorecard>> {
        let url = self.client.url(Domain::Scorecards, "");
        let list: ScorecardList = self.client.http().get_json(&url, &[]).await?;
        Ok(list.scorecards)
    }

    /// Create or replace a scorecard from its complete descriptor
    pub async fn upsert(&self, request: &UpsertScorecardRequest) -> ApiResult<Scorecard> {
        let url = self.client.url(Domain::Scorecards, "/descriptor");
        let body = Body::yaml(request.to_yaml()?, YAML_CONTENT_TYPE);
        let response: ScorecardResponse = self.client.http().post(&url, body).await?;
        Ok(response.scorecard)
    }

    pub async fn delete(&self, tag: &str) -> ApiResult<()> {
        let url = self
            .client
            .url(Domain::Scorecards, &format!("/{}", segment(tag)));
        self.client.http().delete(&url, &[]).await
    }
}
