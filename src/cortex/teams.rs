//! Team endpoints

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::{segment, Domain};
use crate::catalog::team::{Team, TeamList};

pub struct Teams<'a> {
    client: &'a CortexClient,
}

impl<'a> Teams<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    /// `GET /api/v1/teams/{tag}`
    pub async fn get(&self, tag: &str) -> ApiResult<Team> {
        let url = self.client.url(Domain::Teams, &format!("/{}", segment(tag)));
        self.client.http().get_json(&url, &[]).await
    }

    pub async fn list(&self, include_archived: bool) -> ApiResult<Vec<Team>> {
        let url = self.client.url(Domain::Teams, "");
        let include_archived = include_archived.to_string();
        let list: TeamList = self
            .client
            .http()
            .get_json(&url, &[("includeArchived", include_archived.as_str())])
            .await?;
        Ok(list.teams)
    }

    pub async fn create(&self, team: &Team) -> ApiResult<Team> {
        let url = self.client.url(Domain::Teams, "");
        self.client.http().post(&url, Body::json(team)?).await
    }

    /// `PUT /api/v1/teams/{tag}`
    pub async fn update(&self, team: &Team) -> ApiResult<Team> {
        let url = self
            .client
            .url(Domain::Teams, &format!("/{}", segment(&team.team_tag)));
        self.client.http().put(&url, &[], Body::json(team)?).await
    }

    /// `DELETE /api/v1/teams?teamTag={tag}`
    pub async fn delete(&self, tag: &str) -> ApiResult<()> {
        let url = self.client.url(Domain::Teams, "");
        self.client.http().delete(&url, &[("teamTag", tag)]).await
    }
}
