//! Cortex Client
//!
//! Combines the HTTP client with the route table. Sub-clients borrow it, so
//! one `CortexClient` (behind an `Arc` in the provider) serves every resource.

use super::custom_data::CustomDataClient;
use super::departments::Departments;
use super::entities::CatalogEntities;
use super::error::ApiResult;
use super::http::{http_debug_enabled, CortexHttpClient};
use super::openapi::OpenApiDocs;
use super::resource_definitions::ResourceDefinitions;
use super::routes::{Domain, Routes};
use super::scorecards::Scorecards;
use super::teams::Teams;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.getcortexapp.com";

/// `User-Agent` sent with every request
pub fn user_agent() -> String {
    format!("terraform-provider-cortex/{}", crate::VERSION)
}

#[derive(Debug, Clone)]
pub struct CortexClient {
    http: CortexHttpClient,
    routes: Routes,
}

impl CortexClient {
    /// Create a client; request logging follows `HTTP_DEBUG`
    pub fn new(base_url: &str, token: &str) -> ApiResult<Self> {
        Self::with_debug(base_url, token, http_debug_enabled())
    }

    pub fn with_debug(base_url: &str, token: &str, http_debug: bool) -> ApiResult<Self> {
        let http = CortexHttpClient::new(token, &user_agent(), http_debug)?;
        tracing::debug!("Cortex client for {} (HTTP debug: {})", base_url, http_debug);

        Ok(Self {
            http,
            routes: Routes::new(base_url),
        })
    }

    pub fn http(&self) -> &CortexHttpClient {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        self.routes.base_url()
    }

    /// Absolute URL for `path` under `domain`
    pub fn url(&self, domain: Domain, path: &str) -> String {
        self.routes.url(domain, path)
    }

    // =========================================================================
    // Sub-clients
    // =========================================================================

    pub fn catalog_entities(&self) -> CatalogEntities<'_> {
        CatalogEntities::new(self)
    }

    pub fn custom_data(&self) -> CustomDataClient<'_> {
        CustomDataClient::new(self)
    }

    pub fn departments(&self) -> Departments<'_> {
        Departments::new(self)
    }

    pub fn openapi(&self) -> OpenApiDocs<'_> {
        OpenApiDocs::new(self)
    }

    pub fn resource_definitions(&self) -> ResourceDefinitions<'_> {
        ResourceDefinitions::new(self)
    }

    pub fn scorecards(&self) -> Scorecards<'_> {
        Scorecards::new(self)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_provider_and_version() {
        assert_eq!(
            user_agent(),
            format!("terraform-provider-cortex/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_urls_use_configured_host() {
        let client = CortexClient::with_debug("http://localhost:8080/", "t", false).unwrap();
        assert_eq!(
            client.url(Domain::Scorecards, "/descriptor"),
            "http://localhost:8080/api/v1/scorecards/descriptor"
        );
    }
}
