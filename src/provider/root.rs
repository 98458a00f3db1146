//! Provider root
//!
//! Owns the provider configuration, builds the shared client and hands it
//! to resources and data sources looked up by type name.

use super::data_sources;
use super::diagnostics::Diagnostics;
use super::resource::{DataSource, Resource};
use super::resources;
use super::schema::{AttributeBuilder, Schema, SchemaBuilder};
use super::value::decode;
use crate::cortex::client::DEFAULT_BASE_URL;
use crate::cortex::CortexClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Provider type name, the prefix of every resource type
pub const PROVIDER_NAME: &str = "cortex";

pub const API_URL_ENV: &str = "CORTEX_API_URL";
pub const API_TOKEN_ENV: &str = "CORTEX_API_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderModel {
    pub base_api_url: Option<String>,
    pub token: Option<String>,
}

pub fn provider_schema() -> Schema {
    SchemaBuilder::new()
        .description("Manage the Cortex service catalog")
        .attribute(
            AttributeBuilder::string("base_api_url")
                .description("Base URL of the Cortex API. Falls back to CORTEX_API_URL.")
                .optional()
                .default(Value::String(DEFAULT_BASE_URL.to_string()))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("token")
                .description("API token. Falls back to CORTEX_API_TOKEN.")
                .required()
                .sensitive()
                .build(),
        )
        .build()
}

/// Every schema the provider serves, keyed by type name
#[derive(Debug, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<&'static str, Schema>,
    pub data_source_schemas: BTreeMap<&'static str, Schema>,
}

#[derive(Debug, Default)]
pub struct CortexProvider {
    client: Option<Arc<CortexClient>>,
}

impl CortexProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schemas(&self) -> ProviderSchemas {
        ProviderSchemas {
            provider: provider_schema(),
            resource_schemas: resources::all()
                .iter()
                .map(|r| (r.type_name(), r.schema()))
                .collect(),
            data_source_schemas: data_sources::all()
                .iter()
                .map(|d| (d.type_name(), d.schema()))
                .collect(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Configure from the provider block, falling back to the process
    /// environment for null attributes
    pub fn configure(&mut self, config: &Value) -> Diagnostics {
        self.configure_with(config, |name| std::env::var(name).ok())
    }

    pub fn configure_with(
        &mut self,
        config: &Value,
        env: impl Fn(&str) -> Option<String>,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(model) = decode::<ProviderModel>(config, "provider configuration", &mut diags)
        else {
            return diags;
        };

        let base_url = model
            .base_api_url
            .filter(|u| !u.is_empty())
            .or_else(|| env(API_URL_ENV).filter(|u| !u.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if let Err(e) = url::Url::parse(&base_url) {
            diags.attribute_error(
                "base_api_url",
                "Invalid Cortex API URL",
                format!("{:?} is not a valid URL: {}", base_url, e),
            );
            return diags;
        }
        let Some(token) = model
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| env(API_TOKEN_ENV).filter(|t| !t.is_empty()))
        else {
            diags.attribute_error(
                "token",
                "Missing Cortex API Token",
                format!(
                    "Set the token attribute in the provider configuration or the {} environment variable.",
                    API_TOKEN_ENV
                ),
            );
            return diags;
        };

        match CortexClient::new(&base_url, &token) {
            Ok(client) => {
                tracing::info!("Configured Cortex provider for {}", base_url);
                self.client = Some(Arc::new(client));
            }
            Err(e) => diags.error("Unable to Create Cortex API Client", e.to_string()),
        }
        diags
    }

    /// Resource by type name, configured when the provider is
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn Resource>> {
        let mut resource = resources::all()
            .into_iter()
            .find(|r| r.type_name() == type_name)?;
        if let Some(client) = &self.client {
            resource.configure(Arc::clone(client));
        }
        Some(resource)
    }

    /// Data source by type name, configured when the provider is
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        let mut data_source = data_sources::all()
            .into_iter()
            .find(|d| d.type_name() == type_name)?;
        if let Some(client) = &self.client {
            data_source.configure(Arc::clone(client));
        }
        Some(data_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_token_is_an_attribute_error() {
        let mut provider = CortexProvider::new();
        let diags = provider.configure_with(&json!({"base_api_url": null, "token": null}), no_env);
        assert!(diags.has_errors());
        assert_eq!(diags.iter().next().unwrap().attribute.as_deref(), Some("token"));
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_token_falls_back_to_environment() {
        let mut provider = CortexProvider::new();
        let diags = provider.configure_with(&json!({}), |name| {
            (name == API_TOKEN_ENV).then(|| "secret".to_string())
        });
        assert!(!diags.has_errors());
        assert!(provider.is_configured());
    }

    #[test]
    fn test_configured_attribute_wins_over_environment() {
        let mut provider = CortexProvider::new();
        let diags = provider.configure_with(
            &json!({"base_api_url": "http://localhost:9999", "token": "abc"}),
            |_| Some("http://ignored".to_string()),
        );
        assert!(diags.is_empty());
        let client = provider.client.as_ref().unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_malformed_base_url_is_rejected() {
        let mut provider = CortexProvider::new();
        let diags = provider.configure_with(
            &json!({"base_api_url": "not a url", "token": "abc"}),
            no_env,
        );
        assert_eq!(
            diags.iter().next().unwrap().attribute.as_deref(),
            Some("base_api_url")
        );
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_lookup_by_type_name() {
        let provider = CortexProvider::new();
        assert!(provider.resource("cortex_catalog_entity_openapi").is_some());
        assert!(provider.data_source("cortex_catalog_entity_openapi").is_none());
        assert!(provider.resource("cortex_unknown").is_none());
    }

    #[test]
    fn test_schemas_cover_every_registration() {
        let schemas = CortexProvider::new().schemas();
        assert_eq!(schemas.resource_schemas.len(), 7);
        assert_eq!(schemas.data_source_schemas.len(), 6);
        assert!(schemas.provider.block.attribute("token").unwrap().sensitive);
    }
}
