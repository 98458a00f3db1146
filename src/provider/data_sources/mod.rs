//! Data sources
//!
//! Read-only lookups. Most reuse the matching resource's model and a
//! computed copy of its schema; the catalog entity data source returns the
//! lighter summary from `GET /api/v1/catalog/{tag}`.

pub mod catalog_entity;
pub mod catalog_entity_custom_data;
pub mod department;
pub mod resource_definition;
pub mod scorecard;
pub mod team;

use super::diagnostics::Diagnostics;
use super::resource::{DataSource, StateResponse};
use super::value::encode;
use crate::cortex::ApiResult;
use serde::Serialize;

/// Fresh, unconfigured instances of every data source
pub fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(catalog_entity::CatalogEntityDataSource::default()),
        Box::new(catalog_entity_custom_data::CustomDataDataSource::default()),
        Box::new(department::DepartmentDataSource::default()),
        Box::new(resource_definition::ResourceDefinitionDataSource::default()),
        Box::new(scorecard::ScorecardDataSource::default()),
        Box::new(team::TeamDataSource::default()),
    ]
}

/// Encode a looked-up object as state. A missing object is an error for a
/// data source, unlike a resource read.
pub(crate) fn found<T, M: Serialize>(
    result: ApiResult<T>,
    what: &str,
    id: &str,
    convert: impl FnOnce(&T) -> M,
    mut diags: Diagnostics,
) -> StateResponse {
    match result {
        Ok(object) => {
            tracing::debug!("read {} {}", what, id);
            let state = encode(&convert(&object), &mut diags);
            StateResponse::state(state, diags)
        }
        Err(e) if e.is_not_found() => {
            diags.error(
                format!("{} not found", what),
                format!("No {} exists with identifier {:?}", what, id),
            );
            StateResponse::failed(diags)
        }
        Err(e) => {
            diags.api_error(&format!("read {}", what), &e);
            StateResponse::failed(diags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cortex::ApiError;
    use crate::provider::resource::ReadDataSourceRequest;

    #[test]
    fn test_data_source_names_match_resources() {
        let resources: Vec<_> = crate::provider::resources::all()
            .iter()
            .map(|r| r.type_name())
            .collect();
        for data_source in all() {
            assert!(resources.contains(&data_source.type_name()));
        }
    }

    #[test]
    fn test_missing_object_is_an_error() {
        let response = found(
            Err::<(), _>(ApiError::NotFound),
            "team",
            "platform",
            |_| (),
            Diagnostics::new(),
        );
        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
    }

    #[test]
    fn test_unconfigured_read_fails() {
        let data_source = team::TeamDataSource::default();
        let request = ReadDataSourceRequest {
            config: serde_json::json!({"tag": "platform"}),
        };
        let response = tokio_test::block_on(data_source.read(request));
        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
    }
}
