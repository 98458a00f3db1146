//! Managed resources
//!
//! Each resource pairs a Terraform model (serde over the JSON state) with
//! `to_api_model` / `from_api_model` conversions to the catalog types.

pub mod catalog_entity;
pub mod catalog_entity_custom_data;
pub mod catalog_entity_openapi;
pub mod department;
pub mod resource_definition;
pub mod scorecard;
pub mod team;

use super::resource::Resource;
use super::schema::{AttributeBuilder, Block, BlockBuilder};
use crate::catalog::entity::EntityLink;
use serde::{Deserialize, Serialize};

/// Fresh, unconfigured instances of every resource
pub fn all() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(catalog_entity::CatalogEntityResource::default()),
        Box::new(catalog_entity_custom_data::CustomDataResource::default()),
        Box::new(catalog_entity_openapi::OpenApiResource::default()),
        Box::new(department::DepartmentResource::default()),
        Box::new(resource_definition::ResourceDefinitionResource::default()),
        Box::new(scorecard::ScorecardResource::default()),
        Box::new(team::TeamResource::default()),
    ]
}

// =========================================================================
// Models shared between resources
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkModel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub description: Option<String>,
}

impl LinkModel {
    pub fn to_api_model(&self) -> EntityLink {
        EntityLink {
            name: self.name.clone(),
            kind: self.kind.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
        }
    }

    pub fn from_api_model(link: &EntityLink) -> Self {
        Self {
            name: link.name.clone(),
            kind: link.kind.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
        }
    }
}

pub fn link_block() -> Block {
    BlockBuilder::new()
        .description("Link to external documentation or tooling")
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(
            AttributeBuilder::string("type")
                .description("Link type, e.g. documentation, runbook, logs")
                .required()
                .build(),
        )
        .attribute(AttributeBuilder::string("url").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .build()
}

/// `name`/`email`/`description` member, used by teams and departments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberModel {
    pub name: String,
    pub email: String,
    pub description: Option<String>,
}

pub fn member_block() -> Block {
    BlockBuilder::new()
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("email").required().build())
        .attribute(AttributeBuilder::string("description").optional().build())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_has_a_unique_type_name() {
        let mut names: Vec<_> = all().iter().map(|r| r.type_name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 7);
        assert!(names.iter().all(|n| n.starts_with("cortex_")));
    }

    #[test]
    fn test_link_null_description_survives() {
        let link = LinkModel {
            name: "Runbook".to_string(),
            kind: "runbook".to_string(),
            url: "https://example.com".to_string(),
            description: None,
        };
        assert_eq!(LinkModel::from_api_model(&link.to_api_model()), link);
    }
}
