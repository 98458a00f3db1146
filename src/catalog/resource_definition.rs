//! Custom resource type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceDefinitionSource {
    /// Built in, cannot be modified
    Cortex,
    #[default]
    Custom,
}

impl ResourceDefinitionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceDefinitionSource::Cortex => "CORTEX",
            ResourceDefinitionSource::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ResourceDefinitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceDefinitionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CORTEX" => Ok(ResourceDefinitionSource::Cortex),
            "CUSTOM" => Ok(ResourceDefinitionSource::Custom),
            other => Err(format!("unknown resource definition source: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema every entity of this type must satisfy
    pub schema: Value,
    pub source: ResourceDefinitionSource,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceDefinitionList {
    pub definitions: Vec<ResourceDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_parses_case_insensitively() {
        assert_eq!(
            "cortex".parse::<ResourceDefinitionSource>().unwrap(),
            ResourceDefinitionSource::Cortex
        );
        assert!("other".parse::<ResourceDefinitionSource>().is_err());
    }

    #[test]
    fn test_definition_wire_format() {
        let definition: ResourceDefinition = serde_json::from_value(json!({
            "type": "s3-bucket",
            "name": "S3 Bucket",
            "schema": {"type": "object"},
            "source": "CUSTOM"
        }))
        .unwrap();
        assert_eq!(definition.kind, "s3-bucket");
        assert_eq!(definition.source, ResourceDefinitionSource::Custom);
        assert_eq!(definition.schema["type"], "object");
    }
}
