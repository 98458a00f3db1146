//! Terraform value helpers
//!
//! Terraform values travel as JSON: `null` is a null value, everything else
//! maps onto the typed models with serde. Models use `Option` for nullable
//! attributes so `null`, `""` and `"x"` stay distinct.

use super::diagnostics::Diagnostics;
use crate::catalog::Enabled;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure converting between a Terraform model and an API model
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{attribute} is not valid JSON: {source}")]
    InvalidJson {
        attribute: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{attribute}: {message}")]
    InvalidValue { attribute: String, message: String },
}

impl ConversionError {
    pub fn invalid(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ConversionError::InvalidValue {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            ConversionError::InvalidJson { attribute, .. }
            | ConversionError::InvalidValue { attribute, .. } => attribute,
        }
    }

    /// Record as an attribute diagnostic
    pub fn report(&self, diags: &mut Diagnostics) {
        diags.attribute_error(self.attribute(), "Invalid Attribute Value", self.to_string());
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Deserialize `null` as the type's default (used for list attributes)
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a plan, state or config value into a model
pub fn decode<T: DeserializeOwned>(value: &Value, what: &str, diags: &mut Diagnostics) -> Option<T> {
    match T::deserialize(value) {
        Ok(model) => Some(model),
        Err(e) => {
            diags.error(
                format!("Unable to decode {}", what),
                format!("The {} does not match the schema: {}", what, e),
            );
            None
        }
    }
}

/// Encode a model as state
pub fn encode<T: Serialize>(model: &T, diags: &mut Diagnostics) -> Option<Value> {
    match serde_json::to_value(model) {
        Ok(value) => Some(value),
        Err(e) => {
            diags.error("Unable to encode state", e.to_string());
            None
        }
    }
}

/// `Some(block)` when the API struct carries configuration, null otherwise
pub fn block_or_null<A: Enabled, M>(api: &A, convert: impl FnOnce(&A) -> M) -> Option<M> {
    api.enabled().then(|| convert(api))
}

/// Parse a JSON-encoded string attribute
pub fn parse_json(attribute: &str, raw: &str) -> ConversionResult<Value> {
    serde_json::from_str(raw).map_err(|source| ConversionError::InvalidJson {
        attribute: attribute.to_string(),
        source,
    })
}

pub fn parse_json_opt(attribute: &str, raw: Option<&str>) -> ConversionResult<Option<Value>> {
    raw.map(|r| parse_json(attribute, r)).transpose()
}

/// Render JSON for a string attribute. When `prior` already encodes the
/// same value its formatting is kept, so key order and whitespace don't
/// produce a diff.
pub fn json_string(value: &Value, prior: Option<&str>) -> String {
    if let Some(prior) = prior {
        if serde_json::from_str::<Value>(prior).is_ok_and(|p| p == *value) {
            return prior.to_string();
        }
    }
    value.to_string()
}

pub fn json_string_opt(value: Option<&Value>, prior: Option<&str>) -> Option<String> {
    value.map(|v| json_string(v, prior))
}

/// Empty list as null, for optional list attributes the API reports as `[]`
pub fn list_or_null<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

/// Like [`list_or_null`], but `[]` stays `[]` when the prior value said so
pub fn prior_list<T: Clone>(items: &[T], prior: Option<&Option<Vec<T>>>) -> Option<Vec<T>> {
    match prior {
        Some(Some(p)) if p.is_empty() && items.is_empty() => Some(Vec::new()),
        _ => list_or_null(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Model {
        name: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
    }

    #[test]
    fn test_null_and_empty_stay_distinct() {
        let mut diags = Diagnostics::new();
        let null: Model = decode(&json!({"name": null, "items": null}), "plan", &mut diags).unwrap();
        let empty: Model = decode(&json!({"name": ""}), "plan", &mut diags).unwrap();
        assert_eq!(null.name, None);
        assert_eq!(empty.name.as_deref(), Some(""));
        assert!(null.items.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_failure_is_a_diagnostic() {
        let mut diags = Diagnostics::new();
        let model: Option<Model> = decode(&json!({"name": 5}), "state", &mut diags);
        assert!(model.is_none());
        assert!(diags.has_errors());
    }

    #[test]
    fn test_json_string_keeps_equivalent_prior() {
        let value = json!({"a": 1, "b": [true]});
        let prior = r#"{ "b": [true], "a": 1 }"#;
        assert_eq!(json_string(&value, Some(prior)), prior);
        assert_eq!(json_string(&value, Some(r#"{"a": 2}"#)), value.to_string());
        assert_eq!(json_string(&value, Some("not json")), value.to_string());
    }

    #[test]
    fn test_prior_list_keeps_null_and_empty_apart() {
        let empty: Vec<String> = vec![];
        assert_eq!(prior_list(&empty, None), None);
        assert_eq!(prior_list(&empty, Some(&None)), None);
        assert_eq!(prior_list(&empty, Some(&Some(vec![]))), Some(vec![]));
        let items = vec!["a".to_string()];
        assert_eq!(prior_list(&items, Some(&None)), Some(items.clone()));
    }

    #[test]
    fn test_parse_json_reports_attribute() {
        let err = parse_json("metadata", "{oops").unwrap_err();
        assert_eq!(err.attribute(), "metadata");
        assert!(err.to_string().starts_with("metadata is not valid JSON"));
    }
}
