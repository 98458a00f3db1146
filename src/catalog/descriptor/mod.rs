//! Descriptor codec
//!
//! Cortex descriptors are YAML documents. Entities follow the OpenAPI `info`
//! block convention with `x-cortex-*` extension keys; scorecards are plain
//! documents. Decoding walks the untyped YAML tree through [`Node`], which
//! checks the shape of every value it reads and reports the path of the first
//! mismatch instead of assuming it.

mod entity;

pub use entity::{decode_entity, encode_entity, entity_from_yaml, entity_to_yaml};

use serde_yaml::{Mapping, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorErrorKind {
    /// A value exists but has the wrong YAML type
    TypeMismatch,
    /// A required key is absent or null
    MissingField,
    /// A value has the right type but is not acceptable
    InvalidValue,
    /// The document itself is not valid YAML
    Syntax,
}

impl fmt::Display for DescriptorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DescriptorErrorKind::TypeMismatch => "type mismatch",
            DescriptorErrorKind::MissingField => "missing field",
            DescriptorErrorKind::InvalidValue => "invalid value",
            DescriptorErrorKind::Syntax => "syntax error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid descriptor: {kind} at {path}: expected {expected}")]
pub struct DescriptorError {
    pub kind: DescriptorErrorKind,
    pub path: String,
    pub expected: String,
}

impl DescriptorError {
    pub fn new(kind: DescriptorErrorKind, path: &str, expected: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.to_string(),
            expected: expected.into(),
        }
    }

    pub fn syntax(message: impl fmt::Display) -> Self {
        Self::new(
            DescriptorErrorKind::Syntax,
            "$",
            format!("a YAML document ({})", message),
        )
    }
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged value",
    }
}

/// Read-only cursor over a YAML value that remembers where it is
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
    path: &'a str,
}

/// Owned variant of a child path, kept alive while children are inspected
pub struct Child<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Child<'a> {
    pub fn node(&self) -> Node<'_> {
        Node {
            value: self.value,
            path: &self.path,
        }
    }
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self { value, path: "$" }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn mismatch(&self, expected: &str) -> DescriptorError {
        DescriptorError::new(
            DescriptorErrorKind::TypeMismatch,
            self.path,
            format!("{}, found {}", expected, type_name(self.value)),
        )
    }

    pub fn invalid(&self, expected: impl Into<String>) -> DescriptorError {
        DescriptorError::new(DescriptorErrorKind::InvalidValue, self.path, expected)
    }

    pub fn mapping(&self) -> DescriptorResult<&'a Mapping> {
        self.value.as_mapping().ok_or_else(|| self.mismatch("map"))
    }

    /// Child under `key`; absent and null keys are both `None`
    pub fn get(&self, key: &str) -> DescriptorResult<Option<Child<'a>>> {
        let mapping = self.mapping()?;
        Ok(mapping
            .get(key)
            .filter(|v| !v.is_null())
            .map(|value| Child {
                value,
                path: format!("{}.{}", self.path, key),
            }))
    }

    pub fn required(&self, key: &str) -> DescriptorResult<Child<'a>> {
        self.get(key)?.ok_or_else(|| {
            DescriptorError::new(
                DescriptorErrorKind::MissingField,
                &format!("{}.{}", self.path, key),
                "a value",
            )
        })
    }

    /// Elements of a list, each with an indexed path
    pub fn items(&self) -> DescriptorResult<Vec<Child<'a>>> {
        let seq = self
            .value
            .as_sequence()
            .ok_or_else(|| self.mismatch("list"))?;
        Ok(seq
            .iter()
            .enumerate()
            .map(|(i, value)| Child {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    /// Scalar rendered as a string. Numbers and booleans are accepted since
    /// YAML happily parses `version: 1.0` or `tag: 2024` as non-strings.
    pub fn as_string(&self) -> DescriptorResult<String> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn as_bool(&self) -> DescriptorResult<bool> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn as_i64(&self) -> DescriptorResult<i64> {
        match self.value {
            Value::Number(n) => n.as_i64().ok_or_else(|| self.mismatch("integer")),
            Value::String(s) => s.trim().parse().map_err(|_| self.mismatch("integer")),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn as_f64(&self) -> DescriptorResult<f64> {
        match self.value {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.mismatch("number")),
            Value::String(s) => s.trim().parse().map_err(|_| self.mismatch("number")),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Arbitrary subtree converted to JSON
    pub fn as_json(&self) -> DescriptorResult<serde_json::Value> {
        serde_json::to_value(self.value)
            .map_err(|e| self.invalid(format!("a JSON-compatible value ({})", e)))
    }

    pub fn str_field(&self, key: &str) -> DescriptorResult<Option<String>> {
        self.get(key)?.map(|c| c.node().as_string()).transpose()
    }

    pub fn required_str(&self, key: &str) -> DescriptorResult<String> {
        self.required(key)?.node().as_string()
    }

    pub fn bool_field(&self, key: &str) -> DescriptorResult<Option<bool>> {
        self.get(key)?.map(|c| c.node().as_bool()).transpose()
    }

    pub fn i64_field(&self, key: &str) -> DescriptorResult<Option<i64>> {
        self.get(key)?.map(|c| c.node().as_i64()).transpose()
    }

    pub fn f64_field(&self, key: &str) -> DescriptorResult<Option<f64>> {
        self.get(key)?.map(|c| c.node().as_f64()).transpose()
    }

    pub fn string_list(&self, key: &str) -> DescriptorResult<Option<Vec<String>>> {
        let Some(child) = self.get(key)? else {
            return Ok(None);
        };
        let items = child.node().items()?;
        items
            .iter()
            .map(|c| c.node().as_string())
            .collect::<DescriptorResult<Vec<_>>>()
            .map(Some)
    }

    /// Decode every element of the list under `key` with `f`
    pub fn list_of<T>(
        &self,
        key: &str,
        mut f: impl FnMut(Node<'_>) -> DescriptorResult<T>,
    ) -> DescriptorResult<Vec<T>> {
        let Some(child) = self.get(key)? else {
            return Ok(Vec::new());
        };
        child.node().items()?.iter().map(|c| f(c.node())).collect()
    }

    /// Decode the map under `key` with `f`
    pub fn map_of<T>(
        &self,
        key: &str,
        f: impl FnOnce(Node<'_>) -> DescriptorResult<T>,
    ) -> DescriptorResult<Option<T>> {
        let Some(child) = self.get(key)? else {
            return Ok(None);
        };
        let node = child.node();
        node.mapping()?;
        f(node).map(Some)
    }
}

/// Builds a YAML mapping, leaving out absent values
#[derive(Debug, Default)]
pub struct MapBuilder {
    mapping: Mapping,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, key: &str, value: Value) -> Self {
        self.mapping.insert(Value::String(key.to_string()), value);
        self
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.value(key, Value::String(value.to_string()))
    }

    pub fn opt_str(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.str(key, v),
            None => self,
        }
    }

    /// Empty strings are treated as absent
    pub fn non_empty_str(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.str(key, value)
        }
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.value(key, Value::Bool(value))
    }

    pub fn i64(self, key: &str, value: i64) -> Self {
        self.value(key, Value::Number(value.into()))
    }

    pub fn f64(self, key: &str, value: f64) -> Self {
        self.value(key, Value::Number(value.into()))
    }

    pub fn opt_i64(self, key: &str, value: Option<i64>) -> Self {
        match value {
            Some(v) => self.i64(key, v),
            None => self,
        }
    }

    pub fn opt_strings(self, key: &str, value: Option<&[String]>) -> Self {
        match value {
            Some(v) => self.value(key, strings(v)),
            None => self,
        }
    }

    /// Empty lists are treated as absent
    pub fn seq(self, key: &str, items: Vec<Value>) -> Self {
        if items.is_empty() {
            self
        } else {
            self.value(key, Value::Sequence(items))
        }
    }

    /// Nested maps with no entries are treated as absent
    pub fn map(self, key: &str, child: MapBuilder) -> Self {
        if child.is_empty() {
            self
        } else {
            self.value(key, child.build())
        }
    }

    pub fn json(self, key: &str, value: Option<&serde_json::Value>) -> Self {
        match value.and_then(|v| serde_yaml::to_value(v).ok()) {
            Some(v) => self.value(key, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn build(self) -> Value {
        Value::Mapping(self.mapping)
    }
}

pub fn strings(values: &[String]) -> Value {
    Value::Sequence(values.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_missing_and_null_keys_are_absent() {
        let doc = yaml("a: ~\nb: hello");
        let root = Node::root(&doc);
        assert_eq!(root.str_field("a").unwrap(), None);
        assert_eq!(root.str_field("missing").unwrap(), None);
        assert_eq!(root.str_field("b").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_type_mismatch_reports_path() {
        let doc = yaml("info:\n  x-cortex-groups: not-a-list");
        let root = Node::root(&doc);
        let info = root.required("info").unwrap();
        let err = info.node().string_list("x-cortex-groups").unwrap_err();
        assert_eq!(err.kind, DescriptorErrorKind::TypeMismatch);
        assert_eq!(err.path, "$.info.x-cortex-groups");
        assert!(err.expected.starts_with("list"));
    }

    #[test]
    fn test_list_items_have_indexed_paths() {
        let doc = yaml("items:\n  - 1\n  - [nested]");
        let root = Node::root(&doc);
        let err = root
            .list_of("items", |n| n.as_string())
            .unwrap_err();
        assert_eq!(err.path, "$.items[1]");
    }

    #[test]
    fn test_required_field_missing() {
        let doc = yaml("name: x");
        let err = Node::root(&doc).required_str("tag").unwrap_err();
        assert_eq!(err.kind, DescriptorErrorKind::MissingField);
        assert_eq!(err.path, "$.tag");
    }

    #[test]
    fn test_scalars_are_coerced_to_strings() {
        let doc = yaml("version: 1.5\nflag: true");
        let root = Node::root(&doc);
        assert_eq!(root.str_field("version").unwrap().as_deref(), Some("1.5"));
        assert_eq!(root.str_field("flag").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_map_builder_skips_absent_values() {
        let value = MapBuilder::new()
            .str("a", "1")
            .opt_str("b", None)
            .non_empty_str("c", "")
            .seq("d", vec![])
            .map("e", MapBuilder::new())
            .opt_str("f", Some(""))
            .build();
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("f").and_then(Value::as_str), Some(""));
    }
}
