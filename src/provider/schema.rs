//! Attribute schemas
//!
//! Schemas describe the JSON shape of a resource's configuration and state,
//! along with defaults, validators and plan modifiers used by
//! [`crate::provider::plan`].

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Number,
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
}

impl AttributeType {
    pub fn list_of(element: AttributeType) -> Self {
        AttributeType::List(Box::new(element))
    }

    pub fn map_of(element: AttributeType) -> Self {
        AttributeType::Map(Box::new(element))
    }

    /// Whether `value` (non-null) has this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (AttributeType::String, Value::String(_)) => true,
            (AttributeType::Bool, Value::Bool(_)) => true,
            (AttributeType::Number, Value::Number(_)) => true,
            (AttributeType::List(element), Value::Array(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (AttributeType::Map(element), Value::Object(map)) => {
                map.values().all(|item| element.accepts(item))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Validator {
    /// String must be one of the listed values
    OneOf(Vec<String>),
    /// String or list must not be empty
    NonEmpty,
}

impl Validator {
    pub fn one_of(values: &[&str]) -> Self {
        Validator::OneOf(values.iter().map(|v| v.to_string()).collect())
    }

    /// Check a non-null value; returns the problem, if any
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Validator::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => None,
                _ => Some(format!("value must be one of: {}", allowed.join(", "))),
            },
            Validator::NonEmpty => {
                let empty = match value {
                    Value::String(s) => s.is_empty(),
                    Value::Array(items) => items.is_empty(),
                    Value::Object(map) => map.is_empty(),
                    _ => false,
                };
                empty.then(|| "value must not be empty".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior state value when the planned value is unknown
    UseStateForUnknown,
    /// Changing the value destroys and recreates the resource
    RequiresReplace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
}

pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, kind: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                kind,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                default: None,
                validators: Vec::new(),
                plan_modifiers: Vec::new(),
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn string_list(name: &str) -> Self {
        Self::new(name, AttributeType::list_of(AttributeType::String))
    }

    pub fn description(mut self, description: &str) -> Self {
        self.attribute.description = description.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Default applied at plan time; implies optional + computed
    pub fn default(mut self, value: Value) -> Self {
        self.attribute.default = Some(value);
        self.attribute.optional = true;
        self.attribute.computed = true;
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    pub fn plan_modifier(mut self, modifier: PlanModifier) -> Self {
        self.attribute.plan_modifiers.push(modifier);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nesting {
    /// A single object, null when absent
    Single,
    /// A list of objects
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedBlock {
    pub name: String,
    pub nesting: Nesting,
    pub block: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub description: String,
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<NestedBlock>,
}

impl Block {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block(&self, name: &str) -> Option<&NestedBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

#[derive(Debug, Default)]
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: &str) -> Self {
        self.block.description = description.to_string();
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.block.attributes.push(attribute);
        self
    }

    pub fn single(mut self, name: &str, block: Block) -> Self {
        self.block.blocks.push(NestedBlock {
            name: name.to_string(),
            nesting: Nesting::Single,
            block,
        });
        self
    }

    pub fn list(mut self, name: &str, block: Block) -> Self {
        self.block.blocks.push(NestedBlock {
            name: name.to_string(),
            nesting: Nesting::List,
            block,
        });
        self
    }

    pub fn build(self) -> Block {
        self.block
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub version: i64,
    pub block: Block,
}

pub struct SchemaBuilder {
    version: i64,
    block: BlockBuilder,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            version: 0,
            block: BlockBuilder::new(),
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.block = self.block.description(description);
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.block = self.block.attribute(attribute);
        self
    }

    pub fn single(mut self, name: &str, block: Block) -> Self {
        self.block = self.block.single(name, block);
        self
    }

    pub fn list(mut self, name: &str, block: Block) -> Self {
        self.block = self.block.list(name, block);
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            version: self.version,
            block: self.block.build(),
        }
    }
}

impl Block {
    fn into_computed(mut self, lookup: &[&str]) -> Block {
        for attribute in &mut self.attributes {
            let is_lookup = lookup.contains(&attribute.name.as_str());
            attribute.required = is_lookup;
            attribute.optional = false;
            attribute.computed = !is_lookup;
            attribute.default = None;
            attribute.plan_modifiers.clear();
            if !is_lookup {
                attribute.validators.clear();
            }
        }
        self.blocks = self
            .blocks
            .into_iter()
            .map(|nested| NestedBlock {
                block: nested.block.into_computed(&[]),
                ..nested
            })
            .collect();
        self
    }
}

impl Schema {
    /// Read-only variant of a resource schema for the matching data source:
    /// `lookup` attributes become required, everything else computed.
    pub fn into_data_source(self, description: &str, lookup: &[&str]) -> Schema {
        let mut block = self.block.into_computed(lookup);
        block.description = description.to_string();
        Schema {
            version: self.version,
            block,
        }
    }
}

/// Computed `id` attribute that keeps its value across plans
pub fn id_attribute(description: &str) -> Attribute {
    AttributeBuilder::string("id")
        .description(description)
        .computed()
        .plan_modifier(PlanModifier::UseStateForUnknown)
        .build()
}
