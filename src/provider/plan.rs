//! Plan computation
//!
//! Given a configuration and the prior state, work out the state a resource
//! is expected to have after apply: defaults are filled in, validators run,
//! computed values are carried over or marked unknown, and attributes whose
//! change forces replacement are reported.

use super::diagnostics::Diagnostics;
use super::schema::{Block, Nesting, PlanModifier, Schema};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlannedChange {
    pub planned_state: Value,
    /// Computed attributes whose value is only known after apply
    pub unknown: Vec<String>,
    /// Attributes whose change destroys and recreates the resource
    pub requires_replace: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Plan a resource. `prior` is `None` (or null) when the resource is new.
pub fn plan_resource(schema: &Schema, config: &Value, prior: Option<&Value>) -> PlannedChange {
    let mut change = PlannedChange::default();
    let prior = prior.filter(|p| !p.is_null());

    let Some(config) = as_object(config, "", &mut change.diagnostics) else {
        return change;
    };
    let planned = plan_block(&schema.block, config, prior, "", &mut change);
    change.planned_state = Value::Object(planned);
    change
}

fn as_object<'a>(value: &'a Value, path: &str, diags: &mut Diagnostics) -> Option<&'a Map<String, Value>> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    match value {
        Value::Object(map) => Some(map),
        Value::Null => Some(EMPTY.get_or_init(Map::new)),
        _ => {
            diags.attribute_error(
                if path.is_empty() { "$" } else { path },
                "Incorrect attribute value type",
                "expected an object",
            );
            None
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn plan_block(
    block: &Block,
    config: &Map<String, Value>,
    prior: Option<&Value>,
    prefix: &str,
    change: &mut PlannedChange,
) -> Map<String, Value> {
    let mut planned = Map::new();

    for attribute in &block.attributes {
        let path = join(prefix, &attribute.name);
        let value = config.get(&attribute.name).unwrap_or(&Value::Null);
        let prior_value = prior.and_then(|p| p.get(&attribute.name)).filter(|v| !v.is_null());

        if !attribute.kind.accepts(value) {
            change.diagnostics.attribute_error(
                &path,
                "Incorrect attribute value type",
                format!("expected {:?}", attribute.kind),
            );
            continue;
        }
        if value.is_null() && attribute.required {
            change.diagnostics.attribute_error(
                &path,
                "Missing required argument",
                format!("The argument \"{}\" is required.", attribute.name),
            );
            continue;
        }
        if !value.is_null() && attribute.computed && !attribute.optional {
            change.diagnostics.attribute_error(
                &path,
                "Invalid configuration",
                format!("\"{}\" is computed and cannot be set.", attribute.name),
            );
            continue;
        }
        if !value.is_null() {
            for validator in &attribute.validators {
                if let Some(problem) = validator.check(value) {
                    change
                        .diagnostics
                        .attribute_error(&path, "Invalid attribute value", problem);
                }
            }
        }

        let mut unknown = false;
        let planned_value = if !value.is_null() {
            value.clone()
        } else if let Some(default) = &attribute.default {
            default.clone()
        } else if attribute.computed {
            match prior_value {
                Some(p) if attribute.plan_modifiers.contains(&PlanModifier::UseStateForUnknown) => {
                    p.clone()
                }
                _ => {
                    unknown = true;
                    Value::Null
                }
            }
        } else {
            Value::Null
        };

        if unknown {
            change.unknown.push(path.clone());
        }
        if attribute.plan_modifiers.contains(&PlanModifier::RequiresReplace) && !unknown {
            if let Some(prior) = prior {
                let before = prior.get(&attribute.name).unwrap_or(&Value::Null);
                if *before != planned_value {
                    change.requires_replace.push(path.clone());
                }
            }
        }

        planned.insert(attribute.name.clone(), planned_value);
    }

    for nested in &block.blocks {
        let path = join(prefix, &nested.name);
        let value = config.get(&nested.name).unwrap_or(&Value::Null);
        let prior_value = prior.and_then(|p| p.get(&nested.name));

        let planned_value = match nested.nesting {
            Nesting::Single if value.is_null() => Value::Null,
            Nesting::Single => match as_object(value, &path, &mut change.diagnostics) {
                Some(object) => {
                    Value::Object(plan_block(&nested.block, object, prior_value, &path, change))
                }
                None => Value::Null,
            },
            Nesting::List => {
                let items: &[Value] = match value {
                    Value::Array(items) => items,
                    Value::Null => &[],
                    _ => {
                        change.diagnostics.attribute_error(
                            &path,
                            "Incorrect attribute value type",
                            "expected a list of objects",
                        );
                        &[]
                    }
                };
                let planned_items = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| {
                        let item_path = format!("{}[{}]", path, i);
                        let prior_item = prior_value.and_then(|p| p.get(i));
                        as_object(item, &item_path, &mut change.diagnostics).map(|object| {
                            Value::Object(plan_block(
                                &nested.block,
                                object,
                                prior_item,
                                &item_path,
                                change,
                            ))
                        })
                    })
                    .collect();
                Value::Array(planned_items)
            }
        };

        planned.insert(nested.name.clone(), planned_value);
    }

    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::schema::{id_attribute, AttributeBuilder, BlockBuilder, SchemaBuilder, Validator};
    use serde_json::json;

    fn schema() -> Schema {
        SchemaBuilder::new()
            .attribute(id_attribute("identifier"))
            .attribute(
                AttributeBuilder::string("tag")
                    .required()
                    .plan_modifier(PlanModifier::RequiresReplace)
                    .build(),
            )
            .attribute(AttributeBuilder::string("type").default(json!("service")).build())
            .attribute(
                AttributeBuilder::string("kind")
                    .optional()
                    .validator(Validator::one_of(&["a", "b"]))
                    .build(),
            )
            .list(
                "links",
                BlockBuilder::new()
                    .attribute(AttributeBuilder::string("url").required().build())
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_new_resource_marks_id_unknown_and_applies_defaults() {
        let change = plan_resource(&schema(), &json!({"tag": "svc"}), None);
        assert!(change.diagnostics.is_empty());
        assert_eq!(change.unknown, vec!["id"]);
        assert_eq!(change.planned_state["type"], "service");
        assert_eq!(change.planned_state["links"], json!([]));
        assert!(change.requires_replace.is_empty());
    }

    #[test]
    fn test_prior_id_is_kept_and_tag_change_replaces() {
        let prior = json!({"id": "svc", "tag": "svc", "type": "service"});
        let change = plan_resource(&schema(), &json!({"tag": "svc2"}), Some(&prior));
        assert_eq!(change.planned_state["id"], "svc");
        assert!(change.unknown.is_empty());
        assert_eq!(change.requires_replace, vec!["tag"]);
    }

    #[test]
    fn test_missing_required_and_invalid_values_are_reported() {
        let change = plan_resource(
            &schema(),
            &json!({"kind": "c", "links": [{"url": null}]}),
            None,
        );
        let attributes: Vec<_> = change
            .diagnostics
            .iter()
            .filter_map(|d| d.attribute.clone())
            .collect();
        assert_eq!(attributes, vec!["tag", "kind", "links[0].url"]);
    }

    #[test]
    fn test_setting_computed_only_attribute_is_rejected() {
        let change = plan_resource(&schema(), &json!({"tag": "svc", "id": "x"}), None);
        assert!(change.diagnostics.has_errors());
    }
}
