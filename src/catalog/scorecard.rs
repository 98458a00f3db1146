//! Scorecards
//!
//! The JSON API returns scorecards wrapped in `{"scorecard": ...}`. Writes go
//! through the descriptor endpoint as a complete YAML document built from
//! [`UpsertScorecardRequest`].

use super::descriptor::{DescriptorError, DescriptorResult, Node};
use super::Enabled;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RULE_WEIGHT: i64 = 1;
pub const DEFAULT_EVALUATION_WINDOW_HOURS: i64 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scorecard {
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    pub draft: bool,
    pub notifications: ScorecardNotifications,
    pub ladder: ScorecardLadder,
    pub rules: Vec<ScorecardRule>,
    pub filter: Option<ScorecardFilter>,
    pub evaluation: ScorecardEvaluation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardNotifications {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardLadder {
    pub levels: Vec<ScorecardLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScorecardLevel {
    pub name: String,
    pub rank: i64,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScorecardRule {
    pub title: String,
    pub expression: String,
    pub description: Option<String>,
    pub weight: i64,
    pub level: Option<String>,
    pub failure_message: Option<String>,
}

/// Which entities a scorecard applies to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScorecardFilter {
    pub category: Option<String>,
    pub query: Option<String>,
    pub types: Option<IncludeExclude>,
    pub groups: Option<IncludeExclude>,
}

impl Enabled for ScorecardFilter {
    fn enabled(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.is_empty())
            || self.query.as_deref().is_some_and(|q| !q.is_empty())
            || self.types.enabled()
            || self.groups.enabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeExclude {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Enabled for IncludeExclude {
    fn enabled(&self) -> bool {
        self.include.enabled() || self.exclude.enabled()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardEvaluation {
    /// Hours between evaluations
    pub window: i64,
}

impl Default for ScorecardEvaluation {
    fn default() -> Self {
        Self {
            window: DEFAULT_EVALUATION_WINDOW_HOURS,
        }
    }
}

/// `{"scorecard": {...}}`
#[derive(Debug, Deserialize)]
pub struct ScorecardResponse {
    pub scorecard: Scorecard,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScorecardList {
    pub scorecards: Vec<Scorecard>,
}

/// Full descriptor sent on every create and update. Every field is written,
/// so the server never merges with a previous version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertScorecardRequest {
    pub tag: String,
    pub name: String,
    pub description: String,
    pub draft: bool,
    pub notifications: ScorecardNotifications,
    pub ladder: ScorecardLadder,
    pub rules: Vec<UpsertScorecardRule>,
    pub filter: Option<ScorecardFilter>,
    pub evaluation: ScorecardEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertScorecardRule {
    pub title: String,
    pub expression: String,
    pub description: String,
    pub weight: i64,
    pub level: String,
    pub failure_message: String,
}

impl From<&Scorecard> for UpsertScorecardRequest {
    fn from(scorecard: &Scorecard) -> Self {
        Self {
            tag: scorecard.tag.clone(),
            name: scorecard.name.clone(),
            description: scorecard.description.clone().unwrap_or_default(),
            draft: scorecard.draft,
            notifications: scorecard.notifications.clone(),
            ladder: scorecard.ladder.clone(),
            rules: scorecard
                .rules
                .iter()
                .map(|r| UpsertScorecardRule {
                    title: r.title.clone(),
                    expression: r.expression.clone(),
                    description: r.description.clone().unwrap_or_default(),
                    weight: r.weight,
                    level: r.level.clone().unwrap_or_default(),
                    failure_message: r.failure_message.clone().unwrap_or_default(),
                })
                .collect(),
            filter: scorecard.filter.clone().filter(|f| f.enabled()),
            evaluation: scorecard.evaluation.clone(),
        }
    }
}

impl UpsertScorecardRequest {
    pub fn to_yaml(&self) -> DescriptorResult<String> {
        serde_yaml::to_string(self).map_err(DescriptorError::syntax)
    }
}

// =========================================================================
// Descriptor decoding
// =========================================================================

impl Scorecard {
    /// Decode the YAML returned by `GET /api/v1/scorecards/{tag}/descriptor`
    pub fn from_descriptor(document: &str) -> DescriptorResult<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(document).map_err(DescriptorError::syntax)?;
        Self::decode_descriptor(&value)
    }

    pub fn decode_descriptor(document: &serde_yaml::Value) -> DescriptorResult<Self> {
        Self::decode(Node::root(document))
    }

    fn decode(root: Node<'_>) -> DescriptorResult<Self> {
        root.mapping()?;

        let mut position = 0;
        let levels = root
            .map_of("ladder", |ladder| {
                ladder.list_of("levels", |level| {
                    position += 1;
                    Ok(ScorecardLevel {
                        name: level.required_str("name")?,
                        rank: level.i64_field("rank")?.unwrap_or(position),
                        color: level.str_field("color")?.unwrap_or_default(),
                        description: level.str_field("description")?,
                    })
                })
            })?
            .unwrap_or_default();

        let rules = root.list_of("rules", |rule| {
            Ok(ScorecardRule {
                title: rule.str_field("title")?.unwrap_or_default(),
                expression: rule.required_str("expression")?,
                description: rule.str_field("description")?,
                weight: rule.i64_field("weight")?.unwrap_or(DEFAULT_RULE_WEIGHT),
                level: rule.str_field("level")?,
                failure_message: rule.str_field("failureMessage")?,
            })
        })?;

        let include_exclude = |node: Node<'_>| -> DescriptorResult<IncludeExclude> {
            Ok(IncludeExclude {
                include: node.string_list("include")?.unwrap_or_default(),
                exclude: node.string_list("exclude")?.unwrap_or_default(),
            })
        };
        let filter = root.map_of("filter", |filter| {
            Ok(ScorecardFilter {
                category: filter.str_field("category")?,
                query: filter.str_field("query")?,
                types: filter.map_of("types", include_exclude)?,
                groups: filter.map_of("groups", include_exclude)?,
            })
        })?;

        Ok(Scorecard {
            tag: root.required_str("tag")?,
            name: root.str_field("name")?.unwrap_or_default(),
            description: root.str_field("description")?,
            draft: root.bool_field("draft")?.unwrap_or(false),
            notifications: ScorecardNotifications {
                enabled: root
                    .map_of("notifications", |n| n.bool_field("enabled"))?
                    .flatten()
                    .unwrap_or(false),
            },
            ladder: ScorecardLadder { levels },
            rules,
            filter: filter.filter(|f| f.enabled()),
            evaluation: ScorecardEvaluation {
                window: root
                    .map_of("evaluation", |n| n.i64_field("window"))?
                    .flatten()
                    .unwrap_or(DEFAULT_EVALUATION_WINDOW_HOURS),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::descriptor::DescriptorErrorKind;

    #[test]
    fn test_descriptor_defaults() {
        let scorecard = Scorecard::from_descriptor(
            r##"
tag: production-readiness
name: Production Readiness
ladder:
  levels:
    - name: Bronze
      color: "#c38b5f"
    - name: Silver
      color: "#8c9298"
rules:
  - title: Has owners
    expression: ownership != null
    level: Bronze
"##,
        )
        .unwrap();

        assert_eq!(scorecard.ladder.levels[0].rank, 1);
        assert_eq!(scorecard.ladder.levels[1].rank, 2);
        assert_eq!(scorecard.rules[0].weight, DEFAULT_RULE_WEIGHT);
        assert_eq!(scorecard.evaluation.window, 4);
        assert!(scorecard.filter.is_none());
        assert!(!scorecard.draft);
    }

    #[test]
    fn test_descriptor_explicit_values_win() {
        let scorecard = Scorecard::from_descriptor(
            r#"
tag: sc
ladder:
  levels:
    - name: Gold
      rank: 3
rules:
  - expression: "true"
    weight: 5
evaluation:
  window: 24
filter:
  category: SERVICE
  types:
    include: [service]
"#,
        )
        .unwrap();

        assert_eq!(scorecard.ladder.levels[0].rank, 3);
        assert_eq!(scorecard.rules[0].weight, 5);
        assert_eq!(scorecard.evaluation.window, 24);
        let filter = scorecard.filter.unwrap();
        assert_eq!(filter.category.as_deref(), Some("SERVICE"));
        assert_eq!(filter.types.unwrap().include, vec!["service"]);
        assert!(filter.groups.is_none());
    }

    #[test]
    fn test_descriptor_with_wrong_shape_is_an_error() {
        let err = Scorecard::from_descriptor("tag: sc\nrules: {expression: x}").unwrap_err();
        assert_eq!(err.kind, DescriptorErrorKind::TypeMismatch);
        assert_eq!(err.path, "$.rules");
    }

    #[test]
    fn test_empty_filter_is_not_enabled() {
        assert!(!ScorecardFilter::default().enabled());
        let filter = ScorecardFilter {
            category: Some(String::new()),
            types: Some(IncludeExclude::default()),
            ..ScorecardFilter::default()
        };
        assert!(!filter.enabled());
    }

    #[test]
    fn test_upsert_request_writes_every_field() {
        let scorecard = Scorecard {
            tag: "test-scorecard".to_string(),
            name: "Test".to_string(),
            rules: vec![ScorecardRule {
                title: "Rule".to_string(),
                expression: "true".to_string(),
                weight: 1,
                ..ScorecardRule::default()
            }],
            ..Scorecard::default()
        };
        let yaml = UpsertScorecardRequest::from(&scorecard).to_yaml().unwrap();

        assert!(yaml.contains("tag: test-scorecard"));
        assert!(yaml.contains("description: ''"));
        assert!(yaml.contains("failureMessage: ''"));
        assert!(yaml.contains("filter: null"));
        assert!(yaml.contains("window: 4"));
    }

    #[test]
    fn test_response_wrapper_decodes_partial_scorecard() {
        let response: ScorecardResponse =
            serde_json::from_str(r#"{"scorecard": {"tag": "test-scorecard"}}"#).unwrap();
        assert_eq!(response.scorecard.tag, "test-scorecard");
        assert_eq!(response.scorecard.evaluation.window, 4);
    }
}
