//! Custom data attached to catalog entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomData {
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    /// Where the value came from: API, YAML, ...
    pub source: Option<String>,
    pub date_updated: Option<DateTime<Utc>>,
}

/// Body of `POST /api/v1/catalog/{tag}/custom-data`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertCustomDataRequest {
    pub key: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Overwrite values owned by the entity descriptor
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_custom_data_parses_timestamp() {
        let data: CustomData = serde_json::from_value(json!({
            "key": "cost-center",
            "value": {"id": 42},
            "source": "API",
            "dateUpdated": "2024-03-01T12:30:00Z"
        }))
        .unwrap();
        assert_eq!(data.value["id"], 42);
        assert_eq!(
            data.date_updated,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
    }
}
