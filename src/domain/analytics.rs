// Analytics wire model - group queries and table field metadata
use super::filter::Filter;
use super::tile::TileContext;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    pub opcode: &'static str,
    pub table: String,
    pub filters: Vec<Filter>,
    pub unique_count_on: Option<String>,
    pub nesting: Vec<String>,
}

impl GroupRequest {
    pub const OPCODE: &'static str = "group";

    pub fn from_context(context: &TileContext) -> Self {
        Self {
            opcode: Self::OPCODE,
            table: context.table.clone(),
            filters: context.filters.clone(),
            unique_count_on: context.unique_count_field().map(str::to_string),
            nesting: context.nesting.clone(),
        }
    }
}

/// Group response; `result` keeps the backend's key order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    #[serde(default, deserialize_with = "object_or_empty")]
    pub result: Option<Map<String, Value>>,
}

/// Any non-object result (such as an empty array) counts as an empty one
fn object_or_empty<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => Some(Map::new()),
    })
}

impl GroupResponse {
    #[cfg(test)]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let result = pairs
            .into_iter()
            .map(|(label, value)| (label.to_string(), Value::from(value)))
            .collect();
        Self {
            result: Some(result),
        }
    }

    /// Numeric categories in response order
    pub fn categories(&self) -> Vec<(&str, f64)> {
        let Some(result) = &self.result else {
            return Vec::new();
        };

        result
            .iter()
            .filter_map(|(label, value)| match value.as_f64() {
                Some(v) => Some((label.as_str(), v)),
                None => {
                    tracing::warn!("Skipping non-numeric group result for {}", label);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldMeta {
    #[cfg(test)]
    pub fn new(field: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: field_type.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableFields {
    #[allow(dead_code)]
    pub table: String,
    #[serde(default)]
    pub mappings: Vec<FieldMeta>,
}
