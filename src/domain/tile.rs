// Tile domain model
use super::filter::{Filter, TimeUnit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    #[default]
    Full,
    Medium,
    Small,
}

/// Persisted configuration of a bar tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileContext {
    pub table: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub period: TimeUnit,
    #[serde(default)]
    pub timeframe: u32,
    #[serde(default)]
    pub nesting: Vec<String>,
    #[serde(default, alias = "uniqueKey")]
    pub unique_count_on: Option<String>,
    #[serde(default)]
    pub ignore_digits: Option<u32>,
    /// Category labels seen in the latest response
    #[serde(default)]
    pub ui_filters_list: Option<Vec<String>>,
    /// Category labels the user chose to hide
    #[serde(default)]
    pub ui_filters_selected_list: Option<Vec<String>>,
    #[serde(default)]
    pub widget_type: WidgetType,
}

impl TileContext {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            period: TimeUnit::default(),
            timeframe: 0,
            nesting: Vec::new(),
            unique_count_on: None,
            ignore_digits: None,
            ui_filters_list: None,
            ui_filters_selected_list: None,
            widget_type: WidgetType::default(),
        }
    }

    /// Unique-count field, with the dropdown's "none" treated as absent
    pub fn unique_count_field(&self) -> Option<&str> {
        self.unique_count_on
            .as_deref()
            .filter(|field| *field != "none")
    }

    pub fn digit_scale(&self) -> f64 {
        let digits = i32::try_from(self.ignore_digits.unwrap_or(0)).unwrap_or(i32::MAX);
        10f64.powi(digits)
    }

    pub fn is_hidden(&self, label: &str) -> bool {
        self.ui_filters_selected_list
            .as_ref()
            .is_some_and(|hidden| hidden.iter().any(|l| l == label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    pub title: String,
    pub tile_context: TileContext,
}

impl Tile {
    pub fn new(id: String, title: String, tile_context: TileContext) -> Self {
        Self {
            id,
            title,
            tile_context,
        }
    }
}
