// Query filter domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field the analytics backend indexes document time under
pub const TIMESTAMP_FIELD: &str = "_timestamp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Filter {
    Equals {
        field: String,
        value: Value,
    },
    NotEquals {
        field: String,
        value: Value,
    },
    Contains {
        field: String,
        value: String,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },
    Exists {
        field: String,
    },
    Between {
        field: String,
        from: i64,
        to: i64,
        #[serde(default)]
        temporal: bool,
    },
    Last {
        field: String,
        duration: String,
        #[serde(default)]
        current_time: i64,
    },
}

impl Filter {
    /// True for the time-range filter a tile appends to its query
    pub fn is_time_filter(&self) -> bool {
        match self {
            Filter::Last { field, .. } => field == TIMESTAMP_FIELD,
            Filter::Between {
                field, temporal, ..
            } => *temporal && field == TIMESTAMP_FIELD,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// First option of the time unit dropdown
    #[default]
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

/// Period picked in a period selector, either the dashboard-wide one or a tile's own
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PeriodSelection {
    /// Use the tile's own timeframe and unit
    #[default]
    Custom,
    /// Fixed trailing window such as "24h"
    Window { duration: String },
    /// Absolute range
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

/// Build the time-range filter for one query
pub fn time_value(
    period: TimeUnit,
    timeframe: u32,
    selection: &PeriodSelection,
    now: DateTime<Utc>,
) -> Filter {
    match selection {
        PeriodSelection::Custom => Filter::Last {
            field: TIMESTAMP_FIELD.to_string(),
            duration: format!("{}{}", timeframe, period.abbreviation()),
            current_time: now.timestamp_millis(),
        },
        PeriodSelection::Window { duration } => Filter::Last {
            field: TIMESTAMP_FIELD.to_string(),
            duration: duration.clone(),
            current_time: now.timestamp_millis(),
        },
        PeriodSelection::Range { from, to } => Filter::Between {
            field: TIMESTAMP_FIELD.to_string(),
            from: from.timestamp_millis(),
            to: to.timestamp_millis(),
            temporal: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_custom_selection_uses_tile_timeframe() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let filter = time_value(TimeUnit::Hours, 6, &PeriodSelection::Custom, now);

        assert_eq!(
            filter,
            Filter::Last {
                field: "_timestamp".to_string(),
                duration: "6h".to_string(),
                current_time: 1_700_000_000_000,
            }
        );
        assert!(filter.is_time_filter());
    }

    #[test]
    fn test_window_selection_overrides_timeframe() {
        let now = Utc::now();
        let selection = PeriodSelection::Window {
            duration: "7d".to_string(),
        };

        match time_value(TimeUnit::Minutes, 15, &selection, now) {
            Filter::Last { duration, .. } => assert_eq!(duration, "7d"),
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_range_selection_builds_between() {
        let from = Utc.timestamp_millis_opt(1_000).unwrap();
        let to = Utc.timestamp_millis_opt(5_000).unwrap();
        let filter = time_value(
            TimeUnit::Days,
            1,
            &PeriodSelection::Range { from, to },
            Utc::now(),
        );

        assert_eq!(
            filter,
            Filter::Between {
                field: "_timestamp".to_string(),
                from: 1_000,
                to: 5_000,
                temporal: true,
            }
        );
        assert!(filter.is_time_filter());
    }

    #[test]
    fn test_filter_wire_format() {
        let filter = Filter::Last {
            field: "_timestamp".to_string(),
            duration: "15m".to_string(),
            current_time: 42,
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "operator": "last",
                "field": "_timestamp",
                "duration": "15m",
                "currentTime": 42
            })
        );

        let parsed: Filter = serde_json::from_value(serde_json::json!({
            "operator": "not_equals",
            "field": "state",
            "value": "CANCELLED"
        }))
        .unwrap();
        assert!(!parsed.is_time_filter());
    }

    #[test]
    fn test_non_temporal_between_is_not_time_filter() {
        let filter = Filter::Between {
            field: "_timestamp".to_string(),
            from: 0,
            to: 1,
            temporal: false,
        };
        assert!(!filter.is_time_filter());
    }
}
