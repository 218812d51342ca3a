// Bar chart form binding - form state <-> tile configuration
use super::analytics::FieldMeta;
use super::filter::TimeUnit;
use super::tile::TileContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values of the five bar chart controls.
///
/// `event_field` and `unique_key` hold an index into the current field list,
/// `None` being the dropdown's leading "none" option.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartForm {
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub event_field: Option<usize>,
    #[serde(default)]
    pub unique_key: Option<usize>,
    #[serde(default)]
    pub ignored_digits: u32,
}

impl BarChartForm {
    /// Reset every control to its first option
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartConfig {
    pub period: TimeUnit,
    pub timeframe: u32,
    pub nesting: Vec<String>,
    pub unique_count_on: Option<String>,
    pub ignore_digits: u32,
}

impl BarChartConfig {
    pub fn apply_to(self, context: &mut TileContext) {
        context.period = self.period;
        context.timeframe = self.timeframe;
        context.nesting = self.nesting;
        context.unique_count_on = self.unique_count_on;
        context.ignore_digits = Some(self.ignore_digits);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormValues {
    pub config: Option<BarChartConfig>,
    pub valid: bool,
}

impl FormValues {
    fn rejected() -> Self {
        Self {
            config: None,
            valid: false,
        }
    }
}

fn parse_timeframe(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|t| *t > 0)
}

/// Read the form into a tile configuration.
///
/// No grouping field means there is nothing to chart, so no config is produced.
pub fn get_bar_chart_form_values(form: &BarChartForm, fields: &[FieldMeta]) -> FormValues {
    let Some(grouping) = form
        .event_field
        .and_then(|index| fields.get(index))
        .map(|f| f.field.clone())
    else {
        return FormValues::rejected();
    };

    let mut valid = true;

    let timeframe = match parse_timeframe(&form.timeframe) {
        Some(t) => t,
        None => {
            valid = false;
            0
        }
    };

    let unique_count_on = match form.unique_key {
        None => None,
        Some(index) => match fields.get(index) {
            Some(f) => Some(f.field.clone()),
            None => {
                valid = false;
                None
            }
        },
    };

    FormValues {
        config: Some(BarChartConfig {
            period: form.time_unit,
            timeframe,
            nesting: vec![grouping],
            unique_count_on,
            ignore_digits: form.ignored_digits,
        }),
        valid,
    }
}

/// Fill the form from a tile's configuration
pub fn set_bar_chart_form_values(context: &TileContext, fields: &[FieldMeta]) -> BarChartForm {
    let position = |name: &str| fields.iter().position(|f| f.field == name);

    BarChartForm {
        time_unit: context.period,
        timeframe: match context.timeframe {
            0 => String::new(),
            t => t.to_string(),
        },
        event_field: context.nesting.first().and_then(|n| position(n.as_str())),
        unique_key: context.unique_count_field().and_then(position),
        ignored_digits: context.ignore_digits.unwrap_or(0),
    }
}

/// Bar chart forms, one per chart type panel
#[derive(Debug, Clone, Default)]
pub struct FormPanels {
    panels: HashMap<String, BarChartForm>,
}

impl FormPanels {
    pub fn active(&self, chart_type: &str) -> BarChartForm {
        self.panels.get(chart_type).cloned().unwrap_or_default()
    }

    pub fn active_mut(&mut self, chart_type: &str) -> &mut BarChartForm {
        self.panels.entry(chart_type.to_string()).or_default()
    }
}

/// Clear the form inside the active chart type's panel only
pub fn clear_bar_chart_form<'a>(
    panels: &'a mut FormPanels,
    current_chart_type: &str,
) -> &'a BarChartForm {
    let form = panels.active_mut(current_chart_type);
    form.clear();
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<FieldMeta> {
        vec![
            FieldMeta::new("state", "STRING"),
            FieldMeta::new("userId", "STRING"),
            FieldMeta::new("amount", "LONG"),
        ]
    }

    fn filled_form() -> BarChartForm {
        BarChartForm {
            time_unit: TimeUnit::Hours,
            timeframe: "6".to_string(),
            event_field: Some(0),
            unique_key: Some(1),
            ignored_digits: 2,
        }
    }

    #[test]
    fn test_read_valid_form() {
        let values = get_bar_chart_form_values(&filled_form(), &fields());

        assert!(values.valid);
        assert_eq!(
            values.config,
            Some(BarChartConfig {
                period: TimeUnit::Hours,
                timeframe: 6,
                nesting: vec!["state".to_string()],
                unique_count_on: Some("userId".to_string()),
                ignore_digits: 2,
            })
        );
    }

    #[test]
    fn test_read_without_grouping_field() {
        let mut form = filled_form();
        form.event_field = None;

        let values = get_bar_chart_form_values(&form, &fields());
        assert_eq!(values, FormValues { config: None, valid: false });
    }

    #[test]
    fn test_read_invalid_timeframe_still_returns_config() {
        let mut form = filled_form();
        form.timeframe = "abc".to_string();
        let values = get_bar_chart_form_values(&form, &fields());
        assert!(!values.valid);
        assert!(values.config.is_some());

        form.timeframe = "0".to_string();
        assert!(!get_bar_chart_form_values(&form, &fields()).valid);
    }

    #[test]
    fn test_read_unknown_unique_key_is_invalid() {
        let mut form = filled_form();
        form.unique_key = Some(9);
        assert!(!get_bar_chart_form_values(&form, &fields()).valid);
    }

    #[test]
    fn test_set_from_context() {
        let mut ctx = TileContext::new("orders");
        ctx.period = TimeUnit::Days;
        ctx.timeframe = 3;
        ctx.nesting = vec!["amount".to_string()];
        ctx.unique_count_on = Some("userId".to_string());

        let form = set_bar_chart_form_values(&ctx, &fields());
        assert_eq!(
            form,
            BarChartForm {
                time_unit: TimeUnit::Days,
                timeframe: "3".to_string(),
                event_field: Some(2),
                unique_key: Some(1),
                ignored_digits: 0,
            }
        );
    }

    #[test]
    fn test_form_round_trip_through_context() {
        let mut ctx = TileContext::new("orders");
        let values = get_bar_chart_form_values(&filled_form(), &fields());
        values.config.unwrap().apply_to(&mut ctx);

        assert_eq!(set_bar_chart_form_values(&ctx, &fields()), filled_form());
    }

    #[test]
    fn test_clear_resets_active_panel_only() {
        let mut panels = FormPanels::default();
        *panels.active_mut("bar") = filled_form();
        *panels.active_mut("stacked_bar") = filled_form();

        let cleared = clear_bar_chart_form(&mut panels, "bar").clone();
        assert_eq!(cleared, BarChartForm::default());
        assert_eq!(cleared.time_unit, TimeUnit::Minutes);
        assert!(cleared.timeframe.is_empty());
        assert_eq!(cleared.event_field, None);
        assert_eq!(cleared.unique_key, None);
        assert_eq!(cleared.ignored_digits, 0);

        assert_eq!(panels.active("stacked_bar"), filled_form());
    }
}
