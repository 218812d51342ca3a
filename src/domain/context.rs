// Dashboard context - state shared by every tile on the console
use super::analytics::FieldMeta;
use super::filter::PeriodSelection;
use std::collections::HashMap;

pub const DEFAULT_CHART_TYPE: &str = "bar";

static CUSTOM_PERIOD: PeriodSelection = PeriodSelection::Custom;

#[derive(Debug, Clone)]
pub struct DashboardContext {
    /// When set, every tile takes its period from `global_period`
    pub global_filters: bool,
    pub global_period: PeriodSelection,
    pub period_selects: HashMap<String, PeriodSelection>,
    /// Field list of the table currently being edited
    pub fields: Vec<FieldMeta>,
    pub current_chart_type: String,
}

impl Default for DashboardContext {
    fn default() -> Self {
        Self {
            global_filters: false,
            global_period: PeriodSelection::default(),
            period_selects: HashMap::new(),
            fields: Vec::new(),
            current_chart_type: DEFAULT_CHART_TYPE.to_string(),
        }
    }
}

impl DashboardContext {
    pub fn period_for(&self, tile_id: &str) -> &PeriodSelection {
        if self.global_filters {
            return &self.global_period;
        }
        self.period_selects
            .get(tile_id)
            .unwrap_or(&CUSTOM_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_for_prefers_global_when_enabled() {
        let mut ctx = DashboardContext::default();
        let window = PeriodSelection::Window {
            duration: "1h".to_string(),
        };
        ctx.period_selects.insert("t1".to_string(), window.clone());
        ctx.global_period = PeriodSelection::Window {
            duration: "30d".to_string(),
        };

        assert_eq!(ctx.period_for("t1"), &window);
        assert_eq!(ctx.period_for("t2"), &PeriodSelection::Custom);

        ctx.global_filters = true;
        assert_eq!(ctx.period_for("t1"), &ctx.global_period);
    }
}
