use crate::domain::context::{DashboardContext, DEFAULT_CHART_TYPE};
use crate::domain::filter::{Filter, PeriodSelection, TimeUnit};
use crate::domain::tile::{Tile, TileContext, WidgetType};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    pub console: ConsoleSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleSettings {
    pub api_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ConsoleSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default)]
    pub global_filters: bool,
    #[serde(default = "default_chart_type")]
    pub current_chart_type: String,
    /// Trailing window applied to every tile when global filters are on, e.g. "24h"
    #[serde(default)]
    pub global_window: Option<String>,
}

fn default_chart_type() -> String {
    DEFAULT_CHART_TYPE.to_string()
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            global_filters: false,
            current_chart_type: default_chart_type(),
            global_window: None,
        }
    }
}

impl DashboardSettings {
    pub fn into_context(self) -> DashboardContext {
        let global_period = match self.global_window {
            Some(duration) => PeriodSelection::Window { duration },
            None => PeriodSelection::Custom,
        };

        DashboardContext {
            global_filters: self.global_filters,
            global_period,
            current_chart_type: self.current_chart_type,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TilesConfig {
    #[serde(default)]
    pub tiles: Vec<TileConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileConfig {
    pub id: String,
    pub title: String,
    pub table: String,
    #[serde(default)]
    pub period: TimeUnit,
    #[serde(default)]
    pub timeframe: u32,
    #[serde(default)]
    pub nesting: Vec<String>,
    #[serde(default)]
    pub unique_count_on: Option<String>,
    #[serde(default)]
    pub ignore_digits: Option<u32>,
    #[serde(default)]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl TileConfig {
    pub fn into_tile(self) -> Tile {
        let mut tile_context = TileContext::new(self.table);
        tile_context.filters = self.filters;
        tile_context.period = self.period;
        tile_context.timeframe = self.timeframe;
        tile_context.nesting = self.nesting;
        tile_context.unique_count_on = self.unique_count_on;
        tile_context.ignore_digits = self.ignore_digits;
        tile_context.widget_type = self.widget_type;

        Tile::new(self.id, self.title, tile_context)
    }
}

pub fn load_console_config() -> anyhow::Result<ConsoleConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/console"))
        .add_source(
            config::Environment::with_prefix("BAR_TILE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_tiles_config() -> anyhow::Result<TilesConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tiles").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse<T: serde::de::DeserializeOwned>(toml: &str) -> T {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_console_defaults() {
        let config: ConsoleConfig = parse(
            r#"
            [console]
            api_url = "http://foxtrot:17000/foxtrot"
            "#,
        );

        assert_eq!(config.console.bind_address, "0.0.0.0:8080");
        assert_eq!(config.console.request_timeout(), Duration::from_secs(30));

        let context = config.dashboard.into_context();
        assert!(!context.global_filters);
        assert_eq!(context.current_chart_type, "bar");
        assert_eq!(context.global_period, PeriodSelection::Custom);
    }

    #[test]
    fn test_global_window() {
        let config: ConsoleConfig = parse(
            r#"
            [console]
            api_url = "http://localhost"

            [dashboard]
            global_filters = true
            global_window = "24h"
            "#,
        );

        let context = config.dashboard.into_context();
        assert!(context.global_filters);
        assert_eq!(
            context.global_period,
            PeriodSelection::Window {
                duration: "24h".to_string()
            }
        );
    }

    #[test]
    fn test_tiles_into_domain() {
        let config: TilesConfig = parse(
            r#"
            [[tiles]]
            id = "orders-by-state"
            title = "Orders by state"
            table = "orders"
            period = "hours"
            timeframe = 6
            nesting = ["state"]
            ignore_digits = 3
            widget_type = "medium"

            [[tiles.filters]]
            operator = "equals"
            field = "city"
            value = "Pune"
            "#,
        );

        let tile = config.tiles[0].clone().into_tile();
        assert_eq!(tile.id, "orders-by-state");
        assert_eq!(tile.tile_context.period, TimeUnit::Hours);
        assert_eq!(tile.tile_context.timeframe, 6);
        assert_eq!(tile.tile_context.ignore_digits, Some(3));
        assert_eq!(tile.tile_context.widget_type, WidgetType::Medium);
        assert_eq!(tile.tile_context.filters.len(), 1);
        assert_eq!(tile.tile_context.unique_count_field(), None);
    }
}
