// Bar tile service - use cases for refreshing and editing bar tiles
use crate::application::analytics_repository::AnalyticsRepository;
use crate::domain::analytics::FieldMeta;
use crate::domain::bar_tile::{BarTile, DataOutcome};
use crate::domain::chart::Plot;
use crate::domain::context::DashboardContext;
use crate::domain::filter::PeriodSelection;
use crate::domain::form::{
    clear_bar_chart_form, get_bar_chart_form_values, set_bar_chart_form_values, BarChartForm,
    FormPanels, FormValues,
};
use crate::domain::tile::{Tile, TileContext};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("tile {0} not found")]
    NotFound(String),
    #[error("analytics request failed: {0:#}")]
    Analytics(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Rendered(Plot),
    /// Nothing new to draw; carries whatever chart the tile already had
    Unchanged(Option<Plot>),
}

#[derive(Clone)]
pub struct BarTileService {
    repository: Arc<dyn AnalyticsRepository>,
    order: Arc<Vec<String>>,
    tiles: Arc<RwLock<HashMap<String, BarTile>>>,
    context: Arc<RwLock<DashboardContext>>,
    forms: Arc<RwLock<FormPanels>>,
}

impl BarTileService {
    pub fn new(
        repository: Arc<dyn AnalyticsRepository>,
        tiles: Vec<Tile>,
        context: DashboardContext,
    ) -> Self {
        let order = tiles.iter().map(|t| t.id.clone()).collect();
        let tiles = tiles
            .into_iter()
            .map(|t| (t.id.clone(), BarTile::new(t)))
            .collect();

        Self {
            repository,
            order: Arc::new(order),
            tiles: Arc::new(RwLock::new(tiles)),
            context: Arc::new(RwLock::new(context)),
            forms: Arc::new(RwLock::new(FormPanels::default())),
        }
    }

    pub fn tile_ids(&self) -> &[String] {
        &self.order
    }

    pub async fn tiles(&self) -> Vec<Tile> {
        let tiles = self.tiles.read().await;
        self.order
            .iter()
            .filter_map(|id| tiles.get(id))
            .map(|t| t.tile().clone())
            .collect()
    }

    pub async fn tile(&self, id: &str) -> Result<Tile, TileError> {
        let tiles = self.tiles.read().await;
        tiles
            .get(id)
            .map(|t| t.tile().clone())
            .ok_or_else(|| TileError::NotFound(id.to_string()))
    }

    /// Query the backend for a tile and redraw it from the response
    pub async fn refresh(&self, id: &str) -> Result<RefreshOutcome, TileError> {
        let pending = {
            let context = self.context.read().await;
            let mut tiles = self.tiles.write().await;
            let tile = tiles
                .get_mut(id)
                .ok_or_else(|| TileError::NotFound(id.to_string()))?;
            tile.get_query(&context, Utc::now())
        };

        let result = self.repository.group(&pending.request).await;

        let mut tiles = self.tiles.write().await;
        let tile = tiles
            .get_mut(id)
            .ok_or_else(|| TileError::NotFound(id.to_string()))?;

        match result {
            Ok(response) => match tile.get_data(pending.sequence, &response) {
                DataOutcome::Rendered(plot) => {
                    tracing::debug!("Tile {} rendered {} series", id, plot.series.len());
                    Ok(RefreshOutcome::Rendered(plot))
                }
                DataOutcome::Empty | DataOutcome::Stale => {
                    Ok(RefreshOutcome::Unchanged(tile.plot().cloned()))
                }
            },
            Err(e) => {
                tile.abandon(pending.sequence);
                tracing::warn!("Group query for tile {} failed: {:#}", id, e);
                Err(TileError::Analytics(e))
            }
        }
    }

    /// Form values for editing a tile
    pub async fn form(&self, id: &str) -> Result<BarChartForm, TileError> {
        let context = self.context.read().await;
        let tile = self.tile(id).await?;
        Ok(set_bar_chart_form_values(
            &tile.tile_context,
            &context.fields,
        ))
    }

    /// Read a submitted form; a valid one is saved into the tile's configuration
    pub async fn submit_form(&self, id: &str, form: BarChartForm) -> Result<FormValues, TileError> {
        let context = self.context.read().await;
        let mut forms = self.forms.write().await;
        let mut tiles = self.tiles.write().await;
        let tile = tiles
            .get_mut(id)
            .ok_or_else(|| TileError::NotFound(id.to_string()))?;

        let values = get_bar_chart_form_values(&form, &context.fields);
        *forms.active_mut(&context.current_chart_type) = form;

        if let (true, Some(config)) = (values.valid, values.config.clone()) {
            config.apply_to(&mut tile.tile_mut().tile_context);
            tracing::info!("Tile {} configuration updated", id);
        }
        Ok(values)
    }

    pub async fn active_form(&self) -> BarChartForm {
        let context = self.context.read().await;
        self.forms.read().await.active(&context.current_chart_type)
    }

    pub async fn clear_form(&self) -> BarChartForm {
        let context = self.context.read().await;
        let mut forms = self.forms.write().await;
        clear_bar_chart_form(&mut forms, &context.current_chart_type).clone()
    }

    /// Replace the set of legend categories the user has hidden
    pub async fn set_hidden(&self, id: &str, labels: Vec<String>) -> Result<TileContext, TileError> {
        let mut tiles = self.tiles.write().await;
        let tile = tiles
            .get_mut(id)
            .ok_or_else(|| TileError::NotFound(id.to_string()))?;

        let tile_context = &mut tile.tile_mut().tile_context;
        tile_context.ui_filters_selected_list = Some(labels);
        Ok(tile_context.clone())
    }

    /// Legend mouse-enter (`active`) or mouse-leave on the drawn chart
    pub async fn hover_legend(
        &self,
        id: &str,
        label: &str,
        active: bool,
    ) -> Result<Option<Plot>, TileError> {
        let mut tiles = self.tiles.write().await;
        let tile = tiles
            .get_mut(id)
            .ok_or_else(|| TileError::NotFound(id.to_string()))?;

        let Some(plot) = tile.plot_mut() else {
            return Ok(None);
        };
        if active {
            plot.highlight(label);
        } else {
            plot.restore(label);
        }
        Ok(Some(plot.clone()))
    }

    pub async fn set_global_period(&self, enabled: bool, selection: PeriodSelection) {
        let mut context = self.context.write().await;
        context.global_filters = enabled;
        context.global_period = selection;
    }

    pub async fn set_tile_period(&self, id: &str, selection: PeriodSelection) -> Result<(), TileError> {
        if !self.order.iter().any(|t| t == id) {
            return Err(TileError::NotFound(id.to_string()));
        }
        let mut context = self.context.write().await;
        context.period_selects.insert(id.to_string(), selection);
        Ok(())
    }

    /// Load a table's fields and make them the current field list
    pub async fn refresh_fields(&self, table: &str) -> Result<Vec<FieldMeta>, TileError> {
        let fields = self
            .repository
            .table_fields(table)
            .await
            .map_err(TileError::Analytics)?;

        tracing::info!("Loaded {} fields for table {}", fields.len(), table);
        self.context.write().await.fields = fields.clone();
        Ok(fields)
    }
}
