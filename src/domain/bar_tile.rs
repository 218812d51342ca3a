// Bar tile - query building, response transformation and rendering for one tile
use super::analytics::{GroupRequest, GroupResponse};
use super::chart::{BarSeries, ChartOptions, Colors, Plot, XAxisOptions};
use super::context::DashboardContext;
use super::filter::time_value;
use super::tile::Tile;
use chrono::{DateTime, Utc};

/// A request issued by `get_query`, tagged with the tile's request sequence
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub sequence: u64,
    pub request: GroupRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataOutcome {
    Rendered(Plot),
    /// Empty or missing result, previous chart kept
    Empty,
    /// A newer request was issued after this one
    Stale,
}

#[derive(Debug, Clone)]
pub struct BarTile {
    tile: Tile,
    sequence: u64,
    plot: Option<Plot>,
}

impl BarTile {
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            sequence: 0,
            plot: None,
        }
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn tile_mut(&mut self) -> &mut Tile {
        &mut self.tile
    }

    pub fn plot(&self) -> Option<&Plot> {
        self.plot.as_ref()
    }

    pub fn plot_mut(&mut self) -> Option<&mut Plot> {
        self.plot.as_mut()
    }

    fn pop_time_filter(&mut self) {
        let filters = &mut self.tile.tile_context.filters;
        if filters.last().is_some_and(|f| f.is_time_filter()) {
            filters.pop();
        }
    }

    /// Append a fresh time filter and build the group request.
    ///
    /// Any time filter left behind by an abandoned request is replaced, so the
    /// filter list holds exactly one while the request is in flight.
    pub fn get_query(&mut self, context: &DashboardContext, now: DateTime<Utc>) -> PendingQuery {
        self.pop_time_filter();

        let tile_context = &mut self.tile.tile_context;
        let selection = context.period_for(&self.tile.id);
        tile_context.filters.push(time_value(
            tile_context.period,
            tile_context.timeframe,
            selection,
            now,
        ));

        self.sequence += 1;
        let request = GroupRequest::from_context(tile_context);

        tracing::debug!(
            "Tile {} issuing group query #{} on {} ({} filters)",
            self.tile.id,
            self.sequence,
            request.table,
            request.filters.len()
        );

        PendingQuery {
            sequence: self.sequence,
            request,
        }
    }

    /// Turn a group response into bar series and draw it
    pub fn get_data(&mut self, sequence: u64, response: &GroupResponse) -> DataOutcome {
        if sequence != self.sequence {
            tracing::debug!(
                "Dropping stale response #{} for tile {} (latest #{})",
                sequence,
                self.tile.id,
                self.sequence
            );
            return DataOutcome::Stale;
        }

        self.pop_time_filter();

        let tile_context = &mut self.tile.tile_context;
        tile_context.ui_filters_list.get_or_insert_with(Vec::new);
        tile_context.ui_filters_selected_list.get_or_insert_with(Vec::new);

        let categories = response.categories();
        if categories.is_empty() {
            return DataOutcome::Empty;
        }

        let scale = tile_context.digit_scale();
        let mut colors = Colors::new(categories.len());
        let mut columns = Vec::new();
        let mut seen = Vec::with_capacity(categories.len());

        for (index, (label, raw)) in categories.into_iter().enumerate() {
            if !tile_context.is_hidden(label) {
                columns.push(BarSeries::new(
                    label.to_string(),
                    index,
                    raw / scale,
                    colors.next_color(),
                ));
            }
            seen.push(label.to_string());
        }
        tile_context.ui_filters_list = Some(seen);

        DataOutcome::Rendered(self.render(XAxisOptions::suppressed(), columns).clone())
    }

    /// Forget a request that failed; its time filter is dropped if it is still the latest
    pub fn abandon(&mut self, sequence: u64) {
        if sequence == self.sequence {
            self.pop_time_filter();
        }
    }

    fn render(&mut self, xaxis: XAxisOptions, columns: Vec<BarSeries>) -> &Plot {
        let options = ChartOptions::bar(self.tile.tile_context.widget_type, xaxis, &columns);
        self.plot.insert(Plot::draw(options, columns))
    }
}
