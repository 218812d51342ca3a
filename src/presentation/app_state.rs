// Application state for HTTP handlers
use crate::application::bar_tile_service::BarTileService;
use crate::application::streaming_service::StreamingDashboardService;

#[derive(Clone)]
pub struct AppState {
    pub tile_service: BarTileService,
    pub streaming_service: StreamingDashboardService,
}
