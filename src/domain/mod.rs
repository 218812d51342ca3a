// Domain layer - tile configuration, form binding and chart model
pub mod analytics;
pub mod bar_tile;
pub mod chart;
pub mod context;
pub mod filter;
pub mod form;
pub mod tile;
