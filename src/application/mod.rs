// Application layer - use cases over the analytics repository
pub mod analytics_repository;
pub mod bar_tile_service;
pub mod streaming_service;
