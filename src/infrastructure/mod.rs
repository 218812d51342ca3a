// Infrastructure layer - External dependencies and adapters
pub mod analytics_client;
pub mod chunked_json;
pub mod config;
pub mod http_response;
