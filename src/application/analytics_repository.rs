// Repository trait for analytics backend access
use crate::domain::analytics::{FieldMeta, GroupRequest, GroupResponse};
use async_trait::async_trait;

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Run a group aggregation
    async fn group(&self, request: &GroupRequest) -> anyhow::Result<GroupResponse>;

    /// Field metadata for a table
    async fn table_fields(&self, table: &str) -> anyhow::Result<Vec<FieldMeta>>;
}
