// Analytics HTTP client - repository implementation over the backend REST API
use crate::application::analytics_repository::AnalyticsRepository;
use crate::domain::analytics::{FieldMeta, GroupRequest, GroupResponse, TableFields};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: reqwest::Client,
    api_url: String,
}

impl AnalyticsClient {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build analytics HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn analytics_url(&self) -> String {
        format!("{}/v1/analytics", self.api_url)
    }

    fn fields_url(&self, table: &str) -> String {
        format!(
            "{}/v1/tables/{}/fields",
            self.api_url,
            urlencoding::encode(table)
        )
    }

    async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} failed with status {}: {}", what, status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl AnalyticsRepository for AnalyticsClient {
    async fn group(&self, request: &GroupRequest) -> Result<GroupResponse> {
        tracing::debug!("POST {} table={}", self.analytics_url(), request.table);

        let response = self
            .client
            .post(self.analytics_url())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send analytics request")?;

        Self::check_status(response, "Analytics query")
            .await?
            .json::<GroupResponse>()
            .await
            .context("Failed to parse analytics response")
    }

    async fn table_fields(&self, table: &str) -> Result<Vec<FieldMeta>> {
        let response = self
            .client
            .get(self.fields_url(table))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send table fields request")?;

        let fields = Self::check_status(response, "Table fields lookup")
            .await?
            .json::<TableFields>()
            .await
            .context("Failed to parse table fields response")?;

        Ok(fields.mappings)
    }
}
