// PromQL range query client over the Prometheus-compatible HTTP API
use crate::application::error::BackendError;
use crate::application::query_backend::{QueryBackend, RangeQuery};
use crate::domain::query_result::QueryResponse;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PromQlClient {
    address: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl PromQlClient {
    pub fn new(
        address: String,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            auth_token,
            client,
        })
    }

    fn build_query_url(&self, query: &RangeQuery) -> String {
        format!(
            "{}/api/v1/query_range?query={}&start={}&end={}&step={}",
            self.address,
            urlencoding::encode(&query.expression),
            unix_seconds(query.start),
            unix_seconds(query.end),
            query.step.as_secs_f64()
        )
    }
}

/// Unix time in seconds with millisecond precision, as the API expects.
fn unix_seconds(t: DateTime<Utc>) -> String {
    format!("{:.3}", t.timestamp_millis() as f64 / 1000.0)
}

#[async_trait]
impl QueryBackend for PromQlClient {
    async fn query_range(&self, query: &RangeQuery) -> Result<QueryResponse, BackendError> {
        let url = self.build_query_url(query);
        tracing::debug!("Executing range query: {}", url);

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        // Error statuses still carry the JSON envelope with the backend's reason.
        match serde_json::from_str::<QueryResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(BackendError::Decode(e.to_string())),
            Err(_) => Err(BackendError::Http {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
