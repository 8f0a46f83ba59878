// Backend trait for range query evaluation
use crate::application::error::BackendError;
use crate::domain::query_result::QueryResponse;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub expression: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Evaluate one expression over `[start, end]` at the given step.
    async fn query_range(&self, query: &RangeQuery) -> Result<QueryResponse, BackendError>;
}
