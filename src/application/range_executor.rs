// Concurrent range query fan-out and fail-fast collection
use crate::application::error::{BackendError, QueryError, QueryFailure};
use crate::application::query_backend::{QueryBackend, RangeQuery};
use crate::domain::color::Color;
use crate::domain::expression::Slot;
use crate::domain::query_result::QueryResponse;
use crate::domain::series::RawSeries;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

pub const RANGE_WINDOW: Duration = Duration::from_secs(5 * 60);
pub const RANGE_STEP: Duration = Duration::from_secs(1);

/// Raw samples fetched for one query, tagged with its submission slot.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub index: usize,
    pub color: Color,
    pub query: String,
    pub raw: RawSeries,
}

#[derive(Clone)]
pub struct RangeQueryExecutor {
    backend: Arc<dyn QueryBackend>,
}

impl RangeQueryExecutor {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    /// Launch one task per query over `[now - 5m, now]`, all bounded by `deadline`.
    pub fn spawn(
        &self,
        queries: &[Slot<String>],
        now: DateTime<Utc>,
        deadline: Instant,
    ) -> InFlight {
        // Sized so that no task ever waits on a full channel.
        let (tx, rx) = mpsc::channel(queries.len().max(1));
        let start = now - chrono::Duration::seconds(RANGE_WINDOW.as_secs() as i64);
        let mut handles = Vec::with_capacity(queries.len());

        for slot in queries {
            let tx = tx.clone();
            let backend = self.backend.clone();
            let slot = slot.clone();
            let request = RangeQuery {
                expression: slot.item.clone(),
                start,
                end: now,
                step: RANGE_STEP,
            };

            let handle = tokio::spawn(async move {
                let outcome =
                    match tokio::time::timeout_at(deadline, backend.query_range(&request)).await {
                        Err(_) => Err(QueryFailure::DeadlineExceeded),
                        Ok(Err(e)) => Err(QueryFailure::Backend(e)),
                        Ok(Ok(response)) => accept_matrix(response),
                    };

                let message = match outcome {
                    Ok(raw) => Ok(Fetched {
                        index: slot.index,
                        color: slot.color,
                        query: slot.item,
                        raw,
                    }),
                    Err(cause) => {
                        tracing::debug!("Range query {} failed: {}", slot.item, cause);
                        Err(QueryError::new(slot.item, cause))
                    }
                };
                // The collector may already have given up on this request.
                let _ = tx.send(message).await;
            });
            handles.push(handle.abort_handle());
        }

        InFlight {
            rx,
            handles,
            pending: queries.iter().map(|s| (s.index, s.item.clone())).collect(),
        }
    }
}

/// Only a successful matrix result yields samples.
fn accept_matrix(response: QueryResponse) -> Result<RawSeries, QueryFailure> {
    if !response.is_success() {
        let message = response
            .error
            .or(response.error_type)
            .unwrap_or_default();
        return Err(QueryFailure::Status {
            status: response.status,
            message,
        });
    }

    let data = response
        .data
        .ok_or_else(|| BackendError::Decode("response carried no data".to_string()))?;

    data.into_raw_series()
        .map_err(|other| QueryFailure::NotMatrix(other.result_type()))
}

/// Outstanding range queries of one request.
///
/// Dropping this aborts every task that has not reported yet.
pub struct InFlight {
    rx: mpsc::Receiver<Result<Fetched, QueryError>>,
    handles: Vec<AbortHandle>,
    pending: Vec<(usize, String)>,
}

impl InFlight {
    /// Wait for every query, returning the first error observed.
    pub async fn collect(mut self) -> Result<Vec<Fetched>, QueryError> {
        let mut fetched = Vec::with_capacity(self.pending.len());

        while !self.pending.is_empty() {
            match self.rx.recv().await {
                Some(Ok(result)) => {
                    self.pending.retain(|(index, _)| *index != result.index);
                    fetched.push(result);
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        "Failing plot request, {} queries still in flight: {}",
                        self.pending.len() - 1,
                        e
                    );
                    return Err(e);
                }
                None => {
                    // Every sender is gone but some query never reported (task panicked).
                    let (_, query) = self.pending.remove(0);
                    return Err(QueryError::new(query, QueryFailure::Lost));
                }
            }
        }

        Ok(fetched)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::query_backend::fake::{matrix, FakeBackend, Reply};
    use crate::domain::color::palette_color;
    use crate::domain::series::RawSample;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn slots(queries: &[&str]) -> Vec<Slot<String>> {
        queries
            .iter()
            .enumerate()
            .map(|(index, q)| Slot {
                index,
                color: palette_color(index),
                item: q.to_string(),
            })
            .collect()
    }

    fn deadline_in(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    #[tokio::test]
    async fn test_collects_every_query() {
        let backend = FakeBackend::new()
            .reply("a", 30, Reply::Body(matrix(&[("1", "1.0")])))
            .reply("b", 5, Reply::Body(matrix(&[("2", "2.0"), ("3", "3.0")])));
        let executor = RangeQueryExecutor::new(Arc::new(backend.clone()));

        let mut fetched = executor
            .spawn(&slots(&["a", "b"]), Utc::now(), deadline_in(5_000))
            .collect()
            .await
            .unwrap();
        fetched.sort_by_key(|f| f.index);

        assert_eq!(backend.call_count(), 2);
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].query, "a");
        assert_eq!(fetched[0].color, Color::Blue);
        assert_eq!(fetched[0].raw.samples, vec![RawSample::new("1", "1.0")]);
        assert_eq!(fetched[1].raw.samples.len(), 2);
    }

    #[tokio::test]
    async fn test_first_error_wins_without_waiting_for_slow_queries() {
        let backend = FakeBackend::new()
            .reply("slow", 2_000, Reply::Body(matrix(&[("1", "1")])))
            .reply("broken", 5, Reply::Fail("connection refused"));
        let executor = RangeQueryExecutor::new(Arc::new(backend));

        let started = std::time::Instant::now();
        let err = executor
            .spawn(&slots(&["slow", "broken"]), Utc::now(), deadline_in(10_000))
            .collect()
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert_eq!(err.query, "broken");
        assert!(matches!(err.cause, QueryFailure::Backend(BackendError::Transport(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_outstanding_queries_are_aborted_on_failure() {
        struct Tracking(Arc<AtomicBool>);

        #[async_trait::async_trait]
        impl QueryBackend for Tracking {
            async fn query_range(&self, query: &RangeQuery) -> Result<QueryResponse, BackendError> {
                if query.expression == "broken" {
                    return Err(BackendError::Transport("boom".to_string()));
                }
                tokio::time::sleep(Duration::from_millis(150)).await;
                self.0.store(true, Ordering::SeqCst);
                Err(BackendError::Transport("late".to_string()))
            }
        }

        let finished = Arc::new(AtomicBool::new(false));
        let executor = RangeQueryExecutor::new(Arc::new(Tracking(finished.clone())));

        let result = executor
            .spawn(&slots(&["slow", "broken"]), Utc::now(), deadline_in(5_000))
            .collect()
            .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_non_matrix_result_is_rejected() {
        let vector = r#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{},"value":[1,"2"]}]}}"#;
        let backend = FakeBackend::new().reply("v", 1, Reply::Body(vector.to_string()));
        let executor = RangeQueryExecutor::new(Arc::new(backend));

        let err = executor
            .spawn(&slots(&["v"]), Utc::now(), deadline_in(5_000))
            .collect()
            .await
            .unwrap_err();

        assert!(matches!(err.cause, QueryFailure::NotMatrix("vector")));
        assert!(err.to_string().contains("must yield a matrix"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let body = r#"{"status":"error","errorType":"bad_data","error":"unknown function"}"#;
        let backend = FakeBackend::new().reply("q", 1, Reply::Body(body.to_string()));
        let executor = RangeQueryExecutor::new(Arc::new(backend));

        let err = executor
            .spawn(&slots(&["q"]), Utc::now(), deadline_in(5_000))
            .collect()
            .await
            .unwrap_err();

        assert!(matches!(err.cause, QueryFailure::Status { .. }));
        assert!(err.to_string().contains("invalid status"));
        assert!(err.to_string().contains("unknown function"));
    }

    #[tokio::test]
    async fn test_deadline_is_shared_by_all_queries() {
        let backend = FakeBackend::new()
            .reply("a", 2_000, Reply::Body(matrix(&[("1", "1")])))
            .reply("b", 2_000, Reply::Body(matrix(&[("1", "1")])));
        let executor = RangeQueryExecutor::new(Arc::new(backend));

        let started = std::time::Instant::now();
        let err = executor
            .spawn(&slots(&["a", "b"]), Utc::now(), deadline_in(50))
            .collect()
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert!(matches!(err.cause, QueryFailure::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_requests_cover_last_five_minutes_at_one_second_step() {
        struct Capture(tokio::sync::Mutex<Vec<RangeQuery>>);

        #[async_trait::async_trait]
        impl QueryBackend for Capture {
            async fn query_range(&self, query: &RangeQuery) -> Result<QueryResponse, BackendError> {
                self.0.lock().await.push(query.clone());
                serde_json::from_str(&matrix(&[("1", "1")]))
                    .map_err(|e| BackendError::Decode(e.to_string()))
            }
        }

        let capture = Arc::new(Capture(tokio::sync::Mutex::new(Vec::new())));
        let executor = RangeQueryExecutor::new(capture.clone());
        let now = Utc::now();

        executor
            .spawn(&slots(&["q"]), now, deadline_in(5_000))
            .collect()
            .await
            .unwrap();

        let seen = capture.0.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].end, now);
        assert_eq!(seen[0].end - seen[0].start, chrono::Duration::minutes(5));
        assert_eq!(seen[0].step, Duration::from_secs(1));
    }
}
