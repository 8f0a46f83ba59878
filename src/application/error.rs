// Error taxonomy for a plot request
use thiserror::Error;

/// Failure reported by a `QueryBackend` implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(String),

    #[error("backend responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Why a single range query was rejected.
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("failed to make request: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to make request (invalid status): {status}: {message}")]
    Status { status: String, message: String },

    #[error("query must yield a matrix, got {0}")]
    NotMatrix(&'static str),

    #[error("deadline exceeded before the backend answered")]
    DeadlineExceeded,

    #[error("query task ended without reporting a result")]
    Lost,
}

#[derive(Debug, Error)]
#[error("query {query:?}: {cause}")]
pub struct QueryError {
    pub query: String,
    #[source]
    pub cause: QueryFailure,
}

impl QueryError {
    pub fn new(query: impl Into<String>, cause: impl Into<QueryFailure>) -> Self {
        Self {
            query: query.into(),
            cause: cause.into(),
        }
    }
}

/// A backend sample whose timestamp or value is not a usable number.
#[derive(Debug, Error, PartialEq)]
#[error("invalid {field} {text:?} in sample {index}")]
pub struct SampleError {
    pub index: usize,
    pub field: &'static str,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render")]
    Empty,

    #[error("failed to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("requires a single source_id")]
    SourceId,

    #[error("requires a single metric")]
    Metric,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("invalid sample in result of query {query:?}: {source}")]
    Sample {
        query: String,
        #[source]
        source: SampleError,
    },

    #[error("there has to be at least one series")]
    NoSeries,

    #[error("no series to anchor to: scalar reference lines need at least one query series")]
    NoAnchor,

    #[error("failed to render chart: {0}")]
    Render(#[from] RenderError),
}

impl PlotError {
    /// Input errors are the caller's fault; everything else is on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlotError::SourceId | PlotError::Metric)
    }
}
