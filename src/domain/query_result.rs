// Backend query result shapes
use super::series::{RawSample, RawSeries};
use serde::Deserialize;

/// A number the backend may send either as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Text(String),
    Number(serde_json::Number),
}

impl Decimal {
    pub fn into_text(self) -> String {
        match self {
            Decimal::Text(text) => text,
            Decimal::Number(number) => number.to_string(),
        }
    }
}

/// One labelled series of a matrix. Labels are not plotted and are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixSeries {
    #[serde(default)]
    pub values: Vec<RawSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorSample {
    pub value: RawSample,
}

/// The `data` object of a query response, keyed by `resultType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryResult {
    Matrix(Vec<MatrixSeries>),
    Vector(Vec<VectorSample>),
    Scalar(RawSample),
    String(RawSample),
}

impl QueryResult {
    pub fn result_type(&self) -> &'static str {
        match self {
            QueryResult::Matrix(_) => "matrix",
            QueryResult::Vector(_) => "vector",
            QueryResult::Scalar(_) => "scalar",
            QueryResult::String(_) => "string",
        }
    }

    /// Merge every labelled series of a matrix into one raw series.
    /// Any other shape is handed back as the error.
    pub fn into_raw_series(self) -> Result<RawSeries, QueryResult> {
        match self {
            QueryResult::Matrix(series) => Ok(RawSeries::new(
                series.into_iter().flat_map(|s| s.values).collect(),
            )),
            other => Err(other),
        }
    }
}

/// Envelope returned by the range query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<QueryResult>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
