// HTTP request handlers
use crate::application::plot_service::compose_expression;
use crate::infrastructure::http_response::{error_response, png_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::time::Instant;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Browsers ask for this on every page load.
pub async fn favicon() -> StatusCode {
    StatusCode::OK
}

/// Render the chart for the bound expressions, or for `source_id` + `metric`
pub async fn plot_chart(
    Query(params): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let deadline = Instant::now() + state.query_timeout;

    let expressions = if state.expressions.is_empty() {
        match compose_expression(&params) {
            Ok(expression) => vec![expression],
            Err(e) => {
                tracing::info!("Rejecting plot request: {}", e);
                return into_response(error_response(&e));
            }
        }
    } else {
        state.expressions.clone()
    };

    match state.plot_service.plot(&expressions, deadline).await {
        Ok(png) => into_response(png_response(png)),
        Err(e) => {
            tracing::error!("Failed to plot {:?}: {}", expressions, e);
            into_response(error_response(&e))
        }
    }
}

fn into_response(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
