// HTTP response utilities for chart images and plain-text errors
use crate::application::error::PlotError;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

/// Wrap encoded PNG bytes in an `image/png` response.
pub fn png_response(png: Vec<u8>) -> Result<Response<Body>, StatusCode> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, HeaderValue::from(png.len()))
        .body(Body::from(png))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Plain-text error body; 400 for bad input, 500 for everything else.
pub fn error_response(err: &PlotError) -> Result<Response<Body>, StatusCode> {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(err.to_string()))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
