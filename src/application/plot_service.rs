// Plot service - Use case for turning expressions into a chart
use crate::application::broadcast::broadcast_scalars;
use crate::application::coloring::order_by_color;
use crate::application::error::{PlotError, RenderError};
use crate::application::normalizer::{normalize, TimestampUnit};
use crate::application::query_backend::QueryBackend;
use crate::application::range_executor::RangeQueryExecutor;
use crate::application::renderer::ChartRenderer;
use crate::domain::expression::classify;
use crate::domain::render::RenderRequest;
use crate::domain::series::{ColoredSeries, Style};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    pub style: Style,
    pub timestamp_unit: TimestampUnit,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            style: Style::Line,
            timestamp_unit: TimestampUnit::default(),
            show_x_axis: true,
            show_y_axis: true,
        }
    }
}

#[derive(Clone)]
pub struct PlotService {
    executor: RangeQueryExecutor,
    renderer: Arc<dyn ChartRenderer>,
    options: PlotOptions,
}

impl PlotService {
    pub fn new(
        backend: Arc<dyn QueryBackend>,
        renderer: Arc<dyn ChartRenderer>,
        options: PlotOptions,
    ) -> Self {
        Self {
            executor: RangeQueryExecutor::new(backend),
            renderer,
            options,
        }
    }

    /// Fetch, normalize and order every series for `expressions`.
    pub async fn build_request(
        &self,
        expressions: &[String],
        deadline: Instant,
    ) -> Result<RenderRequest, PlotError> {
        let classification = classify(expressions);

        let mut fetched = if classification.queries.is_empty() {
            Vec::new()
        } else {
            self.executor
                .spawn(&classification.queries, Utc::now(), deadline)
                .collect()
                .await?
        };
        // Results arrive in completion order; the first bad sample reported must not depend on it.
        fetched.sort_by_key(|result| result.index);

        let mut ranked = Vec::with_capacity(fetched.len());
        for result in fetched {
            let normalized = normalize(&result.raw, self.options.timestamp_unit)
                .map_err(|source| PlotError::Sample {
                    query: result.query.clone(),
                    source,
                })?;

            match normalized {
                Some(series) => {
                    tracing::debug!(
                        "Query {} normalized to {} points",
                        result.query,
                        series.len()
                    );
                    let colored = ColoredSeries::from_normalized(
                        result.query,
                        series,
                        result.color,
                        self.options.style,
                    );
                    ranked.push((result.index, colored));
                }
                None => tracing::debug!("Query {} returned no samples", result.query),
            }
        }

        if ranked.is_empty() {
            return Err(if classification.scalars.is_empty() {
                PlotError::NoSeries
            } else {
                PlotError::NoAnchor
            });
        }

        let mut series = order_by_color(ranked);
        broadcast_scalars(&mut series, &classification.scalars)?;

        tracing::debug!(
            "Built chart with {} series ({} reference lines)",
            series.len(),
            classification.scalars.len()
        );

        Ok(RenderRequest::new(
            series,
            self.options.show_x_axis,
            self.options.show_y_axis,
        ))
    }

    /// Build the chart for `expressions` and encode it.
    pub async fn plot(
        &self,
        expressions: &[String],
        deadline: Instant,
    ) -> Result<Vec<u8>, PlotError> {
        let request = self.build_request(expressions, deadline).await?;
        let renderer = self.renderer.clone();

        let image = tokio::task::spawn_blocking(move || renderer.render(&request))
            .await
            .map_err(|e| RenderError::Encode(e.to_string()))??;

        Ok(image)
    }
}

/// Compose `metric{source_id="<id>"}` from request parameters.
///
/// Exactly one `source_id` and one `metric` must be present.
pub fn compose_expression(params: &[(String, String)]) -> Result<String, PlotError> {
    let source_ids = param_values(params, "source_id");
    let [source_id] = source_ids.as_slice() else {
        return Err(PlotError::SourceId);
    };

    let metrics = param_values(params, "metric");
    let [metric] = metrics.as_slice() else {
        return Err(PlotError::Metric);
    };

    Ok(format!("{}{{source_id=\"{}\"}}", metric, source_id))
}

fn param_values<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}
