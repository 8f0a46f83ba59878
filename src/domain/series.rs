// Series domain models
use super::color::Color;
use super::query_result::Decimal;
use serde::Deserialize;

/// One backend sample, kept as the decimal text the backend sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(Decimal, Decimal)")]
pub struct RawSample {
    pub timestamp: String,
    pub value: String,
}

impl RawSample {
    pub fn new(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

impl From<(Decimal, Decimal)> for RawSample {
    fn from((timestamp, value): (Decimal, Decimal)) -> Self {
        Self::new(timestamp.into_text(), value.into_text())
    }
}

/// All samples returned for one query expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    pub samples: Vec<RawSample>,
}

impl RawSeries {
    pub fn new(samples: Vec<RawSample>) -> Self {
        Self { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Strictly increasing xs paired with ys. Only the normalizer builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl NormalizedSeries {
    pub(crate) fn from_parts(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(!xs.is_empty());
        Self { xs, ys }
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Line,
    Scatter,
}

impl Style {
    pub fn from_scatter_flag(scatter: bool) -> Self {
        if scatter { Style::Scatter } else { Style::Line }
    }
}

/// A render-ready series.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredSeries {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Color,
    pub style: Style,
}

impl ColoredSeries {
    pub fn from_normalized(
        label: String,
        series: NormalizedSeries,
        color: Color,
        style: Style,
    ) -> Self {
        Self {
            label,
            xs: series.xs,
            ys: series.ys,
            color,
            style,
        }
    }
}
