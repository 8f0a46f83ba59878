// Series normalization - raw samples into a strictly increasing axis
use crate::application::error::SampleError;
use crate::domain::series::{NormalizedSeries, RawSeries};
use serde::Deserialize;

/// Amount, in milliseconds, added to an x that does not exceed its predecessor.
pub const NUDGE_MS: f64 = 50.0;

/// Unit the backend reports sample timestamps in. Normalized xs are always milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl TimestampUnit {
    fn millis_per_unit(self) -> f64 {
        match self {
            TimestampUnit::Seconds => 1000.0,
            TimestampUnit::Milliseconds => 1.0,
        }
    }
}

/// Parse, sort and de-collide one raw series.
///
/// Returns `Ok(None)` when the backend produced no samples for the query.
pub fn normalize(
    raw: &RawSeries,
    unit: TimestampUnit,
) -> Result<Option<NormalizedSeries>, SampleError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let scale = unit.millis_per_unit();
    let mut points = Vec::with_capacity(raw.samples.len());

    for (index, sample) in raw.samples.iter().enumerate() {
        // Scaling can overflow a finite timestamp, so check the result.
        let x = parse_number(index, "timestamp", &sample.timestamp)? * scale;
        if !x.is_finite() {
            return Err(SampleError {
                index,
                field: "timestamp",
                text: sample.timestamp.clone(),
            });
        }
        let y = parse_number(index, "value", &sample.value)?;
        points.push((x, y));
    }

    // Stable: samples sharing a timestamp keep their backend order.
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (mut xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
    enforce_strictly_increasing(&mut xs);

    Ok(Some(NormalizedSeries::from_parts(xs, ys)))
}

/// Push every x that does not exceed its predecessor forward in `NUDGE_MS` steps.
///
/// Leaves an already strictly increasing slice untouched.
pub fn enforce_strictly_increasing(xs: &mut [f64]) {
    for i in 1..xs.len() {
        let prev = xs[i - 1];
        if xs[i] > prev {
            continue;
        }

        let steps = ((prev - xs[i]) / NUDGE_MS).floor() + 1.0;
        xs[i] += steps * NUDGE_MS;

        if xs[i] <= prev {
            // Magnitudes where a nudge is below float resolution.
            xs[i] = prev + (prev.abs() * f64::EPSILON).max(NUDGE_MS);
        }
    }
}

fn parse_number(index: usize, field: &'static str, text: &str) -> Result<f64, SampleError> {
    text.trim().parse::<f64>().map_err(|_| SampleError {
        index,
        field,
        text: text.to_string(),
    })
}
