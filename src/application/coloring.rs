// Canonical series ordering by palette rank
use crate::domain::color::color_rank;
use crate::domain::series::ColoredSeries;

/// Order series by palette rank, falling back to submission index when the
/// palette wraps. The result never depends on fetch completion order.
pub fn order_by_color(mut ranked: Vec<(usize, ColoredSeries)>) -> Vec<ColoredSeries> {
    ranked.sort_by_key(|(index, series)| (color_rank(series.color), *index));
    ranked.into_iter().map(|(_, series)| series).collect()
}
