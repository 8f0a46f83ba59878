// Scalar reference lines over the x-domain of the real series
use crate::application::error::PlotError;
use crate::domain::expression::Slot;
use crate::domain::series::{ColoredSeries, Style};

/// Append one flat series per scalar, borrowing the xs of the first series.
pub fn broadcast_scalars(
    series: &mut Vec<ColoredSeries>,
    scalars: &[Slot<f64>],
) -> Result<(), PlotError> {
    if scalars.is_empty() {
        return Ok(());
    }

    let anchor = series.first().ok_or(PlotError::NoAnchor)?.xs.clone();

    for scalar in scalars {
        series.push(ColoredSeries {
            label: scalar.item.to_string(),
            ys: vec![scalar.item; anchor.len()],
            xs: anchor.clone(),
            color: scalar.color,
            style: Style::Line,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::Color;

    fn real(xs: Vec<f64>, color: Color) -> ColoredSeries {
        ColoredSeries {
            label: "cpu".to_string(),
            ys: vec![1.0; xs.len()],
            xs,
            color,
            style: Style::Scatter,
        }
    }

    #[test]
    fn test_scalars_follow_first_series_domain() {
        let mut series = vec![
            real(vec![0.0, 1000.0, 1050.0], Color::Blue),
            real(vec![5.0, 6.0], Color::Green),
        ];
        let scalars = vec![
            Slot { index: 1, color: Color::Red, item: 2.5 },
            Slot { index: 3, color: Color::Orange, item: -1.0 },
        ];

        broadcast_scalars(&mut series, &scalars).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series[2].xs, vec![0.0, 1000.0, 1050.0]);
        assert_eq!(series[2].ys, vec![2.5, 2.5, 2.5]);
        assert_eq!(series[2].color, Color::Red);
        assert_eq!(series[2].style, Style::Line);
        assert_eq!(series[3].ys, vec![-1.0, -1.0, -1.0]);
        assert_eq!(series[3].color, Color::Orange);
    }

    #[test]
    fn test_scalars_without_real_series_fail() {
        let mut series = Vec::new();
        let scalars = vec![Slot { index: 0, color: Color::Blue, item: 1.0 }];

        let err = broadcast_scalars(&mut series, &scalars).unwrap_err();
        assert!(matches!(err, PlotError::NoAnchor));
        assert!(err.to_string().contains("no series to anchor to"));
    }

    #[test]
    fn test_no_scalars_is_a_no_op() {
        let mut series = vec![real(vec![1.0], Color::Blue)];
        broadcast_scalars(&mut series, &[]).unwrap();
        assert_eq!(series.len(), 1);
    }
}
