// Render request handed to the chart renderer
use super::series::ColoredSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisStyle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub series: Vec<ColoredSeries>,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
}

impl RenderRequest {
    pub fn new(series: Vec<ColoredSeries>, show_x_axis: bool, show_y_axis: bool) -> Self {
        Self {
            series,
            x_axis: AxisStyle { show: show_x_axis },
            y_axis: AxisStyle { show: show_y_axis },
        }
    }
}
