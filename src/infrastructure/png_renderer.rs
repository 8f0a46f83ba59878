// PNG chart renderer built on tiny-skia
use crate::application::error::RenderError;
use crate::application::renderer::ChartRenderer;
use crate::domain::render::RenderRequest;
use crate::domain::series::{ColoredSeries, Style};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

const MIN_SIZE: u32 = 64;
const AXIS_MARGIN: u32 = 30;
const EDGE_MARGIN: u32 = 10;
const FILL_ALPHA: u8 = 100;
const LINE_WIDTH: f32 = 2.0;
const DOT_WIDTH: f32 = 5.0;
const AXIS_COLOR: [u8; 3] = [80, 80, 80];

#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    width: u32,
    height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_SIZE),
            height: height.max(MIN_SIZE),
        }
    }
}

/// Data extent across every finite point.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of(series: &[ColoredSeries]) -> Option<Self> {
        let points = series
            .iter()
            .flat_map(|s| s.xs.iter().zip(s.ys.iter()))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut bounds: Option<Bounds> = None;
        for (&x, &y) in points {
            let b = bounds.get_or_insert(Bounds {
                x_min: x,
                x_max: x,
                y_min: y,
                y_max: y,
            });
            b.x_min = b.x_min.min(x);
            b.x_max = b.x_max.max(x);
            b.y_min = b.y_min.min(y);
            b.y_max = b.y_max.max(y);
        }

        bounds.map(|mut b| {
            if b.x_max <= b.x_min {
                b.x_min -= 1.0;
                b.x_max += 1.0;
            }
            if b.y_max <= b.y_min {
                let pad = (b.y_min.abs() * 0.1).max(1.0);
                b.y_min -= pad;
                b.y_max += pad;
            }
            b
        })
    }
}

/// Pixel rectangle the data is mapped into.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            left: AXIS_MARGIN as f64,
            top: EDGE_MARGIN as f64,
            right: (width - EDGE_MARGIN) as f64,
            bottom: (height - AXIS_MARGIN) as f64,
        }
    }

    fn project(&self, bounds: &Bounds, x: f64, y: f64) -> (f64, f64) {
        let fx = (x - bounds.x_min) / (bounds.x_max - bounds.x_min);
        let fy = (y - bounds.y_min) / (bounds.y_max - bounds.y_min);
        let px = self.left + fx * (self.right - self.left);
        let py = self.bottom - fy * (self.bottom - self.top);
        (px, py)
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let bounds = Bounds::of(&request.series).ok_or(RenderError::Empty)?;
        let area = PlotArea::for_canvas(self.width, self.height);
        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RenderError::Encode("pixmap allocation failed".to_string()))?;
        pixmap.fill(Color::WHITE);

        // Request order is layering order: later series paint over earlier ones.
        for series in &request.series {
            let points: Vec<(f32, f32)> = series
                .xs
                .iter()
                .zip(series.ys.iter())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(&x, &y)| {
                    let (px, py) = area.project(&bounds, x, y);
                    (px as f32, py as f32)
                })
                .collect();
            let [r, g, b] = series.color.rgb();

            match series.style {
                Style::Line => {
                    if let Some(area_path) = area_under(&points, area.bottom as f32) {
                        pixmap.fill_path(
                            &area_path,
                            &paint(r, g, b, FILL_ALPHA),
                            FillRule::Winding,
                            Transform::default(),
                            None,
                        );
                    }
                    match points.as_slice() {
                        [single] => fill_dot(&mut pixmap, *single, [r, g, b]),
                        _ => {
                            if let Some(line) = polyline(&points) {
                                stroke(&mut pixmap, &line, [r, g, b], LINE_WIDTH);
                            }
                        }
                    }
                }
                Style::Scatter => {
                    for point in &points {
                        fill_dot(&mut pixmap, *point, [r, g, b]);
                    }
                }
            }
        }

        // Centre 1px axis strokes on a pixel row/column so they stay solid.
        let (left, top) = (area.left as f32 + 0.5, area.top as f32);
        let (right, bottom) = (area.right as f32, area.bottom as f32 + 0.5);
        if request.x_axis.show {
            if let Some(axis) = polyline(&[(left, bottom), (right, bottom)]) {
                stroke(&mut pixmap, &axis, AXIS_COLOR, 1.0);
            }
        }
        if request.y_axis.show {
            if let Some(axis) = polyline(&[(left, top), (left, bottom)]) {
                stroke(&mut pixmap, &axis, AXIS_COLOR, 1.0);
            }
        }

        let bytes = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        tracing::debug!(
            "Rendered {} series into {} PNG bytes",
            request.series.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn paint(r: u8, g: u8, b: u8, a: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint
}

fn polyline(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.finish()
}

/// Closed region between the polyline and the bottom of the plot area.
fn area_under(points: &[(f32, f32)], bottom: f32) -> Option<Path> {
    let (first, last) = (points.first()?, points.last()?);
    if points.len() < 2 {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.0, bottom);
    for (x, y) in points {
        pb.line_to(*x, *y);
    }
    pb.line_to(last.0, bottom);
    pb.close();
    pb.finish()
}

fn stroke(pixmap: &mut Pixmap, path: &Path, [r, g, b]: [u8; 3], width: f32) {
    pixmap.stroke_path(
        path,
        &paint(r, g, b, 255),
        &Stroke {
            width,
            ..Default::default()
        },
        Transform::default(),
        None,
    );
}

fn fill_dot(pixmap: &mut Pixmap, (x, y): (f32, f32), [r, g, b]: [u8; 3]) {
    if let Some(dot) = PathBuilder::from_circle(x, y, DOT_WIDTH / 2.0) {
        pixmap.fill_path(
            &dot,
            &paint(r, g, b, 255),
            FillRule::Winding,
            Transform::default(),
            None,
        );
    }
}
