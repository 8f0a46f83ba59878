// Renderer trait for turning a finished series set into an image
use crate::application::error::RenderError;
use crate::domain::render::RenderRequest;

pub trait ChartRenderer: Send + Sync {
    /// Encode the chart, returning the image bytes.
    fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError>;
}
