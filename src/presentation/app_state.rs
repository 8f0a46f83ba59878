// Application state for HTTP handlers
use crate::application::plot_service::PlotService;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub plot_service: PlotService,
    /// Expressions bound on the command line; when empty each request names its own.
    pub expressions: Vec<String>,
    pub query_timeout: Duration,
}
