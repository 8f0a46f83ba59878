use crate::application::normalizer::TimestampUnit;
use crate::application::plot_service::PlotOptions;
use crate::domain::series::Style;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub plot: PlotSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub address: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    pub timestamp_unit: TimestampUnit,
    pub query_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlotSettings {
    pub scatter: bool,
    pub width: u32,
    pub height: u32,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
}

impl AppConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.query_timeout_secs)
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            style: Style::from_scatter_flag(self.plot.scatter),
            timestamp_unit: self.backend.timestamp_unit,
            show_x_axis: self.plot.show_x_axis,
            show_y_axis: self.plot.show_y_axis,
        }
    }
}

/// Load configuration from defaults, the optional file at `path` and the process environment.
pub fn load_app_config(path: &str) -> anyhow::Result<AppConfig> {
    build_app_config(path, std::env::vars().collect())
}

fn build_app_config(path: &str, env: HashMap<String, String>) -> anyhow::Result<AppConfig> {
    // Bare PORT and SCATTER_PLOT are kept for platforms that inject them.
    let port = env.get("PORT").cloned();
    let scatter = env.get("SCATTER_PLOT").cloned();

    let settings = config::Config::builder()
        .set_default("server.port", 8080)?
        .set_default("backend.timestamp_unit", "seconds")?
        .set_default("backend.query_timeout_secs", 30)?
        .set_default("plot.scatter", false)?
        .set_default("plot.width", 1024)?
        .set_default("plot.height", 400)?
        .set_default("plot.show_x_axis", true)?
        .set_default("plot.show_y_axis", true)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("PLOTTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        )
        .set_override_option("server.port", port)?
        .set_override_option("plot.scatter", scatter)?
        .build()?;

    let mut cfg: AppConfig = settings.try_deserialize()?;
    cfg.backend.address = cfg.backend.address.trim_end_matches('/').to_string();
    if cfg.backend.address.is_empty() {
        anyhow::bail!("backend.address must not be empty");
    }

    Ok(cfg)
}
