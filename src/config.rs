use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Distance an endpoint stub is pushed past the outermost grid line.
    pub clearance: f32,
    pub pixel_align: bool,
    /// Upper bound on nodes the search may expand before giving up.
    pub max_steps: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            clearance: 20.0,
            pixel_align: true,
            max_steps: 200_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Minimum canvas size; the scene grows it when it does not fit.
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub show_grid: bool,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            padding: 24.0,
            show_grid: false,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub router: RouterConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            router: RouterConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    obstacle_fill: Option<String>,
    obstacle_stroke: Option<String>,
    grid_color: Option<String>,
    stub_color: Option<String>,
    route_color: Option<String>,
    route_width: Option<f32>,
    endpoint_color: Option<String>,
    fallback_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouterConfigFile {
    clearance: Option<f32>,
    pixel_align: Option<bool>,
    max_steps: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    show_grid: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    router: Option<RouterConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Overlay a JSON config document on the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    match parsed.theme.as_deref() {
        Some("modern") | None => {}
        Some("classic") | Some("default") => config.theme = Theme::classic(),
        Some(other) => anyhow::bail!("unknown theme `{other}`"),
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.obstacle_fill {
            config.theme.obstacle_fill = v;
        }
        if let Some(v) = vars.obstacle_stroke {
            config.theme.obstacle_stroke = v;
        }
        if let Some(v) = vars.grid_color {
            config.theme.grid_color = v;
        }
        if let Some(v) = vars.stub_color {
            config.theme.stub_color = v;
        }
        if let Some(v) = vars.route_color {
            config.theme.route_color = v;
        }
        if let Some(v) = vars.route_width {
            config.theme.route_width = v;
        }
        if let Some(v) = vars.endpoint_color {
            config.theme.endpoint_color = v;
        }
        if let Some(v) = vars.fallback_color {
            config.theme.fallback_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(router) = parsed.router {
        if let Some(v) = router.clearance {
            anyhow::ensure!(v.is_finite() && v > 0.0, "router.clearance must be positive");
            config.router.clearance = v;
        }
        if let Some(v) = router.pixel_align {
            config.router.pixel_align = v;
        }
        if let Some(v) = router.max_steps {
            config.router.max_steps = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.show_grid {
            config.render.show_grid = v;
        }
    }

    Ok(config)
}
