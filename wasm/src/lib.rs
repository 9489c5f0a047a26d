use ortho_router::{RouteRequest, Router, RouterConfig};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteOptions {
    clearance: Option<f32>,
    pixel_align: Option<bool>,
    max_steps: Option<usize>,
    detailed: Option<bool>,
}

fn build_router(options: &RouteOptions) -> Router {
    let mut config = RouterConfig::default();
    if let Some(clearance) = options.clearance.filter(|c| c.is_finite() && *c > 0.0) {
        config.clearance = clearance;
    }
    if let Some(pixel_align) = options.pixel_align {
        config.pixel_align = pixel_align;
    }
    if let Some(max_steps) = options.max_steps {
        config.max_steps = max_steps;
    }
    Router::new(config)
}

fn route_json(request_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<RouteOptions>(raw).map_err(|error| error.to_string())?,
        None => RouteOptions::default(),
    };
    let request: RouteRequest = serde_json::from_str(request_json).map_err(|error| error.to_string())?;
    request.validate().map_err(|error| error.to_string())?;

    let outcome = build_router(&options).route_detailed(&request);
    let json = if options.detailed.unwrap_or(false) {
        serde_json::to_string(&outcome)
    } else {
        serde_json::to_string(&outcome.points)
    };
    json.map_err(|error| error.to_string())
}

/// Route one connector. Returns the point list as JSON, or the full outcome
/// when `detailed` is set in the options.
#[wasm_bindgen]
pub fn route_connector(request_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    route_json(request_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
