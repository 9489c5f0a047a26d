use serde::{Deserialize, Serialize};

/// Colors and stroke widths for the debug rendering of a routed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub obstacle_fill: String,
    pub obstacle_stroke: String,
    pub grid_color: String,
    pub stub_color: String,
    pub route_color: String,
    pub route_width: f32,
    pub endpoint_color: String,
    pub fallback_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 12.0,
            obstacle_fill: "#ECECFF".to_string(),
            obstacle_stroke: "#9370DB".to_string(),
            grid_color: "#D0D0D0".to_string(),
            stub_color: "#AAAA33".to_string(),
            route_color: "#333333".to_string(),
            route_width: 2.0,
            endpoint_color: "#333333".to_string(),
            fallback_color: "#CC3333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            obstacle_fill: "#F8FAFF".to_string(),
            obstacle_stroke: "#C7D2E5".to_string(),
            grid_color: "#E6EBF3".to_string(),
            stub_color: "#9DB2D6".to_string(),
            route_color: "#3B5B92".to_string(),
            route_width: 1.5,
            endpoint_color: "#1C2430".to_string(),
            fallback_color: "#D0576B".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
