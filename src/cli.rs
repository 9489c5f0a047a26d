use crate::config::{Config, load_config};
use crate::render::{Scene, render_svg, write_output};
use crate::request::RouteRequest;
use crate::routing::{RouteOutcome, Router};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orthr", version, about = "Orthogonal connector router")]
pub struct Args {
    /// Request file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, router and render settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Draw the routing grid in SVG/PNG output
    #[arg(long = "grid")]
    pub grid: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if args.grid {
        config.render.show_grid = true;
    }

    let input = read_input(args.input.as_deref())?;
    let request = parse_request(&input)?;
    let router = Router::new(config.router.clone());
    let outcome = router.route_detailed(&request);
    log::info!(
        "routed {} points ({:?}, {} expanded)",
        outcome.points.len(),
        outcome.kind,
        outcome.expanded
    );

    match args.output_format {
        OutputFormat::Json => {
            let json = outcome_json(&outcome)?;
            write_output(&json, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let svg = debug_svg(&router, &request, &outcome, &config);
            write_output(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = debug_svg(&router, &request, &outcome, &config);
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn parse_request(input: &str) -> Result<RouteRequest> {
    let request: RouteRequest = serde_json::from_str(input).context("invalid request JSON")?;
    request.validate()?;
    Ok(request)
}

fn outcome_json(outcome: &RouteOutcome) -> Result<String> {
    let mut json = serde_json::to_string_pretty(outcome)?;
    json.push('\n');
    Ok(json)
}

fn debug_svg(router: &Router, request: &RouteRequest, outcome: &RouteOutcome, config: &Config) -> String {
    let grid = config.render.show_grid.then(|| router.grid(request));
    let mut scene = Scene::new(request, outcome);
    if let Some(grid) = grid.as_ref() {
        scene = scene.with_grid(grid);
    }
    render_svg(&scene, &config.theme, &config.render)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Direction, Point};

    #[test]
    fn parses_requests_with_optional_fields() {
        let request = parse_request(
            r#"{
                "start": { "point": { "x": 0, "y": 50 }, "direction": "east" },
                "end": { "point": { "x": 200, "y": 50 } }
            }"#,
        )
        .unwrap();
        assert_eq!(request.start.direction, Direction::East);
        assert_eq!(request.end.direction, Direction::None);
        assert!(request.obstacles.is_empty());
        assert_eq!(request.end.point, Point::new(200.0, 50.0));
    }

    #[test]
    fn rejects_malformed_requests() {
        assert!(parse_request("{}").is_err());
        assert!(parse_request(r#"{ "start": { "point": { "x": 0, "y": 0 }, "direction": "up" }, "end": { "point": { "x": 1, "y": 1 } } }"#).is_err());
    }

    #[test]
    fn json_output_lists_points_and_kind() {
        let request = parse_request(
            r#"{
                "start": { "point": { "x": 0, "y": 0 } },
                "end": { "point": { "x": 100, "y": 0 } }
            }"#,
        )
        .unwrap();
        let outcome = Router::default().route_detailed(&request);
        let json: serde_json::Value = serde_json::from_str(&outcome_json(&outcome).unwrap()).unwrap();
        assert_eq!(json["points"][1]["x"], 100.0);
        assert_eq!(json["kind"]["reason"], "noObstacles");
    }

    #[test]
    fn svg_includes_grid_when_requested() {
        let request = parse_request(
            r#"{
                "start": { "point": { "x": 0, "y": 50 } },
                "end": { "point": { "x": 200, "y": 50 } },
                "obstacles": [{ "x": 80, "y": 20, "width": 40, "height": 60 }]
            }"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.render.show_grid = true;
        let router = Router::new(config.router.clone());
        let outcome = router.route_detailed(&request);
        let svg = debug_svg(&router, &request, &outcome, &config);
        assert!(svg.contains("class=\"grid\""));
    }

    #[test]
    fn png_output_needs_a_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
