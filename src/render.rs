use crate::config::RenderConfig;
use crate::geometry::{Point, Rect};
use crate::request::RouteRequest;
use crate::routing::grid::Grid;
use crate::routing::{RouteKind, RouteOutcome};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// What a debug rendering shows: the request, its routed outcome and,
/// optionally, the grid the search ran on.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub request: &'a RouteRequest,
    pub outcome: &'a RouteOutcome,
    pub grid: Option<&'a Grid>,
}

impl<'a> Scene<'a> {
    pub fn new(request: &'a RouteRequest, outcome: &'a RouteOutcome) -> Self {
        Self {
            request,
            outcome,
            grid: None,
        }
    }

    pub fn with_grid(mut self, grid: &'a Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Bounding box of everything drawn, or `None` for an empty scene.
    fn content_bounds(&self) -> Option<Rect> {
        let mut points: Vec<Point> = Vec::new();
        points.push(self.request.start.point);
        points.push(self.request.end.point);
        points.extend(self.outcome.points.iter().copied());
        for rect in self.request.obstacles.iter().filter(|r| !r.is_empty()) {
            points.push(Point::new(rect.left(), rect.top()));
            points.push(Point::new(rect.right(), rect.bottom()));
        }
        if let Some(grid) = self.grid {
            for edge in grid.all_edges() {
                points.push(edge.from);
                points.push(edge.to);
            }
        }
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .map(|p| Rect::new(p.x, p.y, 0.0, 0.0))
            .reduce(|acc, r| acc.union(&r))
    }
}

pub fn render_svg(scene: &Scene<'_>, theme: &Theme, config: &RenderConfig) -> String {
    let bounds = scene.content_bounds().unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    let width = (bounds.width + config.padding * 2.0).max(config.width);
    let height = (bounds.height + config.padding * 2.0).max(config.height);
    let origin_x = bounds.x - (width - bounds.width) / 2.0;
    let origin_y = bounds.y - (height - bounds.height) / 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{origin_x:.2} {origin_y:.2} {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{origin_x:.2}\" y=\"{origin_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    for rect in scene.request.obstacles.iter().filter(|r| !r.is_empty()) {
        svg.push_str(&format!(
            "<rect class=\"obstacle\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            rect.x, rect.y, rect.width, rect.height, theme.obstacle_fill, theme.obstacle_stroke
        ));
    }

    if config.show_grid {
        if let Some(grid) = scene.grid {
            for edge in &grid.edges {
                svg.push_str(&line_svg("grid", edge.from, edge.to, &theme.grid_color, 0.5));
            }
            for stub in &grid.stubs {
                svg.push_str(&line_svg("stub", stub.from, stub.to, &theme.stub_color, 1.0));
            }
        }
    }

    let route_color = match scene.outcome.kind {
        RouteKind::Searched => &theme.route_color,
        RouteKind::Fallback(_) => &theme.fallback_color,
    };
    svg.push_str(&format!(
        "<path class=\"route\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"miter\"/>",
        points_to_path(&scene.outcome.points),
        route_color,
        theme.route_width
    ));

    for endpoint in [scene.request.start.point, scene.request.end.point] {
        svg.push_str(&format!(
            "<circle class=\"endpoint\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"{}\"/>",
            endpoint.x, endpoint.y, theme.endpoint_color
        ));
    }

    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        origin_x + 6.0,
        origin_y + theme.font_size + 4.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.endpoint_color,
        escape_xml(&caption(scene.outcome))
    ));

    svg.push_str("</svg>");
    svg
}

fn caption(outcome: &RouteOutcome) -> String {
    let kind = match outcome.kind {
        RouteKind::Searched => "searched".to_string(),
        RouteKind::Fallback(reason) => format!("fallback <{reason:?}>"),
    };
    format!(
        "{kind}: {} points, {} bends, length {:.1}",
        outcome.points.len(),
        outcome.bends(),
        outcome.length()
    )
}

fn line_svg(class: &str, a: Point, b: Point, color: &str, width: f32) -> String {
    format!(
        "<line class=\"{class}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
        a.x, a.y, b.x, b.y
    )
}

fn points_to_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (idx, point) in points.iter().enumerate() {
        let cmd = if idx == 0 { "M" } else { " L" };
        d.push_str(&format!("{cmd} {:.2} {:.2}", point.x, point.y));
    }
    d
}

/// Write text output (SVG or JSON) to `output`, or to stdout when absent.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
