//! Orthogonal obstacle-avoiding connector routing.
//!
//! ```
//! use ortho_router::{Direction, Endpoint, Point, Rect, RouteRequest, route};
//!
//! let request = RouteRequest::new(
//!     Endpoint::new(Point::new(0.0, 50.0), Direction::East),
//!     Endpoint::free(Point::new(200.0, 50.0)),
//!     vec![Rect::new(80.0, 20.0, 40.0, 60.0)],
//! );
//! let points = route(&request);
//! assert_eq!(points.first(), Some(&Point::new(0.0, 50.0)));
//! assert_eq!(points.last(), Some(&Point::new(200.0, 50.0)));
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod render;
pub mod request;
pub mod routing;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, RouterConfig, load_config};
pub use connector::Connector;
pub use error::{Result, RouteError};
pub use geometry::{Direction, Point, Rect, find_obstacle_exit};
pub use request::{Endpoint, ObstacleLookup, RouteRequest, exit_direction};
pub use routing::{FallbackReason, RouteKind, RouteOutcome, Router, route};
pub use theme::Theme;
