use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("direction must be one of north, east, south or west")]
    InvalidDirection,

    #[error("handle index {index} out of range (connector has {count} handles)")]
    HandleOutOfRange { index: usize, count: usize },

    #[error("invalid routing request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;
