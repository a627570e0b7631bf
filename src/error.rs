use thiserror::Error;

/// Errors raised at the configuration and registration edges.
///
/// The reporting loop itself never returns one of these: once it is
/// running, failures are contained to a single line or instrument.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reporting interval must be greater than zero")]
    ZeroInterval,

    #[error("metric {0:?} is already registered")]
    DuplicateMetric(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
