use thiserror::Error;

/// Everything that can go wrong between a request and the history buffer.
///
/// The first four variants are client-input errors; `Empty` is a benign
/// not-yet-available condition, not a fault.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),

    #[error("invalid machineState: {0:?}")]
    InvalidState(String),

    #[error("field {0} must be a number")]
    InvalidType(&'static str),

    #[error("invalid limit parameter")]
    InvalidLimit,

    #[error("no telemetry data available")]
    Empty,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
