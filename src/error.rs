use thiserror::Error;

/// Errors surfaced to a caller of [`crate::service::optimize`] /
/// [`crate::service::reoptimize`]. Only [`OptimizerError::Validation`] is
/// ever returned from those functions; the other variants exist so every
/// failure mode in the system shares one taxonomy for logging, even though
/// most are absorbed before they'd reach an `Err`.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("numeric error: {0}")]
    Numeric(#[from] NumericError),

    /// Not an error condition — the iteration budget was reached. Carried
    /// in the taxonomy purely so `tracing` call sites can log one enum
    /// instead of branching on a bool.
    #[error("budget exhausted after {iterations} iterations")]
    BudgetExhausted { iterations: usize },
}

/// Caller-facing input problems. Never retried.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("route needs at least 2 stops, got {0}")]
    TooFewStops(usize),

    #[error("stop {index} has window_start {start} after window_end {end}")]
    InvertedWindow { index: usize, start: i64, end: i64 },

    #[error("stop {index} has window endpoint {minute} outside [0, 1440)")]
    WindowOutOfRange { index: usize, minute: i64 },

    #[error("unknown vehicle class {0:?}")]
    UnknownVehicle(String),

    #[error("unknown traffic level {0:?}")]
    UnknownTrafficLevel(String),

    #[error("unknown incident kind {0:?}")]
    UnknownIncidentKind(String),

    #[error("incident index {index} out of range for {len} stops")]
    IncidentOutOfRange { index: usize, len: usize },
}

/// Failures from the live-traffic provider. Swallowed with a log line by
/// the service layer; never fatal to `reoptimize`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A non-finite value surfaced where only finite values are meaningful.
/// Per the cost function's NaN/Inf guard, a candidate producing this is
/// rejected (treated as `+INFINITY`) rather than propagated.
#[derive(Debug, Error, PartialEq)]
pub enum NumericError {
    #[error("non-finite cost produced for candidate route")]
    NonFiniteCost,
}
