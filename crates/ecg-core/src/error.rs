use thiserror::Error;

/// Errors surfaced by the engine to its callers.
///
/// Only caller bugs are errors. Generation problems (guardrail violations,
/// empty schedules) are logged and stabilized instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown lead \"{0}\"")]
    UnknownLead(String),
    #[error("unknown rhythm \"{0}\"")]
    UnknownRhythm(String),
    #[error("heart rate must be a finite number of beats per minute, got {0}")]
    InvalidHeartRate(f64),
}
