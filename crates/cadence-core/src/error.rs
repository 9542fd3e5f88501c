//! Core error types for Cadence.

/// A specialized Result type for Cadence operations.
pub type CadenceResult<T> = Result<T, CadenceError>;

/// Top-level error type encompassing all Cadence subsystems.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    /// A caller broke an operation's contract: unknown target, unknown effect,
    /// malformed step, non-finite play duration.
    #[error("contract violation: {0}")]
    Contract(String),

    /// The animation engine reported a failure while preparing an effect.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl CadenceError {
    /// Create a contract violation.
    pub fn contract(message: impl Into<String>) -> Self {
        CadenceError::Contract(message.into())
    }

    /// Create an engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        CadenceError::Engine(message.into())
    }

    /// True for programmer errors as opposed to runtime failures.
    pub fn is_contract(&self) -> bool {
        matches!(self, CadenceError::Contract(_))
    }
}
