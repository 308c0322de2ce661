use serde_json::Value;
use thiserror::Error;

/// A filter specification had a shape the normalizer cannot interpret.
///
/// Carries the offending value so the caller can see exactly what was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid filter spec: {value}")]
pub struct InvalidFilterSpecError {
    pub value: Value,
}

impl InvalidFilterSpecError {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

/// Error type used by the bundled [`ScopeChain`](crate::chain::ScopeChain) query and by
/// configuration loading.
///
/// Callers with their own query types are free to use their own error type, as long as it
/// converts from [`InvalidFilterSpecError`].
#[derive(Debug, Error)]
pub enum SiftError {
    /// The raw filter spec could not be normalized.
    #[error(transparent)]
    InvalidFilterSpec(#[from] InvalidFilterSpecError),

    /// A scope was invoked with the wrong number of arguments.
    #[error("scope '{scope}' expects {expected} argument(s), got {actual}")]
    ScopeArity { scope: String, expected: usize, actual: usize },

    /// No query type with this name is configured.
    #[error("unknown query type: {name}")]
    UnknownQueryType { name: String },

    /// Configuration file could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },
}

impl SiftError {
    /// Convenience helper for configuration failures.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type SiftResult<T> = Result<T, SiftError>;
