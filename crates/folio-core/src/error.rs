use thiserror::Error;

/// Why a catalog store stopped using its embedding backend.
///
/// These never reach callers as failures: the store records the reason,
/// logs it, and answers queries through the fallback scorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("no embedding backend configured")]
    Unavailable,

    #[error("embedding backend failed to initialize: {0}")]
    Init(String),

    #[error("embedding request failed: {0}")]
    Embed(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
