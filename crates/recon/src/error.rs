use thiserror::Error;

/// Errors raised while building a [`crate::ReconConfig`].
///
/// Reconciliation itself is infallible; only configuration can be rejected.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (threshold out of range, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}
