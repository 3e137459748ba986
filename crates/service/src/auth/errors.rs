use thiserror::Error;

/// Failures of the token gate and the ownership rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token identity does not match the requested scope")]
    Mismatch,
    #[error("token error: {0}")]
    Token(String),
    #[error("auth misconfigured: {0}")]
    Config(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Missing => 1001,
            AuthError::Invalid(_) => 1002,
            AuthError::Mismatch => 1003,
            AuthError::Token(_) => 1101,
            AuthError::Config(_) => 1102,
        }
    }
}
