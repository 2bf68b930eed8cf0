use thiserror::Error;

/// Error type for JWT operations.
///
/// `TokenExpired` is only reported for tokens whose signature checked out;
/// anything tampered, malformed or signed with another key is `InvalidToken`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}

impl JwtError {
    /// True when the token was authentic but past its expiry instant.
    pub fn is_expired(&self) -> bool {
        matches!(self, JwtError::TokenExpired)
    }
}
