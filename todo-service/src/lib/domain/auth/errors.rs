use auth::AuthenticationError;
use auth::JwtError;
use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Failure reported by an email sender.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Email delivery failed: {0}")]
pub struct EmailSendError(pub String);

/// Failure reported by an external identity provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider refused the presented access token.
    #[error("Provider rejected the access token: {0}")]
    Rejected(String),

    /// The provider answered but disclosed no email address.
    #[error("Provider did not disclose an email address")]
    MissingEmail,

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors of the authentication and authorization flows.
///
/// Display strings are the messages shown to API clients.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token expired")]
    TokenExpired,

    /// Token forged, malformed, or carrying a subject of the wrong shape.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Token subject no longer names a stored user.
    #[error("User not found")]
    UserNotFound,

    /// Purpose token (verification, reset) or recovery request names an
    /// email with no account.
    #[error("No user registered with that email")]
    EmailNotRegistered,

    #[error("Inactive user")]
    InactiveUser,

    /// Unknown email and wrong password share this error.
    #[error("Incorrect email or password")]
    IncorrectLogin,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Sending emails not supported")]
    EmailsDisabled,

    #[error("The user doesn't have enough privileges")]
    InsufficientPrivileges,

    #[error("Identity provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("User store error: {0}")]
    Store(UserError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            e if e.is_expired() => AuthError::TokenExpired,
            JwtError::EncodingFailed(reason) => AuthError::Internal(reason),
            _ => AuthError::InvalidCredentials,
        }
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::IncorrectLogin,
            AuthenticationError::PasswordError(e) => e.into(),
            AuthenticationError::JwtError(e) => e.into(),
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => AuthError::EmailAlreadyRegistered,
            other => AuthError::Store(other),
        }
    }
}
