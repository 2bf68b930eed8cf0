use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::EmailSendError;
use crate::domain::auth::errors::ProviderError;
use crate::domain::auth::models::ProviderIdentity;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;

/// Port for the authentication flows used by handlers.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Resolve a bearer token to its user, without the active check.
    ///
    /// # Errors
    /// * `TokenExpired` / `InvalidCredentials` - Token rejected
    /// * `UserNotFound` - Subject no longer exists
    async fn resolve_identity(&self, token: &str) -> Result<User, AuthError>;

    /// Verify a password login and mint an access + refresh pair.
    ///
    /// # Errors
    /// * `IncorrectLogin` - Unknown email or wrong password
    /// * `InactiveUser` - Credentials match a deactivated account
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - `grant_type` is not `refresh_token`
    /// * `TokenExpired` / `InvalidCredentials` - Token rejected
    /// * `UserNotFound` - Subject no longer exists
    async fn refresh(&self, grant_type: &str, token: &str) -> Result<String, AuthError>;

    /// Self-register a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is taken
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    fn mint_verification_token(&self, email: &EmailAddress) -> Result<String, AuthError>;

    fn mint_reset_token(&self, email: &EmailAddress) -> Result<String, AuthError>;

    /// Mark the account named by a verification token as verified.
    ///
    /// # Errors
    /// * `TokenExpired` / `InvalidCredentials` - Token rejected
    /// * `EmailNotRegistered` - Token names no account
    async fn complete_verification(&self, token: &str) -> Result<User, AuthError>;

    /// Mail a password-reset link.
    ///
    /// # Errors
    /// * `EmailsDisabled` - Outgoing mail is switched off
    /// * `EmailNotRegistered` - No account for that email
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Set a new password for the account named by a reset token.
    ///
    /// # Errors
    /// * `TokenExpired` / `InvalidCredentials` - Token rejected
    /// * `EmailNotRegistered` - Token names no account
    async fn complete_reset(&self, token: &str, new_password: &str) -> Result<(), AuthError>;

    /// Log in an existing active user vouched for by the identity provider.
    async fn login_with_provider(&self, provider_token: &str) -> Result<TokenPair, AuthError>;

    /// Create a verified account for an identity the provider vouches for.
    async fn register_with_provider(&self, provider_token: &str) -> Result<User, AuthError>;
}

/// Outgoing mail.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send(&self, to: &EmailAddress, subject: &str, body: &str)
        -> Result<(), EmailSendError>;
}

/// External identity provider (OAuth userinfo).
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Exchange a provider access token for the identity it belongs to.
    ///
    /// # Errors
    /// * `Rejected` - Provider refused the token
    /// * `MissingEmail` - Provider disclosed no email
    /// * `Unavailable` - Provider could not be reached
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError>;
}
