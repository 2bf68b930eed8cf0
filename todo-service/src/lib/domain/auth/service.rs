use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use auth::TokenPair;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::ProviderError;
use crate::domain::auth::identity;
use crate::domain::auth::models::AuthSettings;
use crate::domain::auth::models::ProviderIdentity;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::EmailSender;
use crate::domain::auth::ports::IdentityProvider;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;

const REFRESH_GRANT_TYPE: &str = "refresh_token";
const PROVIDER_PASSWORD_LENGTH: usize = 20;

/// Orchestrates login, refresh, registration, verification, password reset
/// and identity-provider flows on top of the user store.
pub struct AuthService<UR, ES, IP>
where
    UR: UserRepository,
    ES: EmailSender,
    IP: IdentityProvider,
{
    repository: Arc<UR>,
    email_sender: Arc<ES>,
    identity_provider: Arc<IP>,
    authenticator: Arc<Authenticator>,
    settings: AuthSettings,
}

impl<UR, ES, IP> AuthService<UR, ES, IP>
where
    UR: UserRepository,
    ES: EmailSender,
    IP: IdentityProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `email_sender` - Outgoing mail implementation
    /// * `identity_provider` - OAuth userinfo implementation
    /// * `authenticator` - Password hashing and token minting
    /// * `settings` - Email switches and link prefix
    pub fn new(
        repository: Arc<UR>,
        email_sender: Arc<ES>,
        identity_provider: Arc<IP>,
        authenticator: Arc<Authenticator>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            repository,
            email_sender,
            identity_provider,
            authenticator,
            settings,
        }
    }

    /// Account named by the email subject of a purpose token.
    async fn user_from_email_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Purpose token rejected");
            AuthError::from(e)
        })?;

        self.repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::EmailNotRegistered)
    }

    async fn provider_identity(&self, provider_token: &str) -> Result<ProviderIdentity, AuthError> {
        self.identity_provider
            .fetch_identity(provider_token)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity provider rejected login");
                AuthError::from(e)
            })
    }

    /// Mail delivery is fire-and-forget: failures are logged, never returned.
    async fn send_email(&self, to: &EmailAddress, subject: &str, body: &str) {
        if let Err(e) = self.email_sender.send(to, subject, body).await {
            tracing::error!(email = %to, error = %e, "Failed to send email");
        }
    }

    async fn send_verification_email(&self, user: &User) {
        let token = match self.mint_verification_token(&user.email) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to mint verification token");
                return;
            }
        };

        let subject = format!("Verify your account {}", user.email);
        let body = format!(
            "Follow this link to verify your account: {}",
            self.settings.verification_link(&token)
        );
        self.send_email(&user.email, &subject, &body).await;
    }

    fn random_password() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(PROVIDER_PASSWORD_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl<UR, ES, IP> AuthServicePort for AuthService<UR, ES, IP>
where
    UR: UserRepository,
    ES: EmailSender,
    IP: IdentityProvider,
{
    async fn resolve_identity(&self, token: &str) -> Result<User, AuthError> {
        identity::resolve(&self.authenticator, self.repository.as_ref(), token).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::warn!(email = %email, "Login rejected");
            return Err(AuthError::IncorrectLogin);
        };

        let pair = self
            .authenticator
            .authenticate(password, &user.password_hash, &user.id.to_string())
            .map_err(|e| {
                tracing::warn!(email = %email, error = %e, "Login rejected");
                AuthError::from(e)
            })?;

        // Password before the active flag.
        let user = identity::require_active(user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(pair)
    }

    async fn refresh(&self, grant_type: &str, token: &str) -> Result<String, AuthError> {
        if grant_type != REFRESH_GRANT_TYPE {
            tracing::warn!(grant_type = %grant_type, "Unsupported refresh grant type");
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self.resolve_identity(token).await?;

        Ok(self
            .authenticator
            .issue(TokenKind::Access, &user.id.to_string())?)
    }

    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;
        let user = User::new(
            command.email,
            command.full_name,
            password_hash,
            !self.settings.verification_required,
        );

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, email = %created.email, "User registered");

        if self.settings.verification_required {
            self.send_verification_email(&created).await;
        }

        Ok(created)
    }

    fn mint_verification_token(&self, email: &EmailAddress) -> Result<String, AuthError> {
        Ok(self
            .authenticator
            .issue(TokenKind::EmailVerification, email.as_str())?)
    }

    fn mint_reset_token(&self, email: &EmailAddress) -> Result<String, AuthError> {
        Ok(self
            .authenticator
            .issue(TokenKind::PasswordReset, email.as_str())?)
    }

    async fn complete_verification(&self, token: &str) -> Result<User, AuthError> {
        let mut user = self.user_from_email_token(token).await?;
        user.is_verified = true;

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Account verified");

        Ok(user)
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        if !self.settings.emails_enabled {
            return Err(AuthError::EmailsDisabled);
        }

        let user = self
            .repository
            .find_by_email(email.as_str())
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        let token = self.mint_reset_token(&user.email)?;
        let subject = format!("Password Recovery for user {}", user.email);
        let body = format!(
            "Follow this link to reset your password: {}",
            self.settings.password_reset_link(&token)
        );
        self.send_email(&user.email, &subject, &body).await;
        tracing::info!(user_id = %user.id, "Password recovery requested");

        Ok(())
    }

    async fn complete_reset(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let mut user = self.user_from_email_token(token).await?;
        user.password_hash = self.authenticator.hash_password(new_password)?;

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Password reset");

        Ok(())
    }

    async fn login_with_provider(&self, provider_token: &str) -> Result<TokenPair, AuthError> {
        let identity = self.provider_identity(provider_token).await?;

        let user = self
            .repository
            .find_by_email(&identity.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(email = %identity.email, "Provider login for unknown email");
                AuthError::IncorrectLogin
            })?;

        let user = identity::require_active(user)?;
        let pair = self.authenticator.issue_pair(&user.id.to_string())?;
        tracing::info!(user_id = %user.id, "User logged in through identity provider");

        Ok(pair)
    }

    async fn register_with_provider(&self, provider_token: &str) -> Result<User, AuthError> {
        let identity = self.provider_identity(provider_token).await?;

        let email = EmailAddress::new(identity.email)
            .map_err(|e| AuthError::from(ProviderError::Rejected(e.to_string())))?;

        if self
            .repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self.authenticator.hash_password(&Self::random_password())?;
        let user = User::new(email, identity.name, password_hash, true);

        let created = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created.id,
            email = %created.email,
            "User registered through identity provider"
        );

        Ok(created)
    }
}
