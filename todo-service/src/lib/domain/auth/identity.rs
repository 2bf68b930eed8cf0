//! Bearer token to user record.

use auth::Authenticator;

use crate::domain::auth::errors::AuthError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Resolve a bearer token to the user it was issued for.
///
/// Active state is not checked here; compose with [`require_active`].
///
/// # Errors
/// * `TokenExpired` - Authentic token past its expiry
/// * `InvalidCredentials` - Token is forged, malformed or its subject is not a user id
/// * `UserNotFound` - Subject names no stored user (e.g. deleted after issuance)
pub async fn resolve<UR>(
    authenticator: &Authenticator,
    repository: &UR,
    token: &str,
) -> Result<User, AuthError>
where
    UR: UserRepository + ?Sized,
{
    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        AuthError::from(e)
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        AuthError::InvalidCredentials
    })?;

    repository
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token subject no longer exists");
            AuthError::UserNotFound
        })
}

/// Pass active users through, reject the rest.
pub fn require_active(user: User) -> Result<User, AuthError> {
    if user.is_active {
        Ok(user)
    } else {
        tracing::warn!(user_id = %user.id, "Inactive user rejected");
        Err(AuthError::InactiveUser)
    }
}
