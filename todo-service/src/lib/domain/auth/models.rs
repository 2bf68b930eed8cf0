use crate::domain::user::models::EmailAddress;

/// Self-registration request with a validated email.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub password: String,
}

/// What an identity provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub email: String,
    pub name: Option<String>,
}

/// Email-related switches of the auth flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Password recovery is refused when false.
    pub emails_enabled: bool,
    /// New self-registered accounts start unverified and receive a
    /// verification email when true.
    pub verification_required: bool,
    /// Prefix of the links carried in outgoing mail.
    pub base_url: String,
}

impl AuthSettings {
    pub fn password_reset_link(&self, token: &str) -> String {
        format!(
            "{}/password_reset?token={}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/verify_account?token={}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }
}
