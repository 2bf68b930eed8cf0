use chrono::Duration;

/// Purpose a token is minted for.
///
/// Kinds share one signing key and one payload shape; they differ only in
/// lifetime and in what the subject means to the consuming flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Subject is a user id. Presented on every authenticated request.
    Access,
    /// Subject is a user id. Exchanged for a new access token.
    Refresh,
    /// Subject is an email. Consumed by account verification.
    EmailVerification,
    /// Subject is an email. Consumed by password reset.
    PasswordReset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::EmailVerification => "email_verification",
            TokenKind::PasswordReset => "password_reset",
        }
    }
}

/// Lifetime of each token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
    pub email_verification: Duration,
    pub password_reset: Duration,
}

impl TokenLifetimes {
    /// Build lifetimes from minute counts, as they appear in configuration.
    pub fn from_minutes(
        access: i64,
        refresh: i64,
        email_verification: i64,
        password_reset: i64,
    ) -> Self {
        Self {
            access: Duration::minutes(access),
            refresh: Duration::minutes(refresh),
            email_verification: Duration::minutes(email_verification),
            password_reset: Duration::minutes(password_reset),
        }
    }

    /// Lifetime for the given kind.
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
            TokenKind::EmailVerification => self.email_verification,
            TokenKind::PasswordReset => self.password_reset,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::from_minutes(30, 60 * 24 * 7, 60, 60)
    }
}
