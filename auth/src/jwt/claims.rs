use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Token payload shared by every token kind.
///
/// `sub` is a user id for access and refresh tokens and an email address for
/// verification and password-reset tokens. The kind itself is not encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user id or email, depending on the kind)
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Create claims with an explicit expiry.
    pub fn new(sub: impl ToString, exp: i64) -> Self {
        Self {
            sub: sub.to_string(),
            exp,
        }
    }

    /// Create claims that expire `ttl` after `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Identity carried by the token
    /// * `ttl` - Lifetime of the token
    /// * `issued_at` - Instant the token is minted
    ///
    /// # Returns
    /// Claims with `exp = issued_at + ttl`
    pub fn for_subject(subject: impl ToString, ttl: Duration, issued_at: DateTime<Utc>) -> Self {
        Self::new(subject, (issued_at + ttl).timestamp())
    }

    /// Check if token is expired.
    ///
    /// The expiry instant itself already counts as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
