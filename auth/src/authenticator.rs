use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenKind;
use crate::jwt::TokenLifetimes;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token minting.
///
/// Owns the signing secret and the lifetime of every token kind, so callers
/// only name the kind they need.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

/// Access and refresh token minted for the same subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create an authenticator with default token lifetimes.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_lifetimes(jwt_secret, TokenLifetimes::default())
    }

    /// Create an authenticator with explicit token lifetimes.
    pub fn with_lifetimes(jwt_secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> &TokenLifetimes {
        &self.lifetimes
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and mint an access + refresh pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity to carry in both tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_pair(subject)?)
    }

    /// Mint a token of the given kind without password verification.
    ///
    /// Used for refresh, verification and reset flows where the caller has
    /// already established who the subject is.
    pub fn issue(&self, kind: TokenKind, subject: &str) -> Result<String, JwtError> {
        let ttl = self.lifetimes.ttl(kind);
        tracing::debug!(
            kind = kind.as_str(),
            ttl_minutes = ttl.num_minutes(),
            "Issuing token"
        );
        self.jwt_handler.encode(subject, ttl)
    }

    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, subject)?,
            refresh_token: self.issue(TokenKind::Refresh, subject)?,
        })
    }

    /// Validate and decode a token of any kind.
    ///
    /// # Errors
    /// * `TokenExpired` - Authentic token past its expiry
    /// * `InvalidToken` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
