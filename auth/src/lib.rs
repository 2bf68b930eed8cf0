//! Authentication primitives for the to-do service.
//!
//! Provides the I/O-free half of authentication:
//! - Password hashing (Argon2id)
//! - Signed, expiring tokens of four kinds (HS256)
//! - An `Authenticator` that ties both to configured token lifetimes
//!
//! Looking users up, deciding permissions and orchestrating flows is left to
//! the service, which adapts these implementations behind its own ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{JwtError, JwtHandler};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let issued_at = Utc::now();
//! let token = handler.encode_at("user123", Duration::minutes(30), issued_at).unwrap();
//!
//! let claims = handler.decode(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! let later = issued_at + Duration::minutes(30);
//! assert_eq!(handler.decode_at(&token, later), Err(JwtError::TokenExpired));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenKind};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint access + refresh tokens
//! let pair = auth.authenticate("password123", &hash, "user123").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! // Purpose tokens carry an email as subject
//! let reset = auth.issue(TokenKind::PasswordReset, "alice@example.com").unwrap();
//! assert_eq!(auth.validate_token(&reset).unwrap().sub, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenKind;
pub use jwt::TokenLifetimes;
pub use password::PasswordError;
pub use password::PasswordHasher;
