pub mod claims;
pub mod errors;
pub mod handler;
pub mod kind;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use kind::TokenKind;
pub use kind::TokenLifetimes;
