//! Authentication primitives: password hashing and access tokens.

pub mod password;
pub mod token;

use thiserror::Error;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{parse_ttl, Claims, TokenIssuer, TokenSubject, DEFAULT_TOKEN_TTL};

/// Errors raised while issuing or checking access tokens.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Token(String),

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token lifetime: {0:?}")]
    InvalidTtl(String),

    #[error(transparent)]
    Password(#[from] PasswordError),
}
