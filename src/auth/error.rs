//! Error types for the login flow

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Authorization code could not be exchanged
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// Provider answered without an access token
    #[error("Token exchange didn't return access token")]
    MissingAccessToken,

    /// Profile lookup failed
    #[error("Failed to fetch user info: {0}")]
    UserInfo(String),

    /// Session token could not be created
    #[error("Session signing failed: {0}")]
    Signing(String),

    /// Session token failed verification
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid URL: {0}")]
    Url(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidSession(err.to_string())
    }
}
