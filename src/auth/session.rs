//! Stateless session tokens (HS256 JWT)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::google::UserProfile;

/// Sessions stay valid for seven days after issue
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_profile(profile: &UserProfile, issued_at: DateTime<Utc>) -> Self {
        Self {
            email: profile.email.clone(),
            name: profile.name.clone(),
            picture: profile.picture.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }
}

/// Signs and verifies session tokens with a server secret
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Issue a token for a freshly authenticated profile
    pub fn issue(&self, profile: &UserProfile, now: DateTime<Utc>) -> Result<String, AuthError> {
        self.sign(&SessionClaims::for_profile(profile, now))
    }

    /// Check signature and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        Ok(decode::<SessionClaims>(token, &self.decoding_key, &validation)?.claims)
    }
}
