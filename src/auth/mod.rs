//! Google sign-in and stateless sessions

pub mod bridge;
pub mod error;
pub mod google;
pub mod session;

pub use bridge::render_bridge_page;
pub use error::AuthError;
pub use google::{GoogleEndpoints, GoogleOAuth, UserProfile};
pub use session::{SessionClaims, SessionSigner, SESSION_TTL_DAYS};

/// Everything the login routes need; present only when fully configured
#[derive(Debug, Clone)]
pub struct AuthService {
    pub oauth: GoogleOAuth,
    pub sessions: SessionSigner,
    /// Callback URI registered with the provider
    pub redirect_uri: String,
}
