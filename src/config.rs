//! Server configuration from environment variables.
//!
//! `.env` is loaded by `main` before [`Config::from_env`] runs. Tests build a
//! config through [`Config::from_lookup`] so they never touch the process
//! environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::auth::GoogleEndpoints;
use crate::contact::MailSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAIL_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Mentallify Contact";
pub const DEFAULT_CONTACT_EMAIL: &str = "contact@example.com";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/auth/google/callback";

pub const SYMPTOM_BANK_FILE: &str = "symptom_bank.json";
pub const MESSAGES_FILE: &str = "messages.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Google sign-in settings; each piece is optional until the routes need it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Secret used to sign session tokens
    pub session_secret: Option<String>,
    pub redirect_uri: String,
    pub endpoints: GoogleEndpoints,
}

impl OAuthSettings {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.session_secret.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory holding the frontend pages and assets
    pub frontend_root: PathBuf,
    pub artifacts_dir: PathBuf,
    /// Exported web-model JSON served under `/models`
    pub models_dir: PathBuf,
    pub data_dir: PathBuf,
    pub site_contact_email: String,
    pub mail: MailSettings,
    pub oauth: OAuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let port = match get("MAIL_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "MAIL_PORT",
                value: raw,
            })?,
            None => DEFAULT_MAIL_PORT,
        };

        let frontend_root = PathBuf::from(get("FRONTEND_ROOT").unwrap_or_else(|| ".".to_string()));
        let artifacts_dir = get("ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| frontend_root.join("backend"));
        let models_dir = get("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| frontend_root.join("models"));
        let data_dir = get("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| frontend_root.join("data"));

        let mail = MailSettings {
            server: get("MAIL_SERVER"),
            port,
            username: get("MAIL_USERNAME"),
            password: get("MAIL_PASSWORD"),
            from_name: get("MAIL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            to: get("MAIL_TO"),
        };

        let site_contact_email = get("SITE_CONTACT_EMAIL")
            .or_else(|| mail.username.clone())
            .unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string());

        let defaults = GoogleEndpoints::default();
        let oauth = OAuthSettings {
            client_id: get("GOOGLE_CLIENT_ID"),
            client_secret: get("GOOGLE_CLIENT_SECRET"),
            session_secret: get("SESSION_SECRET"),
            redirect_uri: get("OAUTH_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            endpoints: GoogleEndpoints {
                auth_url: get("GOOGLE_AUTH_URL").unwrap_or(defaults.auth_url),
                token_url: get("GOOGLE_TOKEN_URL").unwrap_or(defaults.token_url),
                userinfo_url: get("GOOGLE_USERINFO_URL").unwrap_or(defaults.userinfo_url),
            },
        };

        Ok(Self {
            bind_addr,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            frontend_root,
            artifacts_dir,
            models_dir,
            data_dir,
            site_contact_email,
            mail,
            oauth,
        })
    }

    pub fn symptom_bank_path(&self) -> PathBuf {
        self.data_dir.join(SYMPTOM_BANK_FILE)
    }

    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(MESSAGES_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.from_name, "Mentallify Contact");
        assert_eq!(config.site_contact_email, "contact@example.com");
        assert_eq!(config.oauth.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.oauth.endpoints, GoogleEndpoints::default());
        assert_eq!(config.messages_path(), PathBuf::from("./data/messages.csv"));
        assert!(!config.mail.is_configured());
        assert!(!config.oauth.is_configured());
    }

    #[test]
    fn test_contact_email_falls_back_to_mail_username() {
        let config = Config::from_lookup(lookup(&[("MAIL_USERNAME", "bot@site.org")])).unwrap();
        assert_eq!(config.site_contact_email, "bot@site.org");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("GOOGLE_CLIENT_ID", "  ")])).unwrap();
        assert!(config.oauth.client_id.is_none());
    }

    #[test]
    fn test_invalid_mail_port() {
        let err = Config::from_lookup(lookup(&[("MAIL_PORT", "smtp")])).unwrap_err();
        assert!(err.to_string().contains("MAIL_PORT"));
    }

    #[test]
    fn test_invalid_bind_addr() {
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "localhost")])).is_err());
    }

    #[test]
    fn test_oauth_configured() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("SESSION_SECRET", "sign"),
            ("GOOGLE_TOKEN_URL", "http://127.0.0.1:9/token"),
        ]))
        .unwrap();
        assert!(config.oauth.is_configured());
        assert_eq!(config.oauth.endpoints.token_url, "http://127.0.0.1:9/token");
    }
}
