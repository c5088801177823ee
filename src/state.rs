//! Read-only state shared by every request

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{AuthService, GoogleOAuth, SessionSigner};
use crate::classifier::{artifacts, ArtifactPaths, TextClassifier};
use crate::config::Config;
use crate::contact::{ContactLog, Mailer, SmtpMailer};
use crate::symptoms::SymptomBank;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    /// `None` when any classifier artifact is missing; chat then uses keywords
    pub classifier: Option<TextClassifier>,
    pub symptom_bank: SymptomBank,
    pub contact_log: ContactLog,
    pub mailer: Arc<dyn Mailer>,
    /// `None` unless client id, client secret, and session secret are all set
    pub auth: Option<AuthService>,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Option<TextClassifier>,
        symptom_bank: SymptomBank,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let contact_log = ContactLog::new(config.messages_path());
        let auth = build_auth(&config);
        Self {
            config,
            classifier,
            symptom_bank,
            contact_log,
            mailer,
            auth,
        }
    }

    /// Load artifacts and reference data from the configured directories
    pub fn load(config: Config) -> Self {
        let loaded = artifacts::load_artifacts(&ArtifactPaths::in_dir(&config.artifacts_dir));
        let classifier = TextClassifier::from_artifacts(loaded);
        if classifier.is_none() {
            warn!("classifier unavailable, chat will use keyword matching");
        }

        let symptom_bank = SymptomBank::load_or_fallback(&config.symptom_bank_path());

        if !config.mail.is_configured() {
            warn!("SMTP not fully configured, contact form will fail to send");
        }
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config.mail.clone()));

        Self::new(config, classifier, symptom_bank, mailer)
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

fn build_auth(config: &Config) -> Option<AuthService> {
    let settings = &config.oauth;
    let (Some(client_id), Some(client_secret), Some(session_secret)) = (
        settings.client_id.clone(),
        settings.client_secret.clone(),
        settings.session_secret.as_deref(),
    ) else {
        warn!("Google sign-in not configured");
        return None;
    };

    match GoogleOAuth::new(client_id, client_secret, settings.endpoints.clone()) {
        Ok(oauth) => {
            info!("Google sign-in enabled");
            Some(AuthService {
                oauth,
                sessions: SessionSigner::new(session_secret),
                redirect_uri: settings.redirect_uri.clone(),
            })
        }
        Err(e) => {
            warn!(error = %e, "failed to build OAuth client");
            None
        }
    }
}
