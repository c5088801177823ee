#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mentallify::config::Config;
use mentallify::contact::{ContactMessage, MailError, Mailer};
use mentallify::state::{AppState, SharedState};
use mentallify::symptoms::SymptomBank;
use tempfile::TempDir;

pub const FRONT_PAGE: &str = "<html><body>front</body></html>";
pub const CONTACT_PAGE: &str = "<p>Write to {{ site_contact_email }}</p>";
pub const SESSION_SECRET: &str = "test-session-secret";

pub const SYMPTOM_BANK: &str = r#"{
    "diseases": {
        "Anxiety": {"symptoms": ["excessive worry", "panic attacks"], "precautions": "Breathe slowly"},
        "Depression": {"symptoms": ["feeling sad", "loss of interest"], "precautions": "Talk to someone"}
    },
    "questions": [
        {"text": "Have you been feeling sad?", "symptom_key": "feeling sad"},
        {"text": "Have you lost interest in things?", "symptom_key": "loss of interest"},
        {"text": "Do you worry a lot?", "symptom_key": "excessive worry"}
    ]
}"#;

/// Temporary site directory laid out like a deployed frontend
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let site = Self { dir };
        site.write("front.html", FRONT_PAGE);
        site.write("contact.html", CONTACT_PAGE);
        site.write("css/app.css", "body { color: black; }");
        site.write("data/symptom_bank.json", SYMPTOM_BANK);
        site.write("models/web_model.json", r#"{"classes": []}"#);
        site
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        std::fs::write(path, contents).expect("Failed to write fixture");
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path(relative)).expect("Failed to remove fixture");
    }

    pub fn default_config(&self) -> Config {
        self.config::<&str>(&[])
    }

    /// Config rooted at this site plus extra `KEY=value` overrides
    pub fn config<S: AsRef<str>>(&self, vars: &[(&str, S)]) -> Config {
        let root = self.root().to_string_lossy().into_owned();
        Config::from_lookup(|key| {
            if key == "FRONTEND_ROOT" {
                return Some(root.clone());
            }
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_ref().to_string())
        })
        .expect("Failed to build test config")
    }
}

/// Env overrides enabling Google sign-in against `base_url`
pub fn oauth_vars(base_url: &str) -> Vec<(&'static str, String)> {
    vec![
        ("GOOGLE_CLIENT_ID", "client-123".to_string()),
        ("GOOGLE_CLIENT_SECRET", "client-secret".to_string()),
        ("SESSION_SECRET", SESSION_SECRET.to_string()),
        ("OAUTH_REDIRECT_URI", "http://localhost:5000/auth/google/callback".to_string()),
        ("GOOGLE_AUTH_URL", format!("{base_url}/auth")),
        ("GOOGLE_TOKEN_URL", format!("{base_url}/token")),
        ("GOOGLE_USERINFO_URL", format!("{base_url}/userinfo")),
    ]
}

/// Mailer that records every message it is asked to send
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<ContactMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Mailer that always fails the way an unconfigured SMTP setup does
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_contact(&self, _message: &ContactMessage) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Shared state without a classifier, using the given mailer
pub fn build_state(config: Config, mailer: Arc<dyn Mailer>) -> SharedState {
    let bank = SymptomBank::load_or_fallback(&config.symptom_bank_path());
    AppState::new(config, None, bank, mailer).shared()
}
