//! Append-only CSV backup of contact form messages

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ContactMessage;

#[derive(Debug, Error)]
pub enum ContactLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Background task failed: {0}")]
    Join(String),
}

/// Headerless CSV file with rows `timestamp,name,email,message`
#[derive(Debug, Clone)]
pub struct ContactLog {
    path: PathBuf,
}

impl ContactLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, message: &ContactMessage) -> Result<(), ContactLogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([
            message.timestamp.timestamp().to_string(),
            message.name.clone(),
            message.email.clone(),
            message.message.clone(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    /// Append on the blocking pool
    pub async fn append_async(&self, message: ContactMessage) -> Result<(), ContactLogError> {
        let log = self.clone();
        tokio::task::spawn_blocking(move || log.append(&message))
            .await
            .map_err(|e| ContactLogError::Join(e.to_string()))?
    }
}
