//! Error types for the classifier layer

use thiserror::Error;

/// Errors raised while loading, running, or fitting the text classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Artifact file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Vectorizer output does not line up with the model weights
    #[error("Dimension mismatch: vectorizer has {features} features, model expects {expected}")]
    DimensionMismatch { features: usize, expected: usize },

    /// The model produced a class index the label encoder does not know
    #[error("Unknown class index {0}")]
    UnknownClass(usize),

    /// Label not seen while fitting the encoder
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Model has no classes to score
    #[error("Model has no classes")]
    EmptyModel,

    /// Training data problems (missing columns, empty corpus)
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ClassifierError {
    fn from(err: csv::Error) -> Self {
        ClassifierError::InvalidDataset(err.to_string())
    }
}
