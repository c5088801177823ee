//! Symptom bank: diseases with their symptoms, plus quiz questions

use rand::seq::SliceRandom;
use rand::Rng;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum BankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid symptom bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Missing and `null` both read as the empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Symptom keys and advice for one disease
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Disease {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precautions: String,
}

/// Yes/no quiz question tied to a symptom key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptom_key: String,
}

impl Question {
    fn new(text: &str, symptom_key: &str) -> Self {
        Self {
            text: text.to_string(),
            symptom_key: symptom_key.to_string(),
        }
    }
}

/// Reference data loaded once at startup and never mutated
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SymptomBank {
    /// Diseases in file order; score ties keep this order
    #[serde(default, deserialize_with = "null_as_default")]
    pub diseases: IndexMap<String, Disease>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<Question>,
}

/// Questions served when the bank provides none
pub fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new("Have you been feeling sad or down recently?", "feeling sad"),
        Question::new(
            "Have you lost interest in activities you usually enjoy?",
            "loss of interest",
        ),
        Question::new(
            "Have you been feeling unusually worried or anxious?",
            "excessive worry",
        ),
        Question::new(
            "Are you having trouble sleeping, or sleeping much more?",
            "insomnia or hypersomnia",
        ),
        Question::new("Have you experienced panic attacks?", "panic attacks"),
    ]
}

impl SymptomBank {
    pub fn from_file(path: &Path) -> Result<Self, BankError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load the bank, falling back to the built-in set when missing or corrupt
    pub fn load_or_fallback(path: &Path) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "symptom bank not found, using fallback questions");
            return Self::fallback();
        }
        match Self::from_file(path) {
            Ok(bank) => {
                info!(
                    diseases = bank.diseases.len(),
                    questions = bank.questions.len(),
                    "symptom bank loaded"
                );
                bank
            }
            Err(e) => {
                warn!(error = %e, "failed to read symptom bank, using fallback");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            diseases: IndexMap::new(),
            questions: builtin_questions(),
        }
    }

    /// Question pool used by the quiz; built-in questions when the bank has none
    pub fn question_pool(&self) -> Vec<Question> {
        if self.questions.is_empty() {
            builtin_questions()
        } else {
            self.questions.clone()
        }
    }

    /// Shuffle the pool and keep at most `n` questions
    pub fn sample_questions<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Question> {
        let mut pool = self.question_pool();
        pool.shuffle(rng);
        pool.truncate(n);
        pool
    }
}
