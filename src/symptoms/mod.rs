//! Symptom quiz data and scoring

pub mod bank;
pub mod scoring;

pub use bank::{BankError, Disease, Question, SymptomBank};
pub use scoring::{score_answers, DiseaseScore};
