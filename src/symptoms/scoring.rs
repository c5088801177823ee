//! Quiz scoring: match reported symptoms against each disease

use serde::{Serialize, Serializer};
use std::collections::HashSet;

use super::bank::SymptomBank;

/// Score of one disease for a set of reported symptoms
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiseaseScore {
    pub disease: String,
    /// Fraction of the disease's symptoms that were reported
    #[serde(serialize_with = "round_three")]
    pub score: f64,
    pub matched_symptoms: Vec<String>,
    pub precautions: String,
}

fn round_three<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}

/// Score every disease in the bank, best match first
///
/// Ties keep the bank's disease order.
pub fn score_answers<S: AsRef<str>>(bank: &SymptomBank, yes_symptoms: &[S]) -> Vec<DiseaseScore> {
    let reported: HashSet<&str> = yes_symptoms.iter().map(|s| s.as_ref()).collect();

    let mut results: Vec<DiseaseScore> = bank
        .diseases
        .iter()
        .map(|(name, disease)| {
            let matched: Vec<String> = disease
                .symptoms
                .iter()
                .filter(|s| reported.contains(s.as_str()))
                .cloned()
                .collect();
            let score = if disease.symptoms.is_empty() {
                0.0
            } else {
                matched.len() as f64 / disease.symptoms.len() as f64
            };
            DiseaseScore {
                disease: name.clone(),
                score,
                matched_symptoms: matched,
                precautions: disease.precautions.clone(),
            }
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}
