//! Text classifier
//!
//! TF-IDF features scored by one-vs-rest logistic regression, with a
//! keyword-matching fallback for when the trained artifacts are missing or
//! inference fails.

pub mod artifacts;
pub mod error;
pub mod fallback;
pub mod labels;
pub mod logistic;
pub mod tfidf;
pub mod tokenizer;
pub mod training;

pub use artifacts::{ArtifactPaths, LoadedArtifacts, WebModel};
pub use error::ClassifierError;
pub use fallback::{keyword_reply, CLARIFYING_PROMPT};
pub use labels::LabelEncoder;
pub use logistic::LogisticRegression;
pub use tfidf::{SparseVector, TfidfVectorizer};

/// Result of scoring one message
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probabilities: Vec<f64>,
}

/// Vectorizer, model, and label encoder used together for inference
#[derive(Debug, Clone)]
pub struct TextClassifier {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
    labels: LabelEncoder,
}

impl TextClassifier {
    pub fn new(vectorizer: TfidfVectorizer, model: LogisticRegression, labels: LabelEncoder) -> Self {
        Self {
            vectorizer,
            model,
            labels,
        }
    }

    /// Build a classifier only when all three artifacts were loaded
    pub fn from_artifacts(loaded: LoadedArtifacts) -> Option<Self> {
        match loaded {
            LoadedArtifacts {
                vectorizer: Some(vectorizer),
                model: Some(model),
                label_encoder: Some(labels),
            } => Some(Self::new(vectorizer, model, labels)),
            _ => None,
        }
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        if self.vectorizer.n_features() != self.model.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                features: self.vectorizer.n_features(),
                expected: self.model.n_features(),
            });
        }

        let features = self.vectorizer.transform(text);
        let probabilities = self.model.predict_proba(&features)?;
        let best = logistic::argmax(&probabilities).ok_or(ClassifierError::EmptyModel)?;
        let class = self
            .model
            .classes
            .get(best)
            .copied()
            .ok_or(ClassifierError::UnknownClass(best))?;
        let label = self.labels.inverse_transform(class)?.to_string();

        Ok(Prediction {
            label,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tfidf::TfidfOptions;

    fn classifier_with(labels: &[&str]) -> TextClassifier {
        let vectorizer = TfidfVectorizer::fit(
            &["panic racing heart", "hopeless low mood"],
            &TfidfOptions::default(),
        );
        let n = vectorizer.n_features();
        let panic = vectorizer.vocabulary["panic"];
        let mut row = vec![0.0; n];
        row[panic] = 4.0;
        let model = LogisticRegression {
            coef: vec![row],
            intercept: vec![-1.0],
            classes: vec![0, 1],
        };
        TextClassifier::new(vectorizer, model, LabelEncoder::fit(labels))
    }

    #[test]
    fn test_predict_picks_argmax_label() {
        let classifier = classifier_with(&["Anxiety", "Depression"]);
        // the single binary row scores class index 1
        let prediction = classifier.predict("panic").unwrap();
        assert_eq!(prediction.label, "Depression");
        assert_eq!(prediction.probabilities.len(), 2);

        let prediction = classifier.predict("hopeless").unwrap();
        assert_eq!(prediction.label, "Anxiety");
    }

    #[test]
    fn test_missing_label_is_an_error() {
        let classifier = classifier_with(&["Anxiety"]);
        assert!(matches!(
            classifier.predict("panic"),
            Err(ClassifierError::UnknownClass(1))
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let mut classifier = classifier_with(&["Anxiety", "Depression"]);
        classifier.model.coef[0].push(0.0);
        assert!(matches!(
            classifier.predict("panic"),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_artifacts_requires_all_three() {
        let loaded = LoadedArtifacts {
            vectorizer: Some(TfidfVectorizer::fit(&["a word"], &TfidfOptions::default())),
            model: None,
            label_encoder: Some(LabelEncoder::fit(&["OCD"])),
        };
        assert!(TextClassifier::from_artifacts(loaded).is_none());
    }
}
