//! On-disk artifact files and the browser model export

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::error::ClassifierError;
use super::labels::LabelEncoder;
use super::logistic::LogisticRegression;
use super::tfidf::TfidfVectorizer;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const MODEL_FILE: &str = "mental_health_model.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const WEB_MODEL_FILE: &str = "web_model.json";
pub const VOCAB_FILE: &str = "vocab.json";

/// Paths of the three classifier artifacts within one directory
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub model: PathBuf,
    pub label_encoder: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(VECTORIZER_FILE),
            model: dir.join(MODEL_FILE),
            label_encoder: dir.join(LABEL_ENCODER_FILE),
        }
    }
}

/// Artifacts loaded independently; any of them may be missing
#[derive(Debug, Clone, Default)]
pub struct LoadedArtifacts {
    pub vectorizer: Option<TfidfVectorizer>,
    pub model: Option<LogisticRegression>,
    pub label_encoder: Option<LabelEncoder>,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ClassifierError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_vec(value)?)?;
    Ok(())
}

/// Load one artifact, logging and swallowing any failure
fn safe_load<T: DeserializeOwned>(path: &Path, name: &str) -> Option<T> {
    if !path.exists() {
        warn!(artifact = name, path = %path.display(), "artifact not found");
        return None;
    }
    match read_json(path) {
        Ok(value) => {
            info!(artifact = name, "artifact loaded");
            Some(value)
        }
        Err(e) => {
            warn!(artifact = name, error = %e, "failed to load artifact");
            None
        }
    }
}

pub fn load_artifacts(paths: &ArtifactPaths) -> LoadedArtifacts {
    let loaded = LoadedArtifacts {
        vectorizer: safe_load(&paths.vectorizer, VECTORIZER_FILE),
        model: safe_load(&paths.model, MODEL_FILE),
        label_encoder: safe_load(&paths.label_encoder, LABEL_ENCODER_FILE),
    };
    info!(
        vectorizer = loaded.vectorizer.is_some(),
        model = loaded.model.is_some(),
        label_encoder = loaded.label_encoder.is_some(),
        "artifact status"
    );
    loaded
}

pub fn save_artifacts(
    paths: &ArtifactPaths,
    vectorizer: &TfidfVectorizer,
    model: &LogisticRegression,
    label_encoder: &LabelEncoder,
) -> Result<(), ClassifierError> {
    write_json(&paths.vectorizer, vectorizer)?;
    write_json(&paths.model, model)?;
    write_json(&paths.label_encoder, label_encoder)?;
    Ok(())
}

/// Self-contained model the frontend can score with in the browser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebModel {
    pub classes: Vec<String>,
    pub vocab: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    pub coefs: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl WebModel {
    pub fn from_artifacts(
        vectorizer: &TfidfVectorizer,
        model: &LogisticRegression,
        label_encoder: &LabelEncoder,
    ) -> Self {
        Self {
            classes: label_encoder.classes.clone(),
            vocab: vectorizer.vocabulary.clone(),
            idf: vectorizer.idf.clone(),
            coefs: model.coef.clone(),
            intercept: model.intercept.clone(),
        }
    }
}

/// Write `web_model.json` and `vocab.json` into `out_dir`
pub fn export_web_model(
    paths: &ArtifactPaths,
    out_dir: &Path,
) -> Result<WebModel, ClassifierError> {
    let vectorizer: TfidfVectorizer = read_json(&paths.vectorizer)?;
    let model: LogisticRegression = read_json(&paths.model)?;
    let label_encoder: LabelEncoder = read_json(&paths.label_encoder)?;

    let web_model = WebModel::from_artifacts(&vectorizer, &model, &label_encoder);
    write_json(&out_dir.join(WEB_MODEL_FILE), &web_model)?;
    write_json(&out_dir.join(VOCAB_FILE), &web_model.vocab)?;

    info!(out_dir = %out_dir.display(), "exported web model");
    Ok(web_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tfidf::TfidfOptions;
    use tempfile::tempdir;

    fn fixtures() -> (TfidfVectorizer, LogisticRegression, LabelEncoder) {
        let vectorizer = TfidfVectorizer::fit(&["panic attack", "low mood"], &TfidfOptions::default());
        let n = vectorizer.n_features();
        let model = LogisticRegression {
            coef: vec![vec![0.5; n]],
            intercept: vec![0.1],
            classes: vec![0, 1],
        };
        (vectorizer, model, LabelEncoder::fit(&["Anxiety", "Depression"]))
    }

    #[test]
    fn test_missing_artifacts_load_as_none() {
        let dir = tempdir().unwrap();
        let loaded = load_artifacts(&ArtifactPaths::in_dir(dir.path()));
        assert!(loaded.vectorizer.is_none());
        assert!(loaded.model.is_none());
        assert!(loaded.label_encoder.is_none());
    }

    #[test]
    fn test_corrupt_artifact_is_tolerated() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (vectorizer, model, encoder) = fixtures();
        save_artifacts(&paths, &vectorizer, &model, &encoder).unwrap();
        fs::write(&paths.model, b"not json").unwrap();

        let loaded = load_artifacts(&paths);
        assert_eq!(loaded.vectorizer, Some(vectorizer));
        assert!(loaded.model.is_none());
        assert_eq!(loaded.label_encoder, Some(encoder));
    }

    #[test]
    fn test_export_writes_web_model_and_vocab() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("backend"));
        let (vectorizer, model, encoder) = fixtures();
        save_artifacts(&paths, &vectorizer, &model, &encoder).unwrap();

        let out_dir = dir.path().join("models");
        let web_model = export_web_model(&paths, &out_dir).unwrap();
        assert_eq!(web_model.classes, vec!["Anxiety", "Depression"]);

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(out_dir.join(WEB_MODEL_FILE)).unwrap()).unwrap();
        for key in ["classes", "vocab", "idf", "coefs", "intercept"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let vocab: BTreeMap<String, usize> =
            serde_json::from_slice(&fs::read(out_dir.join(VOCAB_FILE)).unwrap()).unwrap();
        assert_eq!(vocab, vectorizer.vocabulary);
    }
}
