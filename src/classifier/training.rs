//! Offline training pipeline: dataset loading, split, fit, and evaluation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use super::artifacts::{save_artifacts, ArtifactPaths};
use super::error::ClassifierError;
use super::labels::LabelEncoder;
use super::logistic::{FitOptions, LogisticRegression};
use super::tfidf::{TfidfOptions, TfidfVectorizer};
use super::TextClassifier;

pub const REPORT_FILE: &str = "training_report.txt";
pub const SAMPLE_PREDICTIONS_FILE: &str = "sample_predictions.csv";
const SAMPLE_ROWS: usize = 100;

/// One labelled training row
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub symptoms: String,
    pub disease: String,
}

/// Read a `symptoms,disease` CSV (or `text,label`), dropping rows with empty fields
pub fn load_dataset(path: &Path) -> Result<Vec<Example>, ClassifierError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let (text_col, label_col) = match (column("symptoms"), column("disease")) {
        (Some(t), Some(l)) => (t, l),
        _ => match (column("text"), column("label")) {
            (Some(t), Some(l)) => (t, l),
            _ => {
                return Err(ClassifierError::InvalidDataset(
                    "CSV must have 'symptoms' and 'disease' columns.".to_string(),
                ))
            }
        },
    };

    let mut examples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symptoms = record.get(text_col).unwrap_or("").trim();
        let disease = record.get(label_col).unwrap_or("").trim();
        if symptoms.is_empty() || disease.is_empty() {
            continue;
        }
        examples.push(Example {
            symptoms: symptoms.to_string(),
            disease: disease.to_string(),
        });
    }

    if examples.is_empty() {
        return Err(ClassifierError::InvalidDataset(
            "dataset has no usable rows".to_string(),
        ));
    }
    Ok(examples)
}

/// Split row indices into (train, test), stratified by target class
pub fn stratified_split(targets: &[usize], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut by_class: HashMap<usize, Vec<usize>> = HashMap::new();
    for (row, &target) in targets.iter().enumerate() {
        by_class.entry(target).or_default().push(row);
    }

    let mut classes: Vec<usize> = by_class.keys().copied().collect();
    classes.sort_unstable();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for class in classes {
        let mut rows = by_class.remove(&class).unwrap_or_default();
        rows.shuffle(&mut rng);
        let n_test = if rows.len() < 2 {
            0
        } else {
            ((rows.len() as f64 * test_size).round() as usize).min(rows.len() - 1)
        };
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    (train, test)
}

/// Precision, recall, F1, and support for one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Hold-out evaluation summary
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub fn evaluate(truth: &[usize], predicted: &[usize], labels: &LabelEncoder) -> Evaluation {
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    let per_class = labels
        .classes
        .iter()
        .enumerate()
        .map(|(class, label)| {
            let tp = truth
                .iter()
                .zip(predicted)
                .filter(|&(&t, &p)| t == class && p == class)
                .count();
            let predicted_count = predicted.iter().filter(|&&p| p == class).count();
            let support = truth.iter().filter(|&&t| t == class).count();
            let precision = ratio(tp, predicted_count);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    Evaluation {
        accuracy: ratio(correct, truth.len()),
        per_class,
    }
}

impl Evaluation {
    /// Plain-text report with per-class rows and macro/weighted averages
    pub fn report(&self) -> String {
        let width = self
            .per_class
            .iter()
            .map(|m| m.label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(12);

        let total: usize = self.per_class.iter().map(|m| m.support).sum();
        let n = self.per_class.len().max(1) as f64;
        let macro_avg = |f: fn(&ClassMetrics) -> f64| self.per_class.iter().map(f).sum::<f64>() / n;
        let weighted_avg = |f: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                self.per_class
                    .iter()
                    .map(|m| f(m) * m.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let row = |label: &str, p: f64, r: f64, f1: f64, support: usize| {
            format!("{label:>width$} {p:>9.2} {r:>9.2} {f1:>9.2} {support:>9}")
        };

        let mut lines = vec![
            format!("Accuracy: {}", self.accuracy),
            String::new(),
            format!(
                "{:>width$} {:>9} {:>9} {:>9} {:>9}",
                "", "precision", "recall", "f1-score", "support"
            ),
            String::new(),
        ];
        lines.extend(
            self.per_class
                .iter()
                .map(|m| row(&m.label, m.precision, m.recall, m.f1, m.support)),
        );
        lines.push(String::new());
        lines.push(format!(
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, total
        ));
        lines.push(row(
            "macro avg",
            macro_avg(|m: &ClassMetrics| m.precision),
            macro_avg(|m: &ClassMetrics| m.recall),
            macro_avg(|m: &ClassMetrics| m.f1),
            total,
        ));
        lines.push(row(
            "weighted avg",
            weighted_avg(|m: &ClassMetrics| m.precision),
            weighted_avg(|m: &ClassMetrics| m.recall),
            weighted_avg(|m: &ClassMetrics| m.f1),
            total,
        ));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Knobs for a training run
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub tfidf: TfidfOptions,
    pub fit: FitOptions,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            tfidf: TfidfOptions::default(),
            fit: FitOptions::default(),
            test_size: 0.2,
            seed: 42,
        }
    }
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub classifier: TextClassifier,
    pub vectorizer: TfidfVectorizer,
    pub model: LogisticRegression,
    pub labels: LabelEncoder,
    pub evaluation: Evaluation,
}

/// Fit vectorizer, label encoder, and model, then score the hold-out split
pub fn train(
    examples: &[Example],
    options: &TrainingOptions,
) -> Result<TrainingOutcome, ClassifierError> {
    let texts: Vec<&str> = examples.iter().map(|e| e.symptoms.as_str()).collect();
    let diseases: Vec<&str> = examples.iter().map(|e| e.disease.as_str()).collect();

    let labels = LabelEncoder::fit(&diseases);
    let targets = diseases
        .iter()
        .map(|d| labels.transform(d))
        .collect::<Result<Vec<_>, _>>()?;

    let vectorizer = TfidfVectorizer::fit(&texts, &options.tfidf);
    let features: Vec<_> = texts.iter().map(|t| vectorizer.transform(t)).collect();

    let (train_rows, test_rows) = stratified_split(&targets, options.test_size, options.seed);
    info!(
        rows = examples.len(),
        train = train_rows.len(),
        test = test_rows.len(),
        classes = labels.len(),
        features = vectorizer.n_features(),
        "fitting classifier"
    );

    let train_x: Vec<_> = train_rows.iter().map(|&r| features[r].clone()).collect();
    let train_y: Vec<usize> = train_rows.iter().map(|&r| targets[r]).collect();
    let model = LogisticRegression::fit(
        &train_x,
        &train_y,
        labels.len(),
        vectorizer.n_features(),
        &options.fit,
    )?;

    let test_y: Vec<usize> = test_rows.iter().map(|&r| targets[r]).collect();
    let predicted = test_rows
        .iter()
        .map(|&r| model.predict(&features[r]))
        .collect::<Result<Vec<_>, _>>()?;
    let evaluation = evaluate(&test_y, &predicted, &labels);
    info!(accuracy = evaluation.accuracy, "evaluation finished");

    let classifier = TextClassifier::new(vectorizer.clone(), model.clone(), labels.clone());
    Ok(TrainingOutcome {
        classifier,
        vectorizer,
        model,
        labels,
        evaluation,
    })
}

/// Write the three artifacts plus the report and sample predictions
pub fn write_outputs(
    outcome: &TrainingOutcome,
    examples: &[Example],
    artifacts: &ArtifactPaths,
    reports_dir: &Path,
) -> Result<(), ClassifierError> {
    save_artifacts(artifacts, &outcome.vectorizer, &outcome.model, &outcome.labels)?;

    fs::create_dir_all(reports_dir)?;
    fs::write(reports_dir.join(REPORT_FILE), outcome.evaluation.report())?;

    let mut writer = csv::Writer::from_path(reports_dir.join(SAMPLE_PREDICTIONS_FILE))?;
    writer.write_record(["text", "pred"])?;
    for example in examples.iter().take(SAMPLE_ROWS) {
        let prediction = outcome.classifier.predict(&example.symptoms)?;
        writer.write_record([example.symptoms.as_str(), prediction.label.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
