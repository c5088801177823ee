//! One-vs-rest logistic regression over sparse TF-IDF features

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ClassifierError;
use super::tfidf::SparseVector;

/// Fitted linear classifier
///
/// `coef` holds one weight row per class, or a single row for a binary
/// problem where the row scores the second class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticRegression {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Encoded class indices in output order
    pub classes: Vec<usize>,
}

/// Fitting parameters
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Inverse L2 regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Gradient norm below which a binary fit stops early
    pub tol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Fit one binary model per class (a single model for two classes)
    pub fn fit(
        samples: &[SparseVector],
        targets: &[usize],
        n_classes: usize,
        n_features: usize,
        options: &FitOptions,
    ) -> Result<Self, ClassifierError> {
        if samples.is_empty() || samples.len() != targets.len() {
            return Err(ClassifierError::InvalidDataset(format!(
                "{} samples for {} targets",
                samples.len(),
                targets.len()
            )));
        }
        if n_classes < 2 {
            return Err(ClassifierError::InvalidDataset(
                "at least two classes are required".to_string(),
            ));
        }

        let positives: Vec<usize> = if n_classes == 2 {
            vec![1]
        } else {
            (0..n_classes).collect()
        };

        let mut coef = Vec::with_capacity(positives.len());
        let mut intercept = Vec::with_capacity(positives.len());
        for positive in positives {
            let labels: Vec<f64> = targets
                .iter()
                .map(|&t| if t == positive { 1.0 } else { 0.0 })
                .collect();
            let (w, b) = fit_binary(samples, &labels, n_features, options);
            coef.push(w);
            intercept.push(b);
        }

        Ok(Self {
            coef,
            intercept,
            classes: (0..n_classes).collect(),
        })
    }

    /// Width of each weight row
    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    pub fn decision_function(&self, x: &SparseVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(self.intercept.iter())
            .map(|(w, b)| x.dot(w) + b)
            .collect()
    }

    /// Per-class probabilities summing to one
    pub fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>, ClassifierError> {
        if self.coef.is_empty() || self.coef.len() != self.intercept.len() {
            return Err(ClassifierError::EmptyModel);
        }

        let scores = self.decision_function(x);
        if self.coef.len() == 1 && self.classes.len() == 2 {
            let p = sigmoid(scores[0]);
            return Ok(vec![1.0 - p, p]);
        }

        let mut probs: Vec<f64> = scores.into_iter().map(sigmoid).collect();
        let total: f64 = probs.iter().sum();
        if total > 0.0 {
            for p in probs.iter_mut() {
                *p /= total;
            }
        }
        Ok(probs)
    }

    /// Encoded class with the highest probability
    pub fn predict(&self, x: &SparseVector) -> Result<usize, ClassifierError> {
        let probs = self.predict_proba(x)?;
        let index = argmax(&probs).ok_or(ClassifierError::EmptyModel)?;
        self.classes
            .get(index)
            .copied()
            .ok_or(ClassifierError::UnknownClass(index))
    }
}

/// Index of the largest value; the first one wins ties
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn fit_binary(
    samples: &[SparseVector],
    labels: &[f64],
    n_features: usize,
    options: &FitOptions,
) -> (Vec<f64>, f64) {
    let n = samples.len() as f64;
    let reg = 1.0 / (options.c * n);
    let max_sq_norm = samples
        .iter()
        .map(|x| x.norm().powi(2))
        .fold(0.0f64, f64::max);
    // Lipschitz bound of the mean log-loss gradient, intercept included
    let step = 1.0 / (0.25 * (max_sq_norm + 1.0) + reg);

    let mut w = vec![0.0; n_features];
    let mut b = 0.0;
    let mut grad_w = vec![0.0; n_features];

    for iteration in 0..options.max_iter {
        grad_w.iter_mut().for_each(|g| *g = 0.0);
        let mut grad_b = 0.0;

        for (x, &y) in samples.iter().zip(labels) {
            let residual = sigmoid(x.dot(&w) + b) - y;
            for &(i, v) in &x.entries {
                if i < n_features {
                    grad_w[i] += residual * v;
                }
            }
            grad_b += residual;
        }

        let mut grad_norm_sq = 0.0;
        for (g, wi) in grad_w.iter_mut().zip(w.iter()) {
            *g = *g / n + reg * wi;
            grad_norm_sq += *g * *g;
        }
        grad_b /= n;
        grad_norm_sq += grad_b * grad_b;

        if grad_norm_sq.sqrt() < options.tol {
            debug!(iteration, "binary fit converged");
            break;
        }

        for (wi, g) in w.iter_mut().zip(grad_w.iter()) {
            *wi -= step * g;
        }
        b -= step * grad_b;
    }

    (w, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(usize, f64)]) -> SparseVector {
        SparseVector {
            entries: entries.to_vec(),
        }
    }

    fn toy_data() -> (Vec<SparseVector>, Vec<usize>) {
        let samples = vec![
            vector(&[(0, 1.0)]),
            vector(&[(0, 0.8), (3, 0.6)]),
            vector(&[(1, 1.0)]),
            vector(&[(1, 0.6), (3, 0.8)]),
            vector(&[(2, 1.0)]),
            vector(&[(2, 0.8), (3, 0.6)]),
        ];
        (samples, vec![0, 0, 1, 1, 2, 2])
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_multiclass_fit_predicts_training_labels() {
        let (samples, targets) = toy_data();
        let model =
            LogisticRegression::fit(&samples, &targets, 3, 4, &FitOptions::default()).unwrap();
        assert_eq!(model.coef.len(), 3);
        for (x, &y) in samples.iter().zip(&targets) {
            assert_eq!(model.predict(x).unwrap(), y);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (samples, targets) = toy_data();
        let model =
            LogisticRegression::fit(&samples, &targets, 3, 4, &FitOptions::default()).unwrap();
        let probs = model.predict_proba(&vector(&[(0, 0.5), (1, 0.5)])).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_binary_problem_uses_single_row() {
        let samples = vec![vector(&[(0, 1.0)]), vector(&[(1, 1.0)])];
        let model =
            LogisticRegression::fit(&samples, &[0, 1], 2, 2, &FitOptions::default()).unwrap();
        assert_eq!(model.coef.len(), 1);
        let probs = model.predict_proba(&samples[1]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs[1] > probs[0]);
        assert_eq!(model.predict(&samples[0]).unwrap(), 0);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let samples = vec![vector(&[(0, 1.0)])];
        assert!(LogisticRegression::fit(&samples, &[0], 1, 1, &FitOptions::default()).is_err());
    }

    #[test]
    fn test_empty_model_errors() {
        let model = LogisticRegression {
            coef: vec![],
            intercept: vec![],
            classes: vec![],
        };
        assert!(matches!(
            model.predict_proba(&SparseVector::default()),
            Err(ClassifierError::EmptyModel)
        ));
    }
}
