//! TF-IDF vectorizer: fitting and sparse transform

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::tokenizer::Tokenizer;

/// Sparse feature vector as (feature index, value) pairs sorted by index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Dot product against a dense weight row
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    /// Term -> feature index; indices follow sorted term order
    pub vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency per feature index
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_true")]
    pub stop_words: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

/// Options used when fitting a vectorizer
#[derive(Debug, Clone)]
pub struct TfidfOptions {
    pub tokenizer: Tokenizer,
    pub max_features: Option<usize>,
    pub sublinear_tf: bool,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            max_features: Some(20_000),
            sublinear_tf: true,
        }
    }
}

impl TfidfVectorizer {
    /// Fit vocabulary and smoothed idf weights on a corpus
    pub fn fit<S: AsRef<str>>(documents: &[S], options: &TfidfOptions) -> Self {
        let tokenizer = options.tokenizer;
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = tokenizer.terms(doc.as_ref());
            let mut seen = HashSet::new();
            for term in terms {
                *term_counts.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        let mut kept: Vec<(String, usize)> = term_counts.into_iter().collect();
        if let Some(limit) = options.max_features {
            // most frequent first, ties by term
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(limit);
        }

        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Self {
            vocabulary,
            idf,
            sublinear_tf: options.sublinear_tf,
            lowercase: tokenizer.lowercase,
            stop_words: tokenizer.remove_stop_words,
            ngram_range: tokenizer.ngram_range,
        }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer {
            lowercase: self.lowercase,
            remove_stop_words: self.stop_words,
            ngram_range: self.ngram_range,
        }
    }

    /// Number of features produced by `transform`
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Vectorize a document into an L2-normalized TF-IDF vector
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for term in self.tokenizer().terms(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .filter(|(index, _)| *index < self.idf.len())
            .map(|(index, count)| {
                let count = count as f64;
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                (index, tf * self.idf[index])
            })
            .collect();

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        SparseVector { entries }
    }
}
