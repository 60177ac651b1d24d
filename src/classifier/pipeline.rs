// TF-IDF vectorizer feeding a multinomial Naive Bayes model.
//
// The artifact is plain JSON so it can be produced by any trainer that emits
// the same fields; `Pipeline::fit` is the in-crate trainer.

use crate::core::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Sparse document vector: (feature index, weight), sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Split text into lowercase terms of two or more word characters
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term -> feature index
    pub vocabulary: BTreeMap<String, usize>,
    /// inverse document frequency per feature index
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Term counts scaled by idf, then L2-normalised. Out-of-vocabulary terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf.get(index).copied().unwrap_or(0.0)))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in vector.iter_mut() {
                *weight /= norm;
            }
        }

        vector
    }

    fn fit(documents: &[Vec<String>]) -> Self {
        let terms: BTreeSet<&str> = documents
            .iter()
            .flat_map(|doc| doc.iter().map(String::as_str))
            .collect();

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc in documents {
            let seen: BTreeSet<usize> = doc.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for index in seen {
                document_frequency[index] += 1;
            }
        }

        // smoothed idf: as if one extra document contained every term once
        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// class labels, sorted
    pub classes: Vec<String>,
    pub class_log_prior: Vec<f64>,
    /// `[class][feature]` log P(feature | class)
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Index of the highest scoring class. Ties go to the earlier class.
    pub fn predict_index(&self, features: &SparseVector) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (class, (prior, log_probs)) in self
            .class_log_prior
            .iter()
            .zip(self.feature_log_prob.iter())
            .enumerate()
        {
            let score = prior
                + features
                    .iter()
                    .map(|&(index, weight)| weight * log_probs.get(index).copied().unwrap_or(0.0))
                    .sum::<f64>();

            if score > best_score {
                best = class;
                best_score = score;
            }
        }

        best
    }
}

/// The serialized category model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub vectorizer: TfidfVectorizer,
    pub classifier: MultinomialNb,
}

impl Pipeline {
    /// Load and sanity-check an artifact
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let pipeline: Pipeline = serde_json::from_str(&content)?;
        pipeline.check()?;

        info!(
            path = %path.display(),
            classes = pipeline.classifier.classes.len(),
            vocabulary_size = pipeline.vectorizer.n_features(),
            "Category model loaded"
        );

        Ok(pipeline)
    }

    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ClassifierError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Train on `(text, label)` pairs. `alpha` is the additive smoothing term.
    pub fn fit<'a, I>(samples: I, alpha: f64) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        if alpha.is_nan() || alpha <= 0.0 {
            return Err(ClassifierError::Inconsistent(format!(
                "smoothing alpha must be positive, got {}",
                alpha
            )));
        }

        let (documents, labels): (Vec<Vec<String>>, Vec<&str>) = samples
            .into_iter()
            .map(|(text, label)| (tokenize(text).collect(), label))
            .unzip();

        if documents.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let vectorizer = TfidfVectorizer::fit(&documents);
        if vectorizer.n_features() == 0 {
            return Err(ClassifierError::Inconsistent(
                "training samples contain no usable terms".to_string(),
            ));
        }

        let classes: Vec<String> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let n_features = vectorizer.n_features();
        let mut class_count = vec![0.0f64; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];

        for (doc, label) in documents.iter().zip(labels.iter()) {
            let Ok(class) = classes.binary_search_by(|c| c.as_str().cmp(*label)) else {
                continue;
            };
            class_count[class] += 1.0;

            for (index, weight) in vectorizer.transform(&doc.join(" ")) {
                feature_count[class][index] += weight;
            }
        }

        let total = documents.len() as f64;
        let class_log_prior = class_count.iter().map(|count| (count / total).ln()).collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
                counts
                    .into_iter()
                    .map(|count| (count + alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        Ok(Self {
            vectorizer,
            classifier: MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            },
        })
    }

    pub fn predict(&self, text: &str) -> &str {
        let features = self.vectorizer.transform(text);
        let index = self.classifier.predict_index(&features);
        self.classifier
            .classes
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), ClassifierError> {
        let n_features = self.vectorizer.n_features();
        let classes = self.classifier.classes.len();

        if classes == 0 {
            return Err(ClassifierError::Inconsistent("model has no classes".to_string()));
        }

        if self.vectorizer.vocabulary.len() != n_features {
            return Err(ClassifierError::Inconsistent(format!(
                "vocabulary has {} terms but idf has {} weights",
                self.vectorizer.vocabulary.len(),
                n_features
            )));
        }

        if let Some((term, index)) = self.vectorizer.vocabulary.iter().find(|(_, index)| **index >= n_features) {
            return Err(ClassifierError::Inconsistent(format!(
                "term '{}' maps to feature {} outside 0..{}",
                term, index, n_features
            )));
        }

        if self.classifier.class_log_prior.len() != classes
            || self.classifier.feature_log_prob.len() != classes
        {
            return Err(ClassifierError::Inconsistent(format!(
                "expected per-class parameters for {} classes",
                classes
            )));
        }

        if self.classifier.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(ClassifierError::Inconsistent(format!(
                "feature_log_prob rows must have {} entries",
                n_features
            )));
        }

        Ok(())
    }
}
