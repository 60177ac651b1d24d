pub mod pipeline;

pub use pipeline::Pipeline;

/// Category model seam. Handlers only see this trait so tests can swap in a fixed label.
pub trait TextClassifier: Send + Sync {
    /// Label for text already passed through [`clean_text`]
    fn predict(&self, cleaned_text: &str) -> String;
}

impl TextClassifier for Pipeline {
    fn predict(&self, cleaned_text: &str) -> String {
        Pipeline::predict(self, cleaned_text).to_string()
    }
}

/// Lowercase, then keep only ASCII letters and whitespace
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect()
}

/// Category for a raw complaint body
pub fn categorize(classifier: &dyn TextClassifier, text: &str) -> String {
    classifier.predict(&clean_text(text))
}
