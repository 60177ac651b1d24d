use crate::models::complaint::Priority;

const HIGH_KEYWORDS: &[&str] = &["no", "overflow", "danger"];
const MEDIUM_KEYWORDS: &[&str] = &["delay", "problem"];

/// Assign an urgency tag by substring match on the lowercased text.
///
/// Matching is not word-aware: "piano" contains "no" and is High.
pub fn assign_priority(text: &str) -> Priority {
    let text = text.to_lowercase();

    if HIGH_KEYWORDS.iter().any(|k| text.contains(k)) {
        Priority::High
    } else if MEDIUM_KEYWORDS.iter().any(|k| text.contains(k)) {
        Priority::Medium
    } else {
        Priority::Low
    }
}
