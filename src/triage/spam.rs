/// Filler words that mark a submission as noise when they appear as a whole token
pub const FILLER_WORDS: &[&str] = &[
    "hi", "hello", "hey", "test", "ok", "hii", "nothing", "abcd", "asdf", "1234",
];

/// Shortest trimmed text accepted as a real complaint
pub const MIN_COMPLAINT_LEN: usize = 10;

/// Reject obvious spam and meaningless input.
///
/// True when any whitespace-delimited lowercase token is a filler word, or when
/// the trimmed text is shorter than [`MIN_COMPLAINT_LEN`] characters.
pub fn is_spam(text: &str) -> bool {
    let text = text.trim().to_lowercase();

    if text.split_whitespace().any(|word| FILLER_WORDS.contains(&word)) {
        return true;
    }

    text.chars().count() < MIN_COMPLAINT_LEN
}
