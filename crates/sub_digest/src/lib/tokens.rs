//! Heuristic token estimation.
//!
//! Sizing decisions across the pipeline (chunk budgets, the rate-limiter
//! window, the prompt safety ceiling) all run on this estimate. It is a cheap
//! approximation, not a tokenizer: CJK ideographs count roughly two tokens
//! each, everything else is treated as whitespace-delimited English words at
//! roughly 1.3 tokens per word.

/// Estimates the token count of `text`.
///
/// The word count is derived as whitespace-token count minus the CJK
/// character count, clamped at zero — for pure-CJK text the whitespace split
/// sees one giant "word", and the clamp keeps the estimate non-negative.
pub fn estimate_tokens(text: &str) -> f64 {
    let jp_chars = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count();
    let en_words = (text.split_whitespace().count() as i64 - jp_chars as i64).max(0);

    (jp_chars as f64) * 2.0 + (en_words as f64) * 1.3
}
