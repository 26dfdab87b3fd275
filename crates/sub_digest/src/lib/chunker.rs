//! Token-aware subtitle splitting.
//!
//! [`split`] cuts a text into ordered chunks that each fit a token budget,
//! degrading through three granularities: whole paragraphs, then sentences
//! within an oversized paragraph, then comma-separated clauses within an
//! oversized sentence. A clause that still exceeds the budget has no further
//! delimiter to split on and is emitted verbatim as its own chunk — content
//! is never dropped or truncated.

use crate::tokens::estimate_tokens;

/// Default per-chunk token budget for library use.
pub const CHUNK_BUDGET_DEFAULT: usize = 2000;

/// Per-chunk token budget used when splitting a full subtitle track.
pub const CHUNK_BUDGET_TOP_LEVEL: usize = 3000;

/// Safety ceiling on the estimated token size of a single prompt.
pub const PROMPT_TOKEN_CEILING: usize = 150_000;

/// Terminal punctuation ending a sentence (Japanese and Western).
const SENTENCE_DELIMITERS: &[char] = &['。', '．', '！', '？', '!', '?'];

/// Comma-class delimiters separating clauses.
const CLAUSE_DELIMITERS: &[char] = &['、', ',', '，'];

/// Splits `text` into chunks whose estimated token size is at most
/// `max_tokens`, except for single irreducible clauses.
///
/// Blank-only input yields no chunks. Whitespace-only lines act as paragraph
/// separators and never become chunk content.
pub fn split(text: &str, max_tokens: usize) -> Vec<String> {
    let budget = max_tokens as f64;
    let mut chunks = Vec::new();
    let mut kept: Vec<String> = Vec::new();
    let mut kept_tokens = 0.0;

    for paragraph in paragraphs(text) {
        let size = estimate_tokens(&paragraph);
        if size > budget {
            flush(&mut chunks, &mut kept, "\n");
            kept_tokens = 0.0;
            split_sentences(&paragraph, budget, &mut chunks);
            continue;
        }
        if kept_tokens + size > budget {
            flush(&mut chunks, &mut kept, "\n");
            kept_tokens = 0.0;
        }
        kept_tokens += size;
        kept.push(paragraph);
    }
    flush(&mut chunks, &mut kept, "\n");

    chunks
}

/// Groups non-blank lines into paragraphs at blank-line boundaries, joining
/// the lines of a paragraph with single spaces.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !lines.is_empty() {
                out.push(lines.join(" "));
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        out.push(lines.join(" "));
    }
    out
}

fn split_sentences(paragraph: &str, budget: f64, chunks: &mut Vec<String>) {
    let mut kept: Vec<String> = Vec::new();
    let mut kept_tokens = 0.0;

    for sentence in paragraph.split(SENTENCE_DELIMITERS) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let size = estimate_tokens(sentence);
        if size > budget {
            flush(chunks, &mut kept, " ");
            kept_tokens = 0.0;
            split_clauses(sentence, budget, chunks);
            continue;
        }
        if kept_tokens + size > budget {
            flush(chunks, &mut kept, " ");
            kept_tokens = 0.0;
        }
        kept_tokens += size;
        kept.push(sentence.to_string());
    }
    flush(chunks, &mut kept, " ");
}

fn split_clauses(sentence: &str, budget: f64, chunks: &mut Vec<String>) {
    let mut kept: Vec<String> = Vec::new();
    let mut kept_tokens = 0.0;

    for clause in sentence.split(CLAUSE_DELIMITERS) {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        let size = estimate_tokens(clause);
        if size > budget {
            // irreducible unit: no further delimiter to split on
            flush(chunks, &mut kept, " ");
            kept_tokens = 0.0;
            chunks.push(clause.to_string());
            continue;
        }
        if kept_tokens + size > budget {
            flush(chunks, &mut kept, " ");
            kept_tokens = 0.0;
        }
        kept_tokens += size;
        kept.push(clause.to_string());
    }
    flush(chunks, &mut kept, " ");
}

fn flush(chunks: &mut Vec<String>, kept: &mut Vec<String>, joiner: &str) {
    if !kept.is_empty() {
        chunks.push(kept.join(joiner));
        kept.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strips whitespace and every delimiter the splitter may consume or
    /// insert, leaving only content characters for loss comparison.
    fn content_only(text: &str) -> String {
        text.chars()
            .filter(|c| {
                !c.is_whitespace()
                    && !SENTENCE_DELIMITERS.contains(c)
                    && !CLAUSE_DELIMITERS.contains(c)
            })
            .collect()
    }

    #[test]
    fn test_blank_input_yields_no_chunks() {
        assert!(split("", 100).is_empty());
        assert!(split("\n\n   \n\t\n", 100).is_empty());
    }

    #[test]
    fn test_single_small_paragraph_is_one_chunk() {
        let text = "just a short line of subtitles";
        let chunks = split(text, 100);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_paragraphs_accumulate_under_budget() {
        // each paragraph ~4 words (5.2 tokens); budget fits two but not three
        let text = "one two three four\n\nfive six seven eight\n\nnine ten eleven twelve";
        let chunks = split(text, 11);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "one two three four\nfive six seven eight");
        assert_eq!(chunks[1], "nine ten eleven twelve");
    }

    #[test]
    fn test_whitespace_only_lines_separate_paragraphs() {
        let text = "first paragraph line\n   \t\nsecond paragraph line";
        let chunks = split(text, 4);
        assert_eq!(
            chunks,
            vec![
                "first paragraph line".to_string(),
                "second paragraph line".to_string()
            ]
        );
    }

    #[test]
    fn test_oversized_paragraph_falls_back_to_sentences() {
        // one paragraph, way over budget, but each sentence fits
        let text = "alpha beta gamma delta epsilon. zeta eta theta iota kappa. lambda mu nu xi omicron.";
        let budget = 8; // a sentence is 5 words = 6.5 tokens
        let chunks = split(text, budget);
        assert!(chunks.len() >= 2, "expected sentence-level split, got {chunks:?}");
        for chunk in &chunks {
            assert!(
                estimate_tokens(chunk) <= budget as f64,
                "chunk over budget: {chunk:?}"
            );
        }
    }

    #[test]
    fn test_japanese_sentence_delimiters() {
        let text = "これは長い文章です。もう一つの文章です。さらに続きます。";
        let chunks = split(text, 10);
        assert!(chunks.len() >= 2, "got {chunks:?}");
    }

    #[test]
    fn test_oversized_sentence_falls_back_to_clauses() {
        let text = "one two three four five, six seven eight nine ten, eleven twelve thirteen fourteen fifteen";
        let budget = 7; // a clause is 5 words = 6.5 tokens, the sentence is 19.5
        let chunks = split(text, budget);
        assert!(chunks.len() >= 3, "expected clause-level split, got {chunks:?}");
        for chunk in &chunks {
            assert!(estimate_tokens(chunk) <= budget as f64);
        }
    }

    #[test]
    fn test_irreducible_clause_emitted_verbatim() {
        // a single run of words with no sentence or clause delimiters at all
        let big = "word ".repeat(40);
        let big = big.trim().to_string();
        let chunks = split(&big, 10);
        assert_eq!(chunks, vec![big.clone()]);
        // and the oversized chunk is indeed unsplittable at clause level
        assert_eq!(chunks[0].split(CLAUSE_DELIMITERS).count(), 1);
    }

    #[test]
    fn test_no_content_loss_across_levels() {
        let inputs = [
            "plain paragraph one\n\nplain paragraph two",
            "a big paragraph. with sentences! and, clauses, inside? plus 日本語の文も、あります。",
            "one two three four five, six seven eight nine ten, eleven twelve",
            "line one\nline two\n\n\nline three",
        ];
        for input in inputs {
            for budget in [3, 8, 50, 10_000] {
                let chunks = split(input, budget);
                assert_eq!(
                    content_only(&chunks.join("")),
                    content_only(input),
                    "content lost for budget {budget} on {input:?}"
                );
            }
        }
    }

    #[test]
    fn test_chunks_fit_budget_or_are_irreducible() {
        let text = "sentence one here. sentence two follows, with a clause, and another. \
                    短い文。とても長い日本語の文章がここにあります、読点で区切られて、さらに続きます。";
        let budget = 10;
        for chunk in split(text, budget) {
            if estimate_tokens(&chunk) > budget as f64 {
                assert_eq!(
                    chunk.split(CLAUSE_DELIMITERS).count(),
                    1,
                    "oversized chunk is splittable: {chunk:?}"
                );
            }
        }
    }
}
