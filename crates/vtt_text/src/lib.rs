//! # vtt_text
//!
//! Extracts plain subtitle text from WebVTT caption files. Timestamp lines,
//! header/metadata lines, numeric cue identifiers and inline cue tags are
//! dropped; cue text survives, with one blank line kept between cue blocks so
//! downstream paragraph-level processing has real boundaries to work with.

use std::sync::LazyLock;

use regex::Regex;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    // "00:01:02.500 --> 00:01:05.000" with optional cue settings, and the
    // short "01:02.500 --> 01:05.000" form some generators emit
    Regex::new(r"^(\d+:)?\d+:\d+\.\d+\s*-->").unwrap()
});

static CUE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // inline tags: <c>, </c>, <00:00:01.240>, <v Speaker> etc.
    Regex::new(r"<[^>]*>").unwrap()
});

fn is_metadata_line(line: &str) -> bool {
    line.starts_with("WEBVTT")
        || line.starts_with("NOTE")
        || line.starts_with("STYLE")
        || line.starts_with("REGION")
        || line.starts_with("Kind:")
        || line.starts_with("Language:")
}

/// Converts WebVTT content to plain subtitle text.
///
/// Cue blocks are separated by a single blank line in the output. Returns an
/// empty string when the file carries no cue text at all.
pub fn vtt_to_text(vtt_content: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in vtt_content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        if is_metadata_line(line) || TIMESTAMP_RE.is_match(line) {
            continue;
        }
        // bare numeric cue identifiers
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let text = CUE_TAG_RE.replace_all(line, "");
        let text = text.trim();
        if !text.is_empty() {
            current.push(text.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_header_and_timestamps() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:00.000 --> 00:00:02.000\nHello there\n\n00:00:02.000 --> 00:00:04.000\nGeneral Kenobi\n";
        let text = vtt_to_text(vtt);
        assert_eq!(text, "Hello there\n\nGeneral Kenobi");
    }

    #[test]
    fn test_strips_numeric_cue_identifiers() {
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nfirst line\n\n2\n00:00:02.000 --> 00:00:04.000\nsecond line\n";
        let text = vtt_to_text(vtt);
        assert_eq!(text, "first line\n\nsecond line");
    }

    #[test]
    fn test_strips_inline_cue_tags() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\n<v Narrator>so<00:00:00.240><c> it</c><00:00:00.480><c> begins</c>\n";
        let text = vtt_to_text(vtt);
        assert_eq!(text, "so it begins");
    }

    #[test]
    fn test_timestamp_with_cue_settings() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000 align:start position:0%\ncue text\n";
        assert_eq!(vtt_to_text(vtt), "cue text");
    }

    #[test]
    fn test_multi_line_cue_stays_one_block() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nline one\nline two\n\n00:00:02.000 --> 00:00:04.000\nline three\n";
        assert_eq!(vtt_to_text(vtt), "line one\nline two\n\nline three");
    }

    #[test]
    fn test_empty_and_metadata_only_input() {
        assert_eq!(vtt_to_text(""), "");
        assert_eq!(vtt_to_text("WEBVTT\nNOTE generated\n"), "");
    }

    #[test]
    fn test_japanese_cue_text() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nこんにちは世界\n";
        assert_eq!(vtt_to_text(vtt), "こんにちは世界");
    }
}
