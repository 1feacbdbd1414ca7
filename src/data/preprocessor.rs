// ============================================================
// Layer 4 — Review Cleaner
// ============================================================
// Turns raw IMDb review text into a normalised token string.
//
// IMDb reviews carry HTML line breaks ("<br /><br />"), quotes,
// hyphenated words and trailing punctuation. None of that is
// useful to the vocabulary.
//
// Cleaning steps (applied in order):
//   1. Lowercase
//   2. Replace HTML line-break markers with a space
//   3. Replace word separators (- / \) with a space
//   4. Delete every other ASCII punctuation character
//   5. Split on whitespace, drop stopwords and empty tokens
//
// Example:
//   "Great movie!<br /><br />Loved it."  →  "great movie loved"
//
// Reference: Rust Book §8 (Strings in Rust)
//            regex crate documentation

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::stopwords;
use crate::domain::review::{LabeledText, Review};

/// `<br>`, `<br/>`, `<br />` and spaced variants
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*br\s*/?\s*>").expect("hardcoded regex is valid"));

/// Characters that join two words and become a space instead of vanishing
const WORD_SEPARATORS: [char; 3] = ['-', '/', '\\'];

pub struct Preprocessor {
    stopwords: HashSet<String>,
}

impl Preprocessor {
    /// Cleaner using the English stopword list
    pub fn new() -> Self {
        Self::with_stopwords(stopwords::ENGLISH.iter().copied())
    }

    /// Cleaner with a custom stopword set. Entries are lowercased.
    pub fn with_stopwords<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            stopwords: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Clean a raw review into a space-joined token string.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        // ── Steps 2-4: markup and punctuation ────────────────────────────────
        let no_breaks = LINE_BREAK.replace_all(&lowered, " ");
        let stripped: String = no_breaks
            .chars()
            .map(|c| if WORD_SEPARATORS.contains(&c) { ' ' } else { c })
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        // ── Step 5: stopwords ────────────────────────────────────────────────
        self.remove_stopwords(&stripped)
    }

    /// Drop stopwords and empty tokens, joining survivors with single spaces.
    pub fn remove_stopwords(&self, line: &str) -> String {
        line.split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !w.is_empty() && !self.is_stopword(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Clean every review, keeping its label.
    pub fn clean_all(&self, reviews: &[Review]) -> Vec<LabeledText> {
        reviews
            .iter()
            .map(|r| LabeledText::new(self.clean(&r.text), r.sentiment))
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::Sentiment;

    const TRICKY: &[&str] = &[
        "Great movie!<br /><br />Loved it.",
        "<br/>What a <BR />waste... of \"time\"; 2/10",
        "It's a well-made, thought-provoking film: 10/10!!!",
        "Tom & Jerry (1940) <br> [remastered] {cut} #1 @home 50% ~ok~ ^^ a+b=c |x| `y` $5 *wow*",
        "",
        "   \t\n  ",
        "<br /><br /><br />",
    ];

    #[test]
    fn test_end_to_end_examples() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("great movie loved it"), "great movie loved");
        assert_eq!(p.clean("terrible waste of time"), "terrible waste time");
    }

    #[test]
    fn test_strips_line_breaks_and_punctuation() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("Great movie!<br /><br />Loved it."), "great movie loved");
    }

    #[test]
    fn test_separators_split_words() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("well-made 2/10"), "well made 2 10");
    }

    #[test]
    fn test_apostrophes_are_removed_without_space() {
        let p = Preprocessor::new();
        // "it's" becomes "its", which is itself a stopword
        assert_eq!(p.clean("It's Spielberg's best"), "spielbergs best");
    }

    #[test]
    fn test_never_emits_markup_or_punctuation() {
        let p = Preprocessor::new();
        for input in TRICKY {
            let out = p.clean(input);
            assert!(!out.contains("<br />"), "markup survived in {out:?}");
            assert!(
                !out.chars().any(|c| c.is_ascii_punctuation()),
                "punctuation survived in {out:?}"
            );
        }
    }

    #[test]
    fn test_never_emits_stopwords_or_empty_tokens() {
        let p = Preprocessor::new();
        for input in TRICKY {
            let out = p.clean(input);
            if out.is_empty() {
                continue;
            }
            for token in out.split(' ') {
                assert!(!token.is_empty(), "empty token in {out:?}");
                assert!(!p.is_stopword(token), "stopword {token:?} in {out:?}");
            }
        }
    }

    #[test]
    fn test_remove_stopwords_lowercases_tokens() {
        let p = Preprocessor::new();
        assert_eq!(p.remove_stopwords("The  Movie IS  Fine"), "movie fine");
    }

    #[test]
    fn test_custom_stopwords() {
        let p = Preprocessor::with_stopwords(["Movie"]);
        assert_eq!(p.clean("the movie"), "the");
    }

    #[test]
    fn test_clean_all_keeps_labels() {
        let p = Preprocessor::new();
        let reviews = vec![
            Review::new("a.txt", "Loved it", Sentiment::Positive),
            Review::new("b.txt", "Hated it", Sentiment::Negative),
        ];
        let cleaned = p.clean_all(&reviews);
        assert_eq!(cleaned[0], LabeledText::new("loved", Sentiment::Positive));
        assert_eq!(cleaned[1], LabeledText::new("hated", Sentiment::Negative));
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
