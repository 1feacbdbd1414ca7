// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A Review is one line of text from the IMDb corpus together
// with the polarity of the directory it was found in:
//
//   aclImdb/train/pos/123_9.txt  → Sentiment::Positive (1)
//   aclImdb/test/neg/456_2.txt   → Sentiment::Negative (0)
//
// Reviews are never mutated. Cleaning produces a LabeledText,
// which is the unit the rest of the pipeline splits and batches.

use serde::{Deserialize, Serialize};

/// Binary sentiment label. Positive encodes as 1, negative as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Numeric class used as the training target
    pub fn as_label(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    /// Map a predicted probability of the positive class to a label
    pub fn from_probability(p: f32) -> Self {
        if p >= 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    /// Name of the corpus sub-directory holding reviews of this polarity
    pub fn dir_name(self) -> &'static str {
        match self {
            Sentiment::Negative => "neg",
            Sentiment::Positive => "pos",
        }
    }
}

/// A raw review as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// File the review was read from, kept for traceability
    pub source: String,

    /// Raw review text before any cleaning
    pub text: String,

    pub sentiment: Sentiment,
}

impl Review {
    pub fn new(source: impl Into<String>, text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            sentiment,
        }
    }
}

/// Cleaned review text paired with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text: String,
    pub sentiment: Sentiment,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
        }
    }

    /// Number of whitespace-delimited tokens in the cleaned text
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Sentiment::Positive.as_label(), 1);
        assert_eq!(Sentiment::Negative.as_label(), 0);
    }

    #[test]
    fn test_probability_threshold() {
        assert_eq!(Sentiment::from_probability(0.5), Sentiment::Positive);
        assert_eq!(Sentiment::from_probability(0.49), Sentiment::Negative);
    }

    #[test]
    fn test_token_count_ignores_extra_whitespace() {
        let t = LabeledText::new("  great   movie ", Sentiment::Positive);
        assert_eq!(t.token_count(), 2);
        assert_eq!(LabeledText::new("", Sentiment::Negative).token_count(), 0);
    }
}
