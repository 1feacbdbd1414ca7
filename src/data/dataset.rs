use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::vocabulary::Vocabulary;
use crate::domain::review::LabeledText;

/// One encoded review: padded token indices and its 0/1 label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSample {
    pub tokens: Vec<u32>,
    pub label:  u8,
}

impl ReviewSample {
    pub fn encode(text: &LabeledText, vocab: &Vocabulary, seq_len: usize) -> Self {
        Self {
            tokens: vocab.encode(&text.text, seq_len),
            label:  text.sentiment.as_label(),
        }
    }
}

pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    /// Encode cleaned texts against a frozen vocabulary
    pub fn encode(texts: &[LabeledText], vocab: &Vocabulary, seq_len: usize) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| ReviewSample::encode(t, vocab, seq_len))
                .collect(),
        )
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn positive_count(&self) -> usize {
        self.samples.iter().filter(|s| s.label == 1).count()
    }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::Sentiment;

    #[test]
    fn test_encode_end_to_end_pair() {
        let texts = vec![
            LabeledText::new("great movie loved", Sentiment::Positive),
            LabeledText::new("terrible waste time", Sentiment::Negative),
        ];
        let vocab   = Vocabulary::fit(texts.iter().map(|t| t.text.as_str()));
        let dataset = ReviewDataset::encode(&texts, &vocab, 5);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.positive_count(), 1);

        let first = dataset.get(0).unwrap();
        assert_eq!(first.tokens, vec![1, 2, 3, 0, 0]);
        assert_eq!(first.label, 1);

        let second = dataset.get(1).unwrap();
        assert_eq!(second.tokens, vec![4, 5, 6, 0, 0]);
        assert_eq!(second.label, 0);

        assert!(dataset.get(2).is_none());
    }
}
