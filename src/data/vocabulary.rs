// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Maps cleaned tokens to integer indices.
//
//   index 0        → reserved for padding, never assigned to a word
//   index 1..=N    → words, most frequent first
//
// Ties in frequency keep the order in which the words were first
// seen, so fitting the same texts twice gives the same indices.
//
// The vocabulary is fitted once on the training texts and frozen.
// Words seen only in the test split are dropped when encoding.
//
// Encoding a review:
//   "great movie loved"  →  [4, 1, 7]  →  pad to 5  →  [4, 1, 7, 0, 0]
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::HashMap;

pub const PAD_INDEX: u32 = 0;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index:  HashMap<String, u32>,
    /// words[i - 1] is the word at index i
    words:  Vec<String>,
}

impl Vocabulary {
    /// Build the vocabulary from an iterator of cleaned texts.
    pub fn fit<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        // (count, first-seen position) per word
        let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
        for text in texts {
            for word in text.split_whitespace() {
                let next = counts.len();
                counts.entry(word).or_insert((0, next)).0 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> =
            counts.into_iter().map(|(w, (c, first))| (w, c, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let words: Vec<String> = ranked.into_iter().map(|(w, _, _)| w.to_string()).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32 + 1))
            .collect();

        tracing::debug!("Vocabulary fitted with {} words", words.len());
        Self { index, words }
    }

    /// Number of rows the embedding matrix needs: distinct words + padding
    pub fn len(&self) -> usize {
        self.words.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index_of(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    /// (word, index) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i as u32 + 1))
    }

    /// Token indices for a text, skipping unknown words.
    pub fn texts_to_sequence(&self, text: &str) -> Vec<u32> {
        text.split_whitespace()
            .filter_map(|w| self.index_of(w))
            .collect()
    }

    /// Encode and pad a text to exactly `len` indices.
    pub fn encode(&self, text: &str, len: usize) -> Vec<u32> {
        pad(self.texts_to_sequence(text), len)
    }
}

/// Left-align a sequence in a buffer of exactly `len` entries:
/// zero-padded on the right when shorter. When longer, the leading
/// tokens are dropped and the last `len` kept.
pub fn pad(mut sequence: Vec<u32>, len: usize) -> Vec<u32> {
    if sequence.len() > len {
        sequence.drain(..sequence.len() - len);
    }
    sequence.resize(len, PAD_INDEX);
    sequence
}
