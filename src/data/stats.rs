// ============================================================
// Layer 4 — Corpus Statistics
// ============================================================
// Word frequencies for the clouds, and the fixed length every
// review is padded or truncated to.
//
//   sequence_length = round(mean + 3 * std)
//
// over the per-review token counts, where std is the population
// standard deviation. Reviews longer than this are rare enough
// that truncating them loses little signal.

use anyhow::{bail, Result};
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthStats {
    pub mean: f64,
    pub std: f64,
    pub sequence_length: usize,
}

impl LengthStats {
    /// Compute statistics over raw token counts. Fails on an empty corpus.
    pub fn from_counts(counts: &[usize]) -> Result<Self> {
        if counts.is_empty() {
            bail!("Cannot compute sequence length of an empty corpus");
        }

        let n    = counts.len() as f64;
        let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / n;
        let var  = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std = var.sqrt();

        Ok(Self {
            mean,
            std,
            sequence_length: (mean + 3.0 * std).round() as usize,
        })
    }
}

/// The `limit` most frequent tokens across `texts`, most frequent first.
/// Ties are broken alphabetically.
pub fn word_frequencies<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for text in texts {
        for word in text.split_whitespace() {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: Vec<(String, usize)> =
        counts.into_iter().map(|(w, c)| (w.to_string(), c)).collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        // mean = 5, population std = 2 → 5 + 6 = 11
        let stats = LengthStats::from_counts(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.std, 2.0);
        assert_eq!(stats.sequence_length, 11);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // mean = 1.5, std = 0.5 → 3.0 exactly
        assert_eq!(LengthStats::from_counts(&[1, 2]).unwrap().sequence_length, 3);
        // mean = 2, std = sqrt(2/3) ≈ 0.8165 → 4.449 → 4
        assert_eq!(LengthStats::from_counts(&[1, 2, 3]).unwrap().sequence_length, 4);
    }

    #[test]
    fn test_order_independent() {
        let a = LengthStats::from_counts(&[3, 10, 1, 7, 7, 2]).unwrap();
        let b = LengthStats::from_counts(&[7, 2, 10, 7, 3, 1]).unwrap();
        assert_eq!(a.sequence_length, b.sequence_length);
        assert_relative_eq!(a.mean, b.mean);
        assert_relative_eq!(a.std, b.std, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_lengths() {
        let stats = LengthStats::from_counts(&[4, 4, 4]).unwrap();
        assert_relative_eq!(stats.std, 0.0);
        assert_eq!(stats.sequence_length, 4);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        assert!(LengthStats::from_counts(&[]).is_err());
    }

    #[test]
    fn test_word_frequencies() {
        let freq = word_frequencies(["good film good", "bad film good"], 2);
        assert_eq!(freq, vec![("good".to_string(), 3), ("film".to_string(), 2)]);
        assert!(word_frequencies(Vec::<&str>::new(), 5).is_empty());
    }
}
