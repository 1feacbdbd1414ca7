// ============================================================
// Layer 6 — Pretrained Embedding Store
// ============================================================
// Builds the embedding matrix from a GloVe-style text file:
//
//   <token> <f_1> <f_2> ... <f_dim>
//
// one vector per line, whitespace-delimited. The file is streamed
// and only vectors for words in the vocabulary are kept, so the
// full table (1.2M rows for glove.twitter.27B) is never resident.
//
// Matrix layout:
//   row 0           → padding, always zero
//   row i (i ≥ 1)   → vector of vocabulary word i, or zero if the
//                     file has no vector for that word
//
// Reference: GloVe project file format
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use crate::data::vocabulary::Vocabulary;

/// Unmatched words listed in the debug log
const MISSING_SHOWN: usize = 20;

/// Dense `rows × dim` matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    pub rows:    usize,
    pub dim:     usize,
    pub values:  Vec<f32>,
    /// Vocabulary words that received a pretrained vector
    pub matched: usize,
}

impl EmbeddingMatrix {
    pub fn zeros(rows: usize, dim: usize) -> Self {
        Self { rows, dim, values: vec![0.0; rows * dim], matched: 0 }
    }

    #[cfg(test)]
    pub fn row(&self, index: usize) -> &[f32] {
        &self.values[index * self.dim..(index + 1) * self.dim]
    }

    fn set_row(&mut self, index: usize, vector: &[f32]) {
        self.values[index * self.dim..(index + 1) * self.dim].copy_from_slice(vector);
    }

    /// Fraction of vocabulary words (excluding padding) with a vector
    pub fn coverage(&self) -> f64 {
        let words = self.rows.saturating_sub(1);
        if words == 0 { 0.0 } else { self.matched as f64 / words as f64 }
    }
}

pub struct EmbeddingStore {
    path: PathBuf,
    dim:  usize,
}

impl EmbeddingStore {
    pub fn new(path: impl Into<PathBuf>, dim: usize) -> Self {
        Self { path: path.into(), dim }
    }

    /// Stream the vector file and fill one row per vocabulary word.
    pub fn build_matrix(&self, vocab: &Vocabulary) -> Result<EmbeddingMatrix> {
        let file = File::open(&self.path).with_context(|| {
            format!("Cannot open embedding file '{}'", self.path.display())
        })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        let progress = ProgressBar::new(size).with_style(ProgressStyle::with_template(
            "{prefix}: {bar:40} {bytes:>10}/{total_bytes:10} [{eta_precise}]",
        )?);
        let progress = progress.with_prefix("embeddings");

        let mut reader = BufReader::new(progress.wrap_read(file));
        let mut matrix = EmbeddingMatrix::zeros(vocab.len(), self.dim);
        let mut filled = vec![false; vocab.len()];
        let mut vector = Vec::with_capacity(self.dim);
        let mut buf    = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Cannot read '{}'", self.path.display()))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };

            // Skip parsing vectors nobody asked for
            let Some(index) = vocab.index_of(word) else { continue };

            vector.clear();
            for part in parts {
                let value: f32 = part.parse().with_context(|| {
                    format!("Line {line_no}: invalid component '{part}' for '{word}'")
                })?;
                vector.push(value);
            }
            if vector.len() != self.dim {
                bail!(
                    "Line {line_no}: '{word}' has {} components, expected {}",
                    vector.len(),
                    self.dim
                );
            }

            // The first vector for a word wins if the file repeats it
            if !filled[index as usize] {
                filled[index as usize] = true;
                matrix.set_row(index as usize, &vector);
                matrix.matched += 1;
            }
        }
        progress.finish();

        let missing: Vec<&str> = vocab
            .iter()
            .filter(|&(_, index)| !filled[index as usize])
            .map(|(word, _)| word)
            .take(MISSING_SHOWN)
            .collect();
        if !missing.is_empty() {
            tracing::debug!("Frequent words without a vector: {}", missing.join(", "));
        }

        tracing::info!(
            "Embedding matrix: {} x {}, {} words matched ({:.1}%)",
            matrix.rows,
            matrix.dim,
            matrix.matched,
            matrix.coverage() * 100.0,
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn vector_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("imdb-glove-{name}-{}.txt", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_rows_follow_vocabulary() {
        let path  = vector_file("rows", "movie 0.1 0.2 0.3\nthe 9 9 9\n\ngreat -1 0 1.5\n");
        let vocab = Vocabulary::fit(["great movie loved"]);
        let m     = EmbeddingStore::new(&path, 3).build_matrix(&vocab).unwrap();

        assert_eq!(m.rows, 4);
        assert_eq!(m.matched, 2);
        assert_eq!(m.row(0), &[0.0, 0.0, 0.0]);
        assert_eq!(m.row(vocab.index_of("great").unwrap() as usize), &[-1.0, 0.0, 1.5]);
        assert_eq!(m.row(vocab.index_of("movie").unwrap() as usize), &[0.1, 0.2, 0.3]);
        assert_eq!(m.row(vocab.index_of("loved").unwrap() as usize), &[0.0, 0.0, 0.0]);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_first_vector_for_repeated_word_wins() {
        let path  = vector_file("repeat", "great 1 1 1\ngreat 2 2 2\n");
        let vocab = Vocabulary::fit(["great"]);
        let m     = EmbeddingStore::new(&path, 3).build_matrix(&vocab).unwrap();

        assert_eq!(m.matched, 1);
        assert_eq!(m.row(1), &[1.0, 1.0, 1.0]);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_wrong_dimension_is_error() {
        let path  = vector_file("dim", "great 1 2\n");
        let vocab = Vocabulary::fit(["great"]);
        let err   = EmbeddingStore::new(&path, 3).build_matrix(&vocab).unwrap_err();
        assert!(err.to_string().contains("Line 1"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unparsable_component_is_error() {
        let path  = vector_file("nan", "great 1 x 3\n");
        let vocab = Vocabulary::fit(["great"]);
        assert!(EmbeddingStore::new(&path, 3).build_matrix(&vocab).is_err());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_error() {
        let vocab = Vocabulary::fit(["great"]);
        let store = EmbeddingStore::new("/nonexistent/glove.txt", 3);
        assert!(store.build_matrix(&vocab).is_err());
    }

    #[test]
    fn test_coverage() {
        let mut m = EmbeddingMatrix::zeros(5, 2);
        m.matched = 2;
        assert!((m.coverage() - 0.5).abs() < 1e-12);
    }
}
