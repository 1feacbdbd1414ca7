// ============================================================
// Layer 4 — IMDb Review Loader
// ============================================================
// Reads the extracted aclImdb directory tree.
//
// The corpus is laid out as:
//   aclImdb/
//     train/pos/*.txt   train/neg/*.txt
//     test/pos/*.txt    test/neg/*.txt
//
// The original train/test division is ignored: both halves are
// pooled and re-split later with the configured test fraction.
// Each non-blank line of a file is one review (IMDb files hold
// exactly one line). Files are decoded lossily, so a stray
// invalid byte never aborts the run.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::review::{Review, Sentiment};
use crate::domain::traits::ReviewSource;

/// Original corpus halves, both pooled into one labelled set
pub const SPLITS: [&str; 2] = ["train", "test"];

pub struct ImdbLoader {
    /// Path to the extracted `aclImdb` directory
    root: PathBuf,
}

impl ImdbLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every review of one polarity, train half first.
    pub fn load_sentiment(&self, sentiment: Sentiment) -> Result<Vec<Review>> {
        let mut reviews = Vec::new();
        for split in SPLITS {
            let dir = self.root.join(split).join(sentiment.dir_name());
            for path in text_files_in(&dir)? {
                reviews.extend(load_single_file(&path, sentiment)?);
            }
        }
        Ok(reviews)
    }
}

impl ReviewSource for ImdbLoader {
    fn load_all(&self) -> Result<Vec<Review>> {
        let mut reviews = self.load_sentiment(Sentiment::Positive)?;
        let positives   = reviews.len();
        reviews.extend(self.load_sentiment(Sentiment::Negative)?);

        tracing::info!(
            "Loaded {} reviews ({} positive, {} negative)",
            reviews.len(),
            positives,
            reviews.len() - positives,
        );
        Ok(reviews)
    }
}

/// Sorted `*.txt` files of a directory. A missing directory is an error.
fn text_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Review directory '{}' does not exist", dir.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            files.push(path);
        }
    }
    files.sort();

    tracing::debug!("Found {} review files in '{}'", files.len(), dir.display());
    Ok(files)
}

fn load_single_file(path: &Path, sentiment: Sentiment) -> Result<Vec<Review>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    let text  = String::from_utf8_lossy(&bytes);

    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Review::new(source.clone(), line, sentiment))
        .collect())
}
