// ============================================================
// Layer 4 — Corpus Acquisition
// ============================================================
// Downloads and extracts the Large Movie Review Dataset.
//
//   aclImdb_v1.tar.gz  (≈ 80 MB, gzip-compressed tar)
//       │  HTTP GET, streamed
//       ▼
//   GzDecoder → tar::Archive
//       │  entries under aclImdb/train/unsup/ skipped
//       ▼
//   <data_dir>/aclImdb/{train,test}/{pos,neg}/*.txt
//
// The archive is never written to disk; it is decoded while it
// downloads, into a staging directory that is renamed to aclImdb
// only once the whole stream decoded cleanly. If the corpus is
// already extracted nothing happens.
//
// Reference: reqwest blocking client, flate2 and tar documentation

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

pub const IMDB_URL: &str = "https://ai.stanford.edu/~amaas/data/sentiment/aclImdb_v1.tar.gz";

/// Top-level directory inside the archive
pub const CORPUS_DIR: &str = "aclImdb";

/// Unlabelled reviews, useless for supervised training
const UNSUP_PREFIX: &str = "aclImdb/train/unsup";

/// Extraction target until the archive has been fully decoded
const STAGING_DIR: &str = ".aclImdb.partial";

pub struct CorpusFetcher {
    url:      String,
    data_dir: PathBuf,
}

impl CorpusFetcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_url(IMDB_URL, data_dir)
    }

    pub fn with_url(url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self { url: url.into(), data_dir: data_dir.into() }
    }

    /// Path of the extracted corpus root
    pub fn corpus_root(&self) -> PathBuf {
        self.data_dir.join(CORPUS_DIR)
    }

    pub fn is_extracted(&self) -> bool {
        let root = self.corpus_root();
        ["train/pos", "train/neg", "test/pos", "test/neg"]
            .iter()
            .all(|d| root.join(d).is_dir())
    }

    /// Download and extract the corpus unless it is already present.
    pub fn ensure(&self) -> Result<PathBuf> {
        if self.is_extracted() {
            tracing::info!("Corpus already present at '{}'", self.corpus_root().display());
            return Ok(self.corpus_root());
        }

        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Cannot create '{}'", self.data_dir.display()))?;

        tracing::info!("Downloading corpus from {}", self.url);
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .context("Cannot build HTTP client")?;
        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("Request to '{}' failed", self.url))?;

        if !response.status().is_success() {
            bail!("Download of '{}' failed with status {}", self.url, response.status());
        }

        let progress = ProgressBar::new(response.content_length().unwrap_or(0)).with_style(
            ProgressStyle::with_template(
                "{prefix}: {bar:40} {bytes:>10}/{total_bytes:10} [{eta_precise}]",
            )?,
        );
        let progress = progress.with_prefix("aclImdb");

        let extracted = self.install_archive(progress.wrap_read(response))?;
        progress.finish();

        tracing::info!("Extracted {} files into '{}'", extracted, self.data_dir.display());
        Ok(self.corpus_root())
    }

    /// Extract an archive stream into the staging directory, then move
    /// the corpus into place. On error nothing lands in `aclImdb`.
    pub fn install_archive<R: Read>(&self, reader: R) -> Result<usize> {
        let staging = self.data_dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Cannot clear '{}'", staging.display()))?;
        }
        fs::create_dir_all(&staging)
            .with_context(|| format!("Cannot create '{}'", staging.display()))?;

        let extracted = extract_archive(reader, &staging).context("Corpus archive is incomplete")?;

        let staged_root = staging.join(CORPUS_DIR);
        if !staged_root.is_dir() {
            bail!("Archive has no '{}' directory", CORPUS_DIR);
        }

        let root = self.corpus_root();
        if root.exists() {
            tracing::warn!("Replacing incomplete corpus at '{}'", root.display());
            fs::remove_dir_all(&root)
                .with_context(|| format!("Cannot remove '{}'", root.display()))?;
        }
        fs::rename(&staged_root, &root).with_context(|| {
            format!("Cannot move '{}' to '{}'", staged_root.display(), root.display())
        })?;
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Cannot remove '{}'", staging.display()))?;

        Ok(extracted)
    }
}

/// Unpack a gzip-compressed tar stream into `dest`, skipping the
/// unlabelled reviews. Returns the number of files written.
pub fn extract_archive<R: Read>(reader: R, dest: &Path) -> Result<usize> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let mut written = 0usize;

    for entry in archive.entries().context("Cannot read archive entries")? {
        let mut entry = entry.context("Corrupt archive entry")?;
        let path      = entry.path()?.into_owned();

        if path.starts_with(UNSUP_PREFIX) {
            continue;
        }

        let is_file = entry.header().entry_type().is_file();
        entry
            .unpack_in(dest)
            .with_context(|| format!("Cannot extract '{}'", path.display()))?;
        if is_file {
            written += 1;
        }
    }

    // Tar stops at its end marker; read on so gzip verifies its trailer
    io::copy(&mut archive.into_inner(), &mut io::sink())
        .context("Cannot read archive trailer")?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};

    fn archive_with(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, body) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, body.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extract_skips_unsup() {
        let dest = std::env::temp_dir().join(format!("imdb-extract-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dest);
        fs::create_dir_all(&dest).unwrap();

        let bytes = archive_with(&[
            ("aclImdb/train/pos/0_9.txt", "good"),
            ("aclImdb/train/neg/1_1.txt", "bad"),
            ("aclImdb/test/pos/2_8.txt", "fine"),
            ("aclImdb/test/neg/3_3.txt", "meh"),
            ("aclImdb/train/unsup/4_0.txt", "unlabelled"),
        ]);

        let written = extract_archive(bytes.as_slice(), &dest).unwrap();
        assert_eq!(written, 4);
        assert!(dest.join("aclImdb/train/pos/0_9.txt").is_file());
        assert!(!dest.join("aclImdb/train/unsup").exists());

        let fetcher = CorpusFetcher::with_url("http://unused.invalid", &dest);
        assert!(fetcher.is_extracted());
        // Already extracted: no network access happens
        assert_eq!(fetcher.ensure().unwrap(), dest.join("aclImdb"));

        fs::remove_dir_all(&dest).unwrap();
    }

    #[test]
    fn test_truncated_archive_leaves_no_corpus() {
        let dest = std::env::temp_dir().join(format!("imdb-truncated-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dest);
        fs::create_dir_all(&dest).unwrap();

        let reviews: Vec<(String, String)> = (0..50)
            .flat_map(|i| {
                ["train/pos", "train/neg", "test/pos", "test/neg"].map(|d| {
                    (format!("aclImdb/{d}/{i}_7.txt"), format!("review {i} in {d} {}", "x".repeat(i * 13)))
                })
            })
            .collect();
        let files: Vec<(&str, &str)> =
            reviews.iter().map(|(p, b)| (p.as_str(), b.as_str())).collect();
        let bytes = archive_with(&files);
        let cut   = &bytes[..bytes.len() * 9 / 10];

        let fetcher = CorpusFetcher::with_url("http://unused.invalid", &dest);
        assert!(fetcher.install_archive(cut).is_err());
        assert!(!fetcher.is_extracted());
        assert!(!dest.join("aclImdb").exists());

        // A later complete download replaces the staging leftovers
        assert_eq!(fetcher.install_archive(bytes.as_slice()).unwrap(), 200);
        assert!(fetcher.is_extracted());
        assert!(!dest.join(STAGING_DIR).exists());

        fs::remove_dir_all(&dest).unwrap();
    }

    #[test]
    fn test_not_extracted_when_missing() {
        let fetcher = CorpusFetcher::new(std::env::temp_dir().join("imdb-never-created"));
        assert!(!fetcher.is_extracted());
    }
}
