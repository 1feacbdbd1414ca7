// ============================================================
// Layer 2 — ExploreUseCase
// ============================================================
// Runs the first half of the pipeline, shared with training:
//
//   Step 1: Download / locate the corpus   (Layer 4 - data)
//   Step 2: Load labelled reviews          (Layer 4 - data)
//   Step 3: Clean the text                 (Layer 4 - data)
//   Step 4: Word clouds per sentiment      (Layer 6 - infra)
//   Step 5: Length statistics + histogram  (Layer 4 / 6)

use anyhow::Result;
use std::path::PathBuf;

use crate::application::train_use_case::PipelineConfig;
use crate::data::{
    acquisition::CorpusFetcher,
    loader::ImdbLoader,
    preprocessor::Preprocessor,
    stats::{word_frequencies, LengthStats},
};
use crate::domain::review::{LabeledText, Sentiment};
use crate::domain::traits::ReviewSource;
use crate::infra::{
    output_dir::OutputDir,
    plots::{Plotter, CLOUD_WORDS},
};

/// Cleaned corpus plus the numbers reported about it
pub struct PreparedCorpus {
    pub texts:     Vec<LabeledText>,
    pub positives: usize,
    pub negatives: usize,
    pub stats:     LengthStats,
}

#[derive(Debug, Clone)]
pub struct ExploreReport {
    pub positives: usize,
    pub negatives: usize,
    pub stats:     LengthStats,
    pub top_positive: Vec<(String, usize)>,
    pub top_negative: Vec<(String, usize)>,
    pub output_dir: Option<PathBuf>,
}

/// Number of frequent words listed in the explore report
const REPORTED_WORDS: usize = 15;

pub struct ExploreUseCase {
    config: PipelineConfig,
}

impl ExploreUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ExploreReport> {
        let cfg = &self.config;

        let output  = if cfg.plots { Some(OutputDir::create(&cfg.output_dir)?) } else { None };
        let plotter = output.as_ref().map(|o| Plotter::new(o.path()));

        let corpus = prepare_corpus(cfg, plotter.as_ref())?;

        Ok(ExploreReport {
            positives:    corpus.positives,
            negatives:    corpus.negatives,
            stats:        corpus.stats,
            top_positive: top_words(&corpus.texts, Sentiment::Positive, REPORTED_WORDS),
            top_negative: top_words(&corpus.texts, Sentiment::Negative, REPORTED_WORDS),
            output_dir:   output.map(|o| o.path().to_path_buf()),
        })
    }
}

/// Steps 1-5. Plots are rendered only when a plotter is given.
pub fn prepare_corpus(cfg: &PipelineConfig, plotter: Option<&Plotter>) -> Result<PreparedCorpus> {
    // ── Step 1: Corpus on disk ────────────────────────────────────────────────
    let root = CorpusFetcher::new(&cfg.data_dir).ensure()?;

    // ── Step 2: Labelled reviews ──────────────────────────────────────────────
    let reviews   = ImdbLoader::new(root).load_all()?;
    let positives = reviews
        .iter()
        .filter(|r| r.sentiment == Sentiment::Positive)
        .count();
    let negatives = reviews.len() - positives;

    // ── Step 3: Cleaning ──────────────────────────────────────────────────────
    let texts = Preprocessor::new().clean_all(&reviews);
    drop(reviews);
    tracing::info!("Cleaned {} reviews", texts.len());

    // ── Step 4: Word clouds ───────────────────────────────────────────────────
    if let Some(plotter) = plotter {
        for (sentiment, file, title) in [
            (Sentiment::Positive, "wordcloud_positive.png", "Positive Reviews"),
            (Sentiment::Negative, "wordcloud_negative.png", "Negative Reviews"),
        ] {
            let words = top_words(&texts, sentiment, CLOUD_WORDS);
            plotter.word_cloud(file, title, &words)?;
        }
    }

    // ── Step 5: Sequence length ───────────────────────────────────────────────
    let counts: Vec<usize> = texts.iter().map(LabeledText::token_count).collect();
    let stats = LengthStats::from_counts(&counts)?;
    tracing::info!(
        "Review length: mean={:.2}, std={:.2} → sequence length {}",
        stats.mean,
        stats.std,
        stats.sequence_length,
    );
    if let Some(plotter) = plotter {
        plotter.length_histogram(&counts, &stats)?;
    }

    Ok(PreparedCorpus { texts, positives, negatives, stats })
}

fn top_words(texts: &[LabeledText], sentiment: Sentiment, limit: usize) -> Vec<(String, usize)> {
    word_frequencies(
        texts
            .iter()
            .filter(|t| t.sentiment == sentiment)
            .map(|t| t.text.as_str()),
        limit,
    )
}
