// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full pipeline in order:
//
//   Step 1-5: Corpus, cleaning, clouds, lengths  (ExploreUseCase)
//   Step 6:   Save run config                    (Layer 6 - infra)
//   Step 7:   Train / test split                 (Layer 4 - data)
//   Step 8:   Fit vocabulary, encode + pad       (Layer 4 - data)
//   Step 9:   Build embedding matrix             (Layer 6 - infra)
//   Step 10:  Train and evaluate                 (Layer 5 - ml)
//   Step 11:  Plot training curves               (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::explore_use_case::{prepare_corpus, PreparedCorpus};
use crate::data::{
    dataset::ReviewDataset,
    splitter::split_train_test,
    stats::LengthStats,
    vocabulary::Vocabulary,
};
use crate::infra::{
    embedding_store::EmbeddingStore,
    metrics::{MetricsLogger, TrainingHistory},
    output_dir::OutputDir,
    plots::Plotter,
};
use crate::ml::trainer::run_training;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
// Every knob of a run. Serialisable so it can be stored next to
// the metrics it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data_dir:      String,
    pub output_dir:    String,
    pub embeddings:    String,
    pub embedding_dim: usize,
    pub test_fraction: f64,
    pub batch_size:    usize,
    pub epochs:        usize,
    pub lr:            f64,
    pub hidden:        usize,
    pub dense:         usize,
    pub dropout:       f64,
    pub seed:          u64,
    pub plots:         bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir:      "data".to_string(),
            output_dir:    "output".to_string(),
            embeddings:    "glove.twitter.27B.200d.txt".to_string(),
            embedding_dim: 200,
            test_fraction: 0.2,
            batch_size:    32,
            epochs:        3,
            lr:            1e-3,
            hidden:        100,
            dense:         32,
            dropout:       0.2,
            seed:          42,
            plots:         true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.test_fraction > 0.0 && self.test_fraction < 1.0,
            "test fraction must be in (0, 1), got {}",
            self.test_fraction
        );
        ensure!(self.batch_size > 0, "batch size must be positive");
        ensure!(self.epochs > 0, "epoch count must be positive");
        ensure!(self.embedding_dim > 0, "embedding dimension must be positive");
        ensure!(self.hidden > 0 && self.dense > 0, "layer sizes must be positive");
        ensure!(
            (0.0..1.0).contains(&self.dropout),
            "dropout must be in [0, 1), got {}",
            self.dropout
        );
        Ok(())
    }
}

/// Everything the CLI prints after a run
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub positives:        usize,
    pub negatives:        usize,
    pub stats:            LengthStats,
    pub train_size:       usize,
    pub test_size:        usize,
    pub vocab_size:       usize,
    pub matched_words:    usize,
    pub total_params:     usize,
    pub trainable_params: usize,
    pub history:          TrainingHistory,
    pub test_loss:        f64,
    pub test_accuracy:    f64,
    pub output_dir:       PathBuf,
}

pub struct TrainUseCase {
    config: PipelineConfig,
}

impl TrainUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        let output  = OutputDir::create(&cfg.output_dir)?;
        let plotter = cfg.plots.then(|| Plotter::new(output.path()));

        // ── Steps 1-5: corpus, cleaning, clouds, sequence length ──────────────
        let PreparedCorpus { texts, positives, negatives, stats } =
            prepare_corpus(cfg, plotter.as_ref())?;
        let seq_len = stats.sequence_length;
        ensure!(seq_len > 0, "Every review is empty after cleaning");

        // ── Step 6: Save config next to the metrics ───────────────────────────
        output.save_config(cfg)?;

        // ── Step 7: Train / test split ────────────────────────────────────────
        let (train_texts, test_texts) = split_train_test(texts, 1.0 - cfg.test_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} test", train_texts.len(), test_texts.len());

        // ── Step 8: Vocabulary and padded sequences ───────────────────────────
        let vocab = Vocabulary::fit(train_texts.iter().map(|t| t.text.as_str()));
        ensure!(!vocab.is_empty(), "Training reviews contain no words after cleaning");
        let train_dataset = ReviewDataset::encode(&train_texts, &vocab, seq_len);
        let test_dataset  = ReviewDataset::encode(&test_texts,  &vocab, seq_len);
        let (train_size, test_size) = (train_dataset.sample_count(), test_dataset.sample_count());
        tracing::info!(
            "Vocabulary: {} entries; positives: {}/{} train, {}/{} test",
            vocab.len(),
            train_dataset.positive_count(),
            train_size,
            test_dataset.positive_count(),
            test_size,
        );
        drop((train_texts, test_texts));

        // ── Step 9: Embedding matrix ──────────────────────────────────────────
        let store  = EmbeddingStore::new(&cfg.embeddings, cfg.embedding_dim);
        let matrix = store.build_matrix(&vocab)?;

        // ── Step 10: Train and evaluate ───────────────────────────────────────
        let logger  = MetricsLogger::new(output.path())?;
        let outcome = run_training(cfg, &matrix, train_dataset, test_dataset, Some(&logger))?;

        let (total_params, trainable_params) = outcome.param_counts();
        tracing::info!("Epoch metrics written to '{}'", logger.csv_path().display());

        // ── Step 11: Curves ───────────────────────────────────────────────────
        if let Some(plotter) = &plotter {
            plotter.training_curves(&outcome.history)?;
        }

        Ok(TrainReport {
            positives,
            negatives,
            stats,
            train_size,
            test_size,
            vocab_size:       vocab.len(),
            matched_words:    matrix.matched,
            total_params,
            trainable_params,
            history:          outcome.history,
            test_loss:        outcome.test_loss,
            test_accuracy:    outcome.test_accuracy,
            output_dir:       output.path().to_path_buf(),
        })
    }
}
