// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `explore`, and all
// their configurable flags. Defaults reproduce the reference run:
// 200-d Twitter GloVe vectors, 80/20 split, BiLSTM(100), 3 epochs.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::PipelineConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the corpus, train the classifier and report its curves
    Train(TrainArgs),

    /// Download and clean the corpus, then report length statistics
    /// and render word clouds without training
    Explore(ExploreArgs),
}

/// Flags shared by every subcommand
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Directory the aclImdb corpus is downloaded and extracted into
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for plots, metrics and the run config
    #[arg(long, default_value = "output")]
    pub output_dir: String,

    /// Skip rendering word clouds, histogram and curves
    #[arg(long)]
    pub no_plots: bool,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Pretrained word vectors, one "<token> <f1> ... <fN>" line each
    #[arg(long, default_value = "glove.twitter.27B.200d.txt")]
    pub embeddings: String,

    /// Number of components per pretrained vector
    #[arg(long, default_value_t = 200)]
    pub embedding_dim: usize,

    /// Fraction of reviews held out for validation and evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Hidden units per LSTM direction
    #[arg(long, default_value_t = 100)]
    pub hidden: usize,

    /// Units of the dense layer after the BiLSTM
    #[arg(long, default_value_t = 32)]
    pub dense: usize,

    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Seed for the train/test split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for PipelineConfig {
    fn from(a: TrainArgs) -> Self {
        PipelineConfig {
            data_dir:      a.corpus.data_dir,
            output_dir:    a.corpus.output_dir,
            embeddings:    a.embeddings,
            embedding_dim: a.embedding_dim,
            test_fraction: a.test_fraction,
            batch_size:    a.batch_size,
            epochs:        a.epochs,
            lr:            a.lr,
            hidden:        a.hidden,
            dense:         a.dense,
            dropout:       a.dropout,
            seed:          a.seed,
            plots:         !a.corpus.no_plots,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

impl From<ExploreArgs> for PipelineConfig {
    fn from(a: ExploreArgs) -> Self {
        PipelineConfig {
            data_dir:   a.corpus.data_dir,
            output_dir: a.corpus.output_dir,
            plots:      !a.corpus.no_plots,
            ..PipelineConfig::default()
        }
    }
}
