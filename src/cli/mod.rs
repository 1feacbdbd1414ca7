// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, dispatches to a use case, and
// prints the report it returns. No pipeline logic lives here.
//
// Two commands are supported:
//   1. `train`   — the full pipeline, ending in test accuracy
//   2. `explore` — corpus statistics and word clouds only
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ExploreArgs, TrainArgs};

use crate::application::{
    explore_use_case::{ExploreReport, ExploreUseCase},
    train_use_case::{TrainReport, TrainUseCase},
};
use crate::data::stats::LengthStats;

#[derive(Parser, Debug)]
#[command(
    name = "imdb-sentiment",
    version,
    about = "Classify IMDb review sentiment with a GloVe-initialised bidirectional LSTM."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Explore(args) => run_explore(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training run with corpus in: {}", args.corpus.data_dir);
    let report = TrainUseCase::new(args.into()).execute()?;
    print_train_report(&report);
    Ok(())
}

fn run_explore(args: ExploreArgs) -> Result<()> {
    let report = ExploreUseCase::new(args.into()).execute()?;
    print_explore_report(&report);
    Ok(())
}

fn print_corpus_summary(positives: usize, negatives: usize, stats: &LengthStats) {
    println!("Number of positive reviews available : {positives}");
    println!("Number of negative reviews available : {negatives}");
    println!("Average length of each review is : {:.2}", stats.mean);
    println!("Standard deviation of length of each review is : {:.2}", stats.std);
    println!(
        "We take the length of the sequence to be mean + 3*std which becomes : {}",
        stats.sequence_length
    );
}

fn print_explore_report(r: &ExploreReport) {
    print_corpus_summary(r.positives, r.negatives, &r.stats);

    for (label, words) in [("positive", &r.top_positive), ("negative", &r.top_negative)] {
        let listed: Vec<String> = words.iter().map(|(w, c)| format!("{w} ({c})")).collect();
        println!("Most frequent {label} words: {}", listed.join(", "));
    }
    if let Some(dir) = &r.output_dir {
        println!("Plots written to {}", dir.display());
    }
}

fn print_train_report(r: &TrainReport) {
    print_corpus_summary(r.positives, r.negatives, &r.stats);
    println!("Training reviews : {}", r.train_size);
    println!("Test reviews : {}", r.test_size);
    println!("Vocabulary size : {}", r.vocab_size);
    println!("Number of common words : {}", r.matched_words);
    println!(
        "Parameters : {} total, {} trainable, {} frozen",
        r.total_params,
        r.trainable_params,
        r.total_params - r.trainable_params,
    );
    if let Some(best) = r.history.best_epoch() {
        println!("Best epoch : {} (val_loss={:.4})", best.epoch, best.val_loss);
    }
    println!("Test loss : {:.4}", r.test_loss);
    println!("Test accuracy : {:.4}", r.test_accuracy);
    println!("Outputs written to {}", r.output_dir.display());
}
