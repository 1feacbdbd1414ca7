// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the remote archive to tensor batches.
//
//   aclImdb_v1.tar.gz
//       │
//       ▼
//   CorpusFetcher     → downloads and extracts the corpus
//       │
//       ▼
//   ImdbLoader        → reads labelled reviews from pos/neg dirs
//       │
//       ▼
//   Preprocessor      → strips markup/punctuation, drops stopwords
//       │
//       ▼
//   LengthStats       → picks the padded sequence length
//       │
//       ▼
//   split_train_test  → seeded shuffle and split
//       │
//       ▼
//   Vocabulary        → token → index, fitted on training texts
//       │
//       ▼
//   ReviewDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ReviewBatcher     → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Downloads and unpacks the IMDb archive
pub mod acquisition;

/// Reads reviews from the extracted directory tree
pub mod loader;

/// Cleans review text
pub mod preprocessor;

/// English stopword list
pub mod stopwords;

/// Sequence-length heuristic and word frequencies
pub mod stats;

/// Seeded shuffle and train/test split
pub mod splitter;

/// Token ↔ index mapping and padding
pub mod vocabulary;

/// Implements Burn's Dataset trait for encoded reviews
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
