// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the pipeline:
//
//   embedding_store.rs — Pretrained word vectors
//                        Streams a GloVe text file and builds the
//                        embedding matrix for the vocabulary.
//
//   metrics.rs         — Training metrics
//                        Per-epoch loss / accuracy history and the
//                        CSV it is written to.
//
//   plots.rs           — Figures
//                        Word clouds, length histogram, and
//                        training curves rendered with plotters.
//
//   output_dir.rs      — Run artefacts directory
//                        Creates it and stores the run config.
//
// Reference: Rust Book §7 (Modules)

/// GloVe vector file reader and embedding matrix
pub mod embedding_store;

/// Epoch metrics, history, and CSV logger
pub mod metrics;

/// PNG rendering of clouds, histogram, and curves
pub mod plots;

/// Output directory and run config persistence
pub mod output_dir;
