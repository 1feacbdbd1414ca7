// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers into the two workflows the CLI
// exposes. No ML math, no printing: each use case returns a
// report and Layer 1 decides how to show it.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Corpus acquisition, cleaning, clouds and length statistics
pub mod explore_use_case;

// The full pipeline: explore + split, vocabulary, embeddings, training
pub mod train_use_case;
