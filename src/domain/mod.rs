// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that name the concepts of the pipeline:
// a labelled movie review and the sentiment it carries.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A review read from the corpus and its sentiment label
pub mod review;

// Core abstractions (traits) that other layers implement
pub mod traits;
