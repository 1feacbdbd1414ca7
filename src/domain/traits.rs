// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads reviews through this trait and
// never sees directory layouts or file formats.
//
// Implementations:
//   - ImdbLoader → reads the extracted aclImdb directory tree
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::review::Review;

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled reviews.
pub trait ReviewSource {
    /// Load every available review, positive and negative.
    fn load_all(&self) -> Result<Vec<Review>>;
}
