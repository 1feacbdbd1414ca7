// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
//   model.rs   — The classifier
//                • Frozen pretrained embedding
//                • Bidirectional LSTM (final states concatenated)
//                • Dense + ReLU, dropout
//                • Single-logit output, BCE-with-logits loss
//
//   trainer.rs — The training loop
//                Forward pass, loss, backward pass, Adam step,
//                per-epoch validation on the test split, and
//                final evaluation
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Schuster & Paliwal (1997) Bidirectional RNNs

/// Bidirectional LSTM sentiment classifier
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;
