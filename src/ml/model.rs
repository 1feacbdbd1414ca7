use anyhow::{ensure, Result};
use burn::{
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        BiLstm, BiLstmConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    module::Param,
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::domain::review::Sentiment;
use crate::infra::embedding_store::EmbeddingMatrix;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SentimentClassifierConfig {
    pub n_vocab:  usize,
    pub n_emb:    usize,
    #[config(default = 100)]
    pub d_hidden: usize,
    #[config(default = 32)]
    pub d_dense:  usize,
    #[config(default = 0.2)]
    pub dropout:  f64,
}

impl SentimentClassifierConfig {
    /// Randomly initialised embedding, trainable.
    #[cfg(test)]
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentClassifier<B> {
        let embedding = EmbeddingConfig::new(self.n_vocab, self.n_emb).init(device);
        self.build(embedding, device)
    }

    /// Embedding copied from the pretrained matrix and frozen.
    pub fn init_with_embeddings<B: Backend>(
        &self,
        matrix: &EmbeddingMatrix,
        device: &B::Device,
    ) -> Result<SentimentClassifier<B>> {
        ensure!(
            matrix.rows == self.n_vocab && matrix.dim == self.n_emb,
            "Embedding matrix is {}x{}, model expects {}x{}",
            matrix.rows, matrix.dim, self.n_vocab, self.n_emb,
        );

        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(matrix.values.clone(), [matrix.rows, matrix.dim]),
            device,
        );
        let mut embedding = EmbeddingConfig::new(self.n_vocab, self.n_emb).init(device);
        embedding.weight  = Param::from_tensor(weights);

        Ok(self.build(embedding.no_grad(), device))
    }

    fn build<B: Backend>(&self, embedding: Embedding<B>, device: &B::Device) -> SentimentClassifier<B> {
        let bilstm  = BiLstmConfig::new(self.n_emb, self.d_hidden, true).init(device);
        let dense   = LinearConfig::new(2 * self.d_hidden, self.d_dense).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        let output  = LinearConfig::new(self.d_dense, 1).init(device);
        SentimentClassifier {
            embedding, bilstm, dense, dropout, output,
            d_hidden: self.d_hidden,
        }
    }
}

/// Frozen embedding → BiLSTM → Dense(ReLU) → Dropout → Dense(1).
///
/// The output layer emits a logit; the sigmoid lives in the loss
/// and in `predict_proba`.
#[derive(Module, Debug)]
pub struct SentimentClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub bilstm:    BiLstm<B>,
    pub dense:     Linear<B>,
    pub dropout:   Dropout,
    pub output:    Linear<B>,
    pub d_hidden:  usize,
}

impl<B: Backend> SentimentClassifier<B> {
    /// tokens: [batch, seq_len] → logits: [batch, 1]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, _] = tokens.dims();

        let x = self.embedding.forward(tokens); // [batch, seq_len, n_emb]

        // Final hidden state of each direction: [2, batch, d_hidden]
        let (_, state) = self.bilstm.forward(x, None);
        let x = state
            .hidden
            .swap_dims(0, 1)
            .reshape([batch_size, 2 * self.d_hidden]);

        let x = self.dropout.forward(relu(self.dense.forward(x)));
        self.output.forward(x)
    }

    /// Binary cross-entropy on logits, averaged over the batch.
    pub fn forward_loss(
        &self,
        tokens: Tensor<B, 2, Int>,
        labels: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(tokens);
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Probability of the positive class per review: [batch]
    pub fn predict_proba(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        probabilities(self.forward(tokens))
    }

    /// Parameters the optimiser updates (everything but the embedding)
    pub fn trainable_params(&self) -> usize {
        self.num_params() - self.embedding.num_params()
    }
}

/// Clipping applied to probabilities before taking their log
const PROBA_EPSILON: f32 = 1e-7;

/// logits: [batch, 1] → probabilities: [batch]
pub fn probabilities<B: Backend>(logits: Tensor<B, 2>) -> Tensor<B, 1> {
    sigmoid(logits).flatten::<1>(0, 1)
}

/// Mean binary cross-entropy of predicted probabilities, clipped to
/// [ε, 1 − ε] so saturated outputs stay finite.
pub fn probability_loss<B: Backend>(probs: Tensor<B, 1>, labels: Tensor<B, 2, Int>) -> Tensor<B, 1> {
    let targets = labels.flatten::<1>(0, 1).float();
    let p       = probs.clamp(PROBA_EPSILON, 1.0 - PROBA_EPSILON);
    let ones    = p.ones_like();

    let log_likelihood = targets.clone() * p.clone().log()
        + (ones.clone() - targets) * (ones - p).log();
    log_likelihood.mean().neg()
}

/// Number of reviews whose predicted sentiment matches the label.
pub fn correct_count<B: Backend>(probs: Tensor<B, 1>, labels: Tensor<B, 2, Int>) -> usize {
    let probs  = probs.into_data();
    let labels = labels.into_data();
    probs
        .iter::<f32>()
        .zip(labels.iter::<i64>())
        .filter(|&(p, y)| Sentiment::from_probability(p).as_label() as i64 == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn tiny_matrix() -> EmbeddingMatrix {
        let mut m = EmbeddingMatrix::zeros(4, 3);
        m.values[3..6].copy_from_slice(&[1.0, 0.0, -1.0]);
        m.matched = 1;
        m
    }

    #[test]
    fn test_forward_shapes() {
        let device = Default::default();
        let model: SentimentClassifier<TestBackend> = SentimentClassifierConfig::new(4, 3)
            .with_d_hidden(5)
            .with_d_dense(4)
            .init_with_embeddings(&tiny_matrix(), &device)
            .unwrap();

        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 0, 3, 0, 0], &device)
            .reshape([2, 3]);
        assert_eq!(model.forward(tokens.clone()).dims(), [2, 1]);

        let probs: Vec<f32> = model.predict_proba(tokens).into_data().to_vec().unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_embedding_copied_from_matrix() {
        let device = Default::default();
        let model: SentimentClassifier<TestBackend> = SentimentClassifierConfig::new(4, 3)
            .init_with_embeddings(&tiny_matrix(), &device)
            .unwrap();
        let weights: Vec<f32> = model.embedding.weight.val().into_data().to_vec().unwrap();
        assert_eq!(weights, tiny_matrix().values);
    }

    #[test]
    fn test_mismatched_matrix_rejected() {
        let device = Default::default();
        let result = SentimentClassifierConfig::new(5, 3)
            .init_with_embeddings::<TestBackend>(&tiny_matrix(), &device);
        assert!(result.is_err());
    }

    #[test]
    fn test_trainable_params_exclude_embedding() {
        let device = Default::default();
        let model: SentimentClassifier<TestBackend> =
            SentimentClassifierConfig::new(4, 3).with_d_hidden(2).with_d_dense(2).init(&device);
        assert_eq!(model.num_params() - model.trainable_params(), 4 * 3);
    }

    #[test]
    fn test_correct_count() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats([2.0, -1.0, 0.5, -3.0], &device)
            .reshape([4, 1]);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 1], &device)
            .reshape([4, 1]);
        assert_eq!(correct_count(probabilities(logits), labels), 2);
    }

    #[test]
    fn test_probability_loss_matches_logit_loss() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats([2.0, -1.0, 0.5], &device)
            .reshape([3, 1]);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0], &device)
            .reshape([3, 1]);

        let from_logits: f32 = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&device)
            .forward(logits.clone(), labels.clone())
            .into_scalar();
        let from_probs: f32 = probability_loss(probabilities(logits), labels).into_scalar();
        assert!((from_logits - from_probs).abs() < 1e-4);
    }

    #[test]
    fn test_probability_loss_is_finite_when_saturated() {
        let device = Default::default();
        let probs  = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device).reshape([2, 1]);
        let loss: f32 = probability_loss(probs, labels).into_scalar();
        assert!(loss.is_finite());
    }
}
