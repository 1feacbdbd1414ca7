// ============================================================
// Layer 4 — Review Batcher
// ============================================================
// Implements Burn's Batcher trait to stack ReviewSamples into
// tensors for the classifier.
//
//   Input:  Vec of N ReviewSamples, each padded to length S
//   Output: ReviewBatch { tokens: [N, S] Int, labels: [N, 1] Int }
//
// All samples are already padded to the same length, so batching
// is a flatten followed by a reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ReviewSample;

#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Padded token indices — shape: [batch_size, seq_len]
    pub tokens: Tensor<B, 2, Int>,

    /// 0/1 targets — shape: [batch_size, 1], matching the logits
    pub labels: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ReviewSample, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<ReviewSample>) -> ReviewBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |s| s.tokens.len());

        let tokens_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.tokens.iter().map(|&t| t as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(
            tokens_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            labels.as_slice(), &self.device
        ).reshape([batch_size, 1]);

        ReviewBatch { tokens, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let batcher = ReviewBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            ReviewSample { tokens: vec![1, 2, 0], label: 1 },
            ReviewSample { tokens: vec![3, 0, 0], label: 0 },
        ]);

        assert_eq!(batch.tokens.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2, 1]);

        let tokens: Vec<i64> = batch
            .tokens
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(tokens, vec![1, 2, 0, 3, 0, 0]);

        let labels: Vec<i64> = batch
            .labels
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(labels, vec![1, 0]);
    }
}
