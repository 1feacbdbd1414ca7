// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
//   - Training uses an AutodiffBackend for gradients
//   - model.valid() returns the model on the inner backend,
//     with dropout disabled, for validation and evaluation
//   - The embedding is frozen, so Adam only updates the BiLSTM
//     and the two dense layers
//
// Each epoch reports loss and accuracy on the training set and on
// the held-out test split, mirroring the train/validation curves
// the run plots at the end.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::PipelineConfig;
use crate::data::{
    batcher::{ReviewBatch, ReviewBatcher},
    dataset::ReviewDataset,
};
use crate::infra::{
    embedding_store::EmbeddingMatrix,
    metrics::{EpochMetrics, MetricsLogger, TrainingHistory},
};
use crate::ml::model::{
    correct_count, probabilities, probability_loss, SentimentClassifier, SentimentClassifierConfig,
};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Epsilon of the reference Adam implementation
const ADAM_EPSILON: f32 = 1e-7;

/// Trained model (inner backend) plus its metrics
pub struct TrainOutcome<B: Backend> {
    pub model:         SentimentClassifier<B>,
    pub history:       TrainingHistory,
    pub test_loss:     f64,
    pub test_accuracy: f64,
}

impl<B: Backend> TrainOutcome<B> {
    /// (all parameters, trainable parameters)
    pub fn param_counts(&self) -> (usize, usize) {
        (self.model.num_params(), self.model.trainable_params())
    }
}

pub fn run_training(
    cfg:          &PipelineConfig,
    matrix:       &EmbeddingMatrix,
    train_dataset: ReviewDataset,
    test_dataset:  ReviewDataset,
    logger:       Option<&MetricsLogger>,
) -> Result<TrainOutcome<burn::backend::Wgpu>> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, matrix, train_dataset, test_dataset, logger, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &PipelineConfig,
    matrix:        &EmbeddingMatrix,
    train_dataset: ReviewDataset,
    test_dataset:  ReviewDataset,
    logger:        Option<&MetricsLogger>,
    device:        B::Device,
) -> Result<TrainOutcome<B::InnerBackend>> {
    ensure!(train_dataset.sample_count() > 0, "Training set is empty");
    ensure!(test_dataset.sample_count()  > 0, "Test set is empty");

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = SentimentClassifierConfig::new(matrix.rows, matrix.dim)
        .with_d_hidden(cfg.hidden)
        .with_d_dense(cfg.dense)
        .with_dropout(cfg.dropout);
    let mut model: SentimentClassifier<B> = model_cfg.init_with_embeddings(matrix, &device)?;
    tracing::info!(
        "Model ready: {} parameters ({} trainable)",
        model.num_params(),
        model.trainable_params(),
    );

    let mut optim = AdamConfig::new().with_epsilon(ADAM_EPSILON).init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_batcher = ReviewBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // Validation runs on the inner backend — no autodiff overhead
    let test_batcher = ReviewBatcher::<B::InnerBackend>::new(device.clone());
    let test_loader  = DataLoaderBuilder::new(test_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    let mut history = TrainingHistory::default();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_size = batch.labels.dims()[0];
            let (loss, logits) = model.forward_loss(batch.tokens, batch.labels.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>() * batch_size as f64;
            correct  += correct_count(probabilities(logits.detach()), batch.labels);
            seen     += batch_size;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss     = loss_sum / seen.max(1) as f64;
        let train_accuracy = correct as f64 / seen.max(1) as f64;

        let (val_loss, val_accuracy) = evaluate(&model.valid(), test_loader.as_ref());

        let metrics = EpochMetrics::new(epoch, train_loss, train_accuracy, val_loss, val_accuracy);
        println!(
            "Epoch {:>2}/{} | loss={:.4} | accuracy={:.4} | val_loss={:.4} | val_accuracy={:.4}",
            epoch, cfg.epochs, train_loss, train_accuracy, val_loss, val_accuracy,
        );
        if let Some(logger) = logger {
            logger.log(&metrics)?;
        }
        history.push(metrics);
    }

    let model = model.valid();
    let (test_loss, test_accuracy) = evaluate(&model, test_loader.as_ref());
    tracing::info!("Training complete: test_loss={:.4}, test_accuracy={:.4}", test_loss, test_accuracy);

    Ok(TrainOutcome { model, history, test_loss, test_accuracy })
}

/// Sample-weighted mean loss and accuracy over every batch of a loader,
/// computed from the predicted probabilities.
pub fn evaluate<B: Backend>(
    model:  &SentimentClassifier<B>,
    loader: &dyn DataLoader<ReviewBatch<B>>,
) -> (f64, f64) {
    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut seen     = 0usize;

    for batch in loader.iter() {
        let batch_size = batch.labels.dims()[0];
        let probs = model.predict_proba(batch.tokens);

        let loss  = probability_loss(probs.clone(), batch.labels.clone());
        loss_sum += loss.into_scalar().elem::<f64>() * batch_size as f64;
        correct  += correct_count(probs, batch.labels);
        seen     += batch_size;
    }

    if seen == 0 {
        return (f64::NAN, 0.0);
    }
    (loss_sum / seen as f64, correct as f64 / seen as f64)
}
