//! Mini-batch training and validation scoring

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::config::TrainConfig;
use crate::cli::{log, LogLevel};
use crate::data::ImageDataset;
use crate::error::{Result, TrainingFailure};
use crate::model::{Classifier, Network};

/// Trains a classifier and returns its score; higher is better
pub trait Trainer {
    fn train_and_score(&mut self, classifier: &Classifier) -> Result<f64>;
}

/// Outcome of one [`EpochTrainer::fit`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainResult {
    /// Epochs completed
    pub epochs: usize,
    /// Mean training loss of the last epoch
    pub final_loss: f32,
    /// Accuracy on the validation set after the last epoch
    pub val_accuracy: f64,
}

/// Fixed-epoch trainer scored by validation accuracy
pub struct EpochTrainer {
    config: TrainConfig,
    train: ImageDataset,
    validation: ImageDataset,
    log_level: LogLevel,
}

impl EpochTrainer {
    pub fn new(config: TrainConfig, train: ImageDataset, validation: ImageDataset) -> Self {
        Self { config, train, validation, log_level: LogLevel::Quiet }
    }

    /// Print per-epoch loss at `level`
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train a fresh network for `classifier` and score it
    pub fn fit(&self, classifier: &Classifier) -> Result<TrainResult> {
        self.config.validate()?;
        if self.train.is_empty() {
            return Err(TrainingFailure::EmptyDataset("training set").into());
        }
        if self.validation.is_empty() {
            return Err(TrainingFailure::EmptyDataset("validation set").into());
        }

        let mut network = classifier.instantiate(self.config.seed);
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut order: Vec<usize> = (0..self.train.len()).collect();
        let mut final_loss = 0.0;

        for epoch in 0..self.config.epochs {
            order.shuffle(&mut rng);
            let mut total = 0.0;
            let mut batches = 0;
            for chunk in order.chunks(self.config.batch_size) {
                let (images, labels) = self.train.batch(chunk);
                let loss = network.train_batch(&images, &labels).map_err(|e| match e {
                    TrainingFailure::Diverged { loss, .. } => {
                        TrainingFailure::Diverged { epoch, loss }
                    }
                    other => other,
                })?;
                total += loss;
                batches += 1;
            }
            final_loss = total / batches as f32;
            log(
                self.log_level,
                LogLevel::Verbose,
                &format!("    epoch {}/{}: loss={final_loss:.4}", epoch + 1, self.config.epochs),
            );
        }

        let val_accuracy = self.evaluate(&mut network)?;
        Ok(TrainResult { epochs: self.config.epochs, final_loss, val_accuracy })
    }

    fn evaluate(&self, network: &mut Network) -> Result<f64> {
        let indices: Vec<usize> = (0..self.validation.len()).collect();
        let mut correct = 0;
        for chunk in indices.chunks(self.config.batch_size) {
            let (images, labels) = self.validation.batch(chunk);
            let predicted = network.predict(&images)?;
            correct += predicted.iter().zip(&labels).filter(|(p, l)| p == l).count();
        }
        Ok(correct as f64 / self.validation.len() as f64)
    }
}

impl Trainer for EpochTrainer {
    fn train_and_score(&mut self, classifier: &Classifier) -> Result<f64> {
        Ok(self.fit(classifier)?.val_accuracy)
    }
}
