//! Trainable network assembled from an [`Architecture`]

use ndarray::{Array2, Array4, ArrayD, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::architecture::{Architecture, Stage, StageShape};
use super::layers::{
    into_rank2, BatchNorm, Conv2d, Dense, Dropout, Layer, MaxPool2d, Mode, Standardize,
};
use crate::error::TrainingFailure;
use crate::optim::{Adam, AdamConfig, Optimizer, Param};

/// Probabilities are clipped to this before taking the log
const PROBABILITY_FLOOR: f32 = 1e-7;

/// Layers plus the optimizer that updates them
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
    optimizer: Adam,
    input_shape: [usize; 3],
    classes: usize,
}

impl Network {
    /// Materialize weights for `architecture` from `seed`
    pub fn new(
        architecture: &Architecture,
        optimizer: AdamConfig,
        regularization_strength: f32,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = architecture.config();
        let mut input = StageShape::Spatial {
            channels: config.channels,
            height: config.image_size,
            width: config.image_size,
        };
        let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(architecture.stages().len());
        for (stage, &output) in architecture.stages().iter().zip(architecture.output_shapes()) {
            let in_channels = match input {
                StageShape::Spatial { channels, .. } => channels,
                StageShape::Flat(n) => n,
            };
            let layer: Box<dyn Layer> = match *stage {
                Stage::Standardize => Box::new(Standardize::new()),
                Stage::Conv2d { filters, kernel, padding, regularized } => {
                    let conv = Conv2d::new(in_channels, filters, kernel, padding, &mut rng);
                    if regularized {
                        Box::new(conv.with_l2(regularization_strength))
                    } else {
                        Box::new(conv)
                    }
                }
                Stage::BatchNorm => Box::new(BatchNorm::new(in_channels)),
                Stage::MaxPool { size, stride } => Box::new(MaxPool2d::new(size, stride)),
                Stage::Dropout { rate } => Box::new(Dropout::new(rate, rng.random())),
                Stage::Dense { units, activation } => {
                    Box::new(Dense::new(input.size(), units, activation, &mut rng))
                }
            };
            layers.push(layer);
            input = output;
        }
        Self {
            layers,
            optimizer: optimizer.build(),
            input_shape: config.input_shape(),
            classes: architecture.output_units(),
        }
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Layer names in pipeline order
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Total number of trainable scalars
    pub fn num_parameters(&mut self) -> usize {
        self.layers.iter_mut().flat_map(|l| l.params_mut()).map(|p| p.len()).sum()
    }

    /// Sum of every layer's weight penalty
    pub fn l2_penalty(&self) -> f32 {
        self.layers.iter().map(|l| l.l2_penalty()).sum()
    }

    fn check_input(&self, images: &Array4<f32>) -> Result<(), TrainingFailure> {
        let (n, h, w, c) = images.dim();
        let [eh, ew, ec] = self.input_shape;
        if n == 0 {
            return Err(TrainingFailure::EmptyDataset("batch"));
        }
        if (h, w, c) != (eh, ew, ec) {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n, eh, ew, ec],
                actual: vec![n, h, w, c],
            });
        }
        Ok(())
    }

    fn forward(
        &mut self,
        images: &Array4<f32>,
        mode: Mode,
    ) -> Result<Array2<f32>, TrainingFailure> {
        self.check_input(images)?;
        let mut x: ArrayD<f32> = images.clone().into_dyn();
        for layer in &mut self.layers {
            x = layer.forward(x, mode)?;
        }
        into_rank2(x)
    }

    /// Class probabilities `[N, classes]` for NHWC `images` (inference mode)
    pub fn predict_proba(&mut self, images: &Array4<f32>) -> Result<Array2<f32>, TrainingFailure> {
        self.forward(images, Mode::Infer)
    }

    /// Most likely class per image
    pub fn predict(&mut self, images: &Array4<f32>) -> Result<Vec<usize>, TrainingFailure> {
        let proba = self.predict_proba(images)?;
        Ok(proba.rows().into_iter().map(|row| argmax(row.iter().copied())).collect())
    }

    /// Fraction of `labels` matched by the predicted class
    pub fn accuracy(
        &mut self,
        images: &Array4<f32>,
        labels: &[usize],
    ) -> Result<f64, TrainingFailure> {
        if labels.len() != images.len_of(Axis(0)) {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![images.len_of(Axis(0))],
                actual: vec![labels.len()],
            });
        }
        let predicted = self.predict(images)?;
        let correct = predicted.iter().zip(labels).filter(|(p, l)| p == l).count();
        Ok(correct as f64 / labels.len().max(1) as f64)
    }

    /// One optimizer step on a mini-batch; returns cross-entropy plus L2 penalty
    ///
    /// A non-finite loss is reported as [`TrainingFailure::Diverged`] before
    /// any weight is touched.
    pub fn train_batch(
        &mut self,
        images: &Array4<f32>,
        labels: &[usize],
    ) -> Result<f32, TrainingFailure> {
        let n = images.len_of(Axis(0));
        if labels.len() != n {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n],
                actual: vec![labels.len()],
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= self.classes) {
            return Err(TrainingFailure::Other(format!(
                "label {bad} out of range for {} classes",
                self.classes
            )));
        }

        let proba = self.forward(images, Mode::Train)?;
        let cross_entropy = labels
            .iter()
            .enumerate()
            .map(|(i, &l)| -proba[[i, l]].clamp(PROBABILITY_FLOOR, 1.0).ln())
            .sum::<f32>()
            / n as f32;
        let loss = cross_entropy + self.l2_penalty();
        if !loss.is_finite() {
            return Err(TrainingFailure::Diverged { epoch: 0, loss });
        }

        // Softmax + cross-entropy: dL/dz = (p - y) / N
        let mut grad = proba;
        for (i, &l) in labels.iter().enumerate() {
            grad[[i, l]] -= 1.0;
        }
        grad.mapv_inplace(|g| g / n as f32);

        let mut grad = grad.into_dyn();
        // Stage 0 is the parameter-free input standardization
        for layer in self.layers.iter_mut().skip(1).rev() {
            grad = layer.backward(grad)?;
        }

        let mut params: Vec<&mut Param> =
            self.layers.iter_mut().flat_map(|l| l.params_mut()).collect();
        self.optimizer.step(&mut params);
        self.optimizer.zero_grad(&mut params);
        Ok(loss)
    }

    pub fn learning_rate(&self) -> f32 {
        self.optimizer.lr()
    }
}

fn argmax(values: impl Iterator<Item = f32>) -> usize {
    let mut best = (0, f32::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}
