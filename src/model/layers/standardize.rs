//! Per-image standardization

use ndarray::{Array4, ArrayD, Axis};

use super::{into_rank4, Layer, Mode};
use crate::error::TrainingFailure;

/// Scales each image to zero mean and unit variance
///
/// The divisor is `max(std, 1/√n)` with `n` the number of values per image,
/// so uniform images do not blow up. Input is `[N, H, W, C]`, output is
/// `[N, C, H, W]`. This is always the input stage, so it keeps no training
/// cache and has no backward pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct Standardize;

impl Standardize {
    pub fn new() -> Self {
        Self
    }
}

impl Layer for Standardize {
    fn forward(&mut self, input: ArrayD<f32>, _mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        let x = into_rank4(input)?.permuted_axes([0, 3, 1, 2]);
        let batch = x.len_of(Axis(0));
        let per_image = x.len() / batch.max(1);
        let floor = 1.0 / (per_image.max(1) as f32).sqrt();

        let mut out = Array4::<f32>::zeros(x.raw_dim());
        for (image, mut dst) in x.outer_iter().zip(out.outer_iter_mut()) {
            let mean = image.sum() / per_image as f32;
            let var = image.fold(0.0, |acc, v| acc + (v - mean) * (v - mean)) / per_image as f32;
            let s = var.sqrt().max(floor);
            dst.zip_mut_with(&image, |d, &v| *d = (v - mean) / s);
        }
        Ok(out.into_dyn())
    }

    fn backward(&mut self, _grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        Err(TrainingFailure::Other("standardize: input stage has no backward pass".to_string()))
    }

    fn name(&self) -> &'static str {
        "standardize"
    }
}
