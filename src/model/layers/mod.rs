//! Layer kinds used by the classifier pipeline
//!
//! Activations flow between layers as dynamic-rank `f32` arrays. Spatial
//! layers work on `[N, C, H, W]`; [`Standardize`] converts the `[N, H, W, C]`
//! input images into that layout.

mod batch_norm;
mod conv;
mod dense;
mod dropout;
mod pool;
mod standardize;

use ndarray::{Array2, Array4, ArrayD, ArrayView2, ArrayViewMut2, Ix2, Ix4};
use rand::Rng;

use crate::error::TrainingFailure;
use crate::optim::Param;

pub use batch_norm::BatchNorm;
pub use conv::Conv2d;
pub use dense::{Activation, Dense};
pub use dropout::Dropout;
pub use pool::MaxPool2d;
pub use standardize::Standardize;

/// Forward pass behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Batch statistics, active dropout, caches kept for backward
    Train,
    /// Running statistics, dropout disabled
    Infer,
}

/// One stage of the network
pub trait Layer: Send {
    /// Compute the output for `input`
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure>;

    /// Propagate `grad` (w.r.t. the last output) back to the last input,
    /// accumulating parameter gradients
    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure>;

    /// Trainable parameters, in a stable order
    fn params_mut(&mut self) -> Vec<&mut Param> {
        Vec::new()
    }

    /// Weight penalty contributed to the loss
    fn l2_penalty(&self) -> f32 {
        0.0
    }

    fn name(&self) -> &'static str;
}

fn shape_error(expected: &[usize], actual: &[usize]) -> TrainingFailure {
    TrainingFailure::ShapeMismatch { expected: expected.to_vec(), actual: actual.to_vec() }
}

pub(crate) fn missing_cache(layer: &str) -> TrainingFailure {
    TrainingFailure::Other(format!("{layer}: backward called without a training forward pass"))
}

/// View a dynamic array as rank 4
pub(crate) fn into_rank4(x: ArrayD<f32>) -> Result<Array4<f32>, TrainingFailure> {
    let shape = x.shape().to_vec();
    x.into_dimensionality::<Ix4>().map_err(|_| shape_error(&[0, 0, 0, 0], &shape))
}

pub(crate) fn into_rank2(x: ArrayD<f32>) -> Result<Array2<f32>, TrainingFailure> {
    let shape = x.shape().to_vec();
    x.into_dimensionality::<Ix2>().map_err(|_| shape_error(&[0, 0], &shape))
}

pub(crate) fn matrix(p: &ArrayD<f32>) -> Result<ArrayView2<'_, f32>, TrainingFailure> {
    p.view().into_dimensionality::<Ix2>().map_err(|_| shape_error(&[0, 0], p.shape()))
}

pub(crate) fn matrix_mut(p: &mut ArrayD<f32>) -> Result<ArrayViewMut2<'_, f32>, TrainingFailure> {
    let shape = p.shape().to_vec();
    p.view_mut().into_dimensionality::<Ix2>().map_err(|_| shape_error(&[0, 0], &shape))
}

/// Glorot-uniform sample: U(-l, l) with l = √(6 / (fan_in + fan_out))
pub(crate) fn glorot_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
) -> ArrayD<f32> {
    let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
    ArrayD::from_shape_fn(shape, |_| rng.random_range(-limit..=limit))
}

#[cfg(test)]
pub(crate) mod test_util {
    use ndarray::ArrayD;

    /// Central-difference gradient of `sum(f(x) * weights)` w.r.t. `x[index]`
    pub fn numeric_grad(
        mut f: impl FnMut(&ArrayD<f32>) -> ArrayD<f32>,
        x: &ArrayD<f32>,
        weights: &ArrayD<f32>,
        index: usize,
    ) -> f32 {
        let h = 1e-2_f32;
        let mut plus = x.clone();
        let mut minus = x.clone();
        if let Some(v) = plus.as_slice_mut().and_then(|s| s.get_mut(index)) {
            *v += h;
        }
        if let Some(v) = minus.as_slice_mut().and_then(|s| s.get_mut(index)) {
            *v -= h;
        }
        let lp: f32 = (f(&plus) * weights).sum();
        let lm: f32 = (f(&minus) * weights).sum();
        (lp - lm) / (2.0 * h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_glorot_uniform_within_limit() {
        let mut rng = StdRng::seed_from_u64(0);
        let w = glorot_uniform(&[20, 30], 20, 30, &mut rng);
        let limit = (6.0_f32 / 50.0).sqrt();
        assert_eq!(w.shape(), &[20, 30]);
        assert!(w.iter().all(|v| v.abs() <= limit));
        assert!(w.iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_rank_conversion_errors() {
        let x = ArrayD::<f32>::zeros(IxDyn(&[2, 3]));
        assert!(into_rank2(x.clone()).is_ok());
        assert!(matches!(into_rank4(x), Err(TrainingFailure::ShapeMismatch { .. })));
    }
}
