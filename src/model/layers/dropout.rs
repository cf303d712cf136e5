//! Inverted dropout

use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{missing_cache, Layer, Mode};
use crate::error::TrainingFailure;

/// Zeroes activations with probability `rate` during training and scales the
/// survivors by `1 / (1 - rate)`; identity at inference
#[derive(Debug)]
pub struct Dropout {
    rate: f32,
    rng: StdRng,
    mask: Option<ArrayD<f32>>,
}

impl Dropout {
    pub fn new(rate: f32, seed: u64) -> Self {
        Self { rate: rate.clamp(0.0, 0.999), rng: StdRng::seed_from_u64(seed), mask: None }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Layer for Dropout {
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        if mode == Mode::Infer {
            return Ok(input);
        }
        let keep = 1.0 - self.rate;
        let rng = &mut self.rng;
        let mask = input.map(|_| if rng.random::<f32>() < keep { 1.0 / keep } else { 0.0 });
        let out = &input * &mask;
        self.mask = Some(mask);
        Ok(out)
    }

    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        let mask = self.mask.as_ref().ok_or_else(|| missing_cache("dropout"))?;
        if mask.shape() != grad.shape() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: mask.shape().to_vec(),
                actual: grad.shape().to_vec(),
            });
        }
        Ok(grad * mask)
    }

    fn name(&self) -> &'static str {
        "dropout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_inference_is_identity() {
        let mut dropout = Dropout::new(0.5, 1);
        let x = ArrayD::from_elem(IxDyn(&[4, 8]), 3.0_f32);
        let y = dropout.forward(x.clone(), Mode::Infer).unwrap();
        assert_eq!(y, x);
    }

    #[test]
    fn test_training_preserves_expectation() {
        let mut dropout = Dropout::new(0.5, 7);
        let x = ArrayD::from_elem(IxDyn(&[100, 100]), 1.0_f32);
        let y = dropout.forward(x, Mode::Train).unwrap();
        let zeros = y.iter().filter(|v| **v == 0.0).count();
        assert!((4000..6000).contains(&zeros), "dropped {zeros}");
        assert!(y.iter().all(|v| *v == 0.0 || *v == 2.0));
        let mean = y.sum() / y.len() as f32;
        assert!((mean - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_backward_uses_same_mask() {
        let mut dropout = Dropout::new(0.5, 3);
        let x = ArrayD::from_elem(IxDyn(&[2, 16]), 1.0_f32);
        let y = dropout.forward(x, Mode::Train).unwrap();
        let g = dropout.backward(ArrayD::ones(IxDyn(&[2, 16]))).unwrap();
        assert_eq!(y, g);
    }

    #[test]
    fn test_seeded_masks_repeat() {
        let x = ArrayD::from_elem(IxDyn(&[3, 10]), 1.0_f32);
        let a = Dropout::new(0.5, 11).forward(x.clone(), Mode::Train).unwrap();
        let b = Dropout::new(0.5, 11).forward(x, Mode::Train).unwrap();
        assert_eq!(a, b);
    }
}
