//! Optimizer trait and trainable parameters

use ndarray::ArrayD;

/// A trainable parameter with its accumulated gradient
#[derive(Debug, Clone)]
pub struct Param {
    /// Current value
    pub value: ArrayD<f32>,
    /// Gradient of the loss with respect to `value`
    pub grad: ArrayD<f32>,
}

impl Param {
    /// Create a parameter with a zeroed gradient of the same shape
    pub fn new(value: ArrayD<f32>) -> Self {
        let grad = ArrayD::zeros(value.raw_dim());
        Self { value, grad }
    }

    /// Number of scalar elements
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the parameter holds no elements
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Reset the gradient to zero
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Sum of squared values
    pub fn sum_squares(&self) -> f32 {
        self.value.iter().map(|w| w * w).sum()
    }
}

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Perform a single optimization step on the referenced parameters
    ///
    /// Parameters must be passed in the same order on every call.
    fn step(&mut self, params: &mut [&mut Param]);

    /// Zero gradients on referenced parameters
    fn zero_grad(&mut self, params: &mut [&mut Param]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
