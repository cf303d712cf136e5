//! Adam optimizer

use super::optimizer::{Optimizer, Param};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Adam hyperparameters bound to a classifier by the model factory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl AdamConfig {
    /// Defaults for everything except the learning rate
    pub fn with_lr(learning_rate: f32) -> Self {
        Self { learning_rate, beta1: 0.9, beta2: 0.999, epsilon: 1e-7 }
    }

    /// Build a fresh optimizer with no accumulated moments
    pub fn build(&self) -> Adam {
        Adam::new(self.learning_rate, self.beta1, self.beta2, self.epsilon)
    }
}

/// Adam optimizer
///
/// θ_t = θ_{t-1} - lr_t * m_t / (√v_t + ε), with
/// lr_t = lr * √(1 - β2^t) / (1 - β1^t)
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<ArrayD<f32>>, // First moment
    v: Vec<ArrayD<f32>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Optimizer step counter
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    fn ensure_moments(&mut self, params: &[&mut Param]) {
        let matches = self.m.len() == params.len()
            && self.m.iter().zip(params.iter()).all(|(m, p)| m.shape() == p.value.shape());
        if !matches {
            self.m = params.iter().map(|p| ArrayD::zeros(p.value.raw_dim())).collect();
            self.v = params.iter().map(|p| ArrayD::zeros(p.value.raw_dim())).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Param]) {
        self.ensure_moments(params);
        self.t += 1;

        let t = self.t.min(i32::MAX as u64) as i32;
        let lr_t =
            self.lr * ((1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t)));
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);

        for (i, param) in params.iter_mut().enumerate() {
            let param = &mut **param;
            let m = &mut self.m[i];
            let v = &mut self.v[i];
            ndarray::Zip::from(&mut param.value)
                .and(&param.grad)
                .and(m)
                .and(v)
                .for_each(|w, &g, m, v| {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    *w -= lr_t * *m / (v.sqrt() + epsilon);
                });
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
