//! Batch normalization over the channel axis

use ndarray::{Array1, Array4, ArrayD, Axis, IxDyn};

use super::{into_rank4, missing_cache, Layer, Mode};
use crate::error::TrainingFailure;
use crate::optim::Param;

/// Per-channel normalization of `[N, C, H, W]` activations
///
/// Training uses batch statistics and updates the running averages with
/// `running = momentum * running + (1 - momentum) * batch`. Inference uses
/// the running averages.
#[derive(Debug)]
pub struct BatchNorm {
    gamma: Param,
    beta: Param,
    running_mean: Array1<f32>,
    running_var: Array1<f32>,
    momentum: f32,
    epsilon: f32,
    normalized: Option<Array4<f32>>,
    inv_std: Option<Array1<f32>>,
}

impl BatchNorm {
    pub fn new(channels: usize) -> Self {
        Self {
            gamma: Param::new(ArrayD::ones(IxDyn(&[channels]))),
            beta: Param::new(ArrayD::zeros(IxDyn(&[channels]))),
            running_mean: Array1::zeros(channels),
            running_var: Array1::ones(channels),
            momentum: 0.99,
            epsilon: 1e-3,
            normalized: None,
            inv_std: None,
        }
    }

    #[cfg(test)]
    fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    #[cfg(test)]
    fn running_mean(&self) -> &Array1<f32> {
        &self.running_mean
    }

    #[cfg(test)]
    fn running_var(&self) -> &Array1<f32> {
        &self.running_var
    }
}

impl Layer for BatchNorm {
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        let mut x = into_rank4(input)?;
        let channels = x.len_of(Axis(1));
        if channels != self.running_mean.len() {
            let (n, _, h, w) = x.dim();
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n, self.running_mean.len(), h, w],
                actual: vec![n, channels, h, w],
            });
        }
        let per_channel = (x.len() / channels.max(1)).max(1) as f32;

        let (mean, var) = match mode {
            Mode::Train => {
                let mut mean = Array1::<f32>::zeros(channels);
                let mut var = Array1::<f32>::zeros(channels);
                for (c, plane) in x.axis_iter(Axis(1)).enumerate() {
                    let m = plane.sum() / per_channel;
                    mean[c] = m;
                    var[c] = plane.fold(0.0, |acc, v| acc + (v - m) * (v - m)) / per_channel;
                }
                let momentum = self.momentum;
                let blend = |r: &mut f32, &b: &f32| *r = momentum * *r + (1.0 - momentum) * b;
                self.running_mean.zip_mut_with(&mean, blend);
                self.running_var.zip_mut_with(&var, blend);
                (mean, var)
            }
            Mode::Infer => (self.running_mean.clone(), self.running_var.clone()),
        };

        let inv_std = var.mapv(|v| 1.0 / (v + self.epsilon).sqrt());
        for (c, mut plane) in x.axis_iter_mut(Axis(1)).enumerate() {
            let (m, s) = (mean[c], inv_std[c]);
            plane.mapv_inplace(|v| (v - m) * s);
        }
        let normalized = (mode == Mode::Train).then(|| x.clone());

        for (c, mut plane) in x.axis_iter_mut(Axis(1)).enumerate() {
            let (g, b) = (self.gamma.value[[c]], self.beta.value[[c]]);
            plane.mapv_inplace(|v| v * g + b);
        }

        if mode == Mode::Train {
            self.normalized = normalized;
            self.inv_std = Some(inv_std);
        }
        Ok(x.into_dyn())
    }

    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        let (Some(x_hat), Some(inv_std)) = (self.normalized.as_ref(), self.inv_std.as_ref()) else {
            return Err(missing_cache("batch_norm"));
        };
        let dy = into_rank4(grad)?;
        if dy.dim() != x_hat.dim() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: x_hat.shape().to_vec(),
                actual: dy.shape().to_vec(),
            });
        }
        let channels = dy.len_of(Axis(1));
        let m = (dy.len() / channels.max(1)).max(1) as f32;

        let mut dx = Array4::<f32>::zeros(dy.raw_dim());
        for c in 0..channels {
            let g = dy.index_axis(Axis(1), c);
            let xh = x_hat.index_axis(Axis(1), c);
            let dbeta = g.sum();
            let dgamma = (&g * &xh).sum();
            self.gamma.grad[[c]] += dgamma;
            self.beta.grad[[c]] += dbeta;

            // dx = γ/σ · (dy - mean(dy) - x̂ · mean(dy · x̂))
            let scale = self.gamma.value[[c]] * inv_std[c];
            let (mean_g, mean_gx) = (dbeta / m, dgamma / m);
            ndarray::Zip::from(dx.index_axis_mut(Axis(1), c))
                .and(&g)
                .and(&xh)
                .for_each(|d, &gv, &xv| *d = scale * (gv - mean_g - xv * mean_gx));
        }
        Ok(dx.into_dyn())
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.gamma, &mut self.beta]
    }

    fn name(&self) -> &'static str {
        "batch_norm"
    }
}
