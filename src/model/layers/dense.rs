//! Fully connected layer

use ndarray::{Array2, ArrayD, Axis, IxDyn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{glorot_uniform, into_rank2, matrix, matrix_mut, missing_cache, Layer, Mode};
use crate::error::TrainingFailure;
use crate::optim::Param;

/// Output activation of a [`Dense`] layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Softmax,
}

/// `y = act(x · W + b)` with `W: [in, out]`
///
/// Inputs of any rank are flattened to `[N, features]`. With softmax
/// activation, `backward` takes the gradient w.r.t. the logits; the network
/// fuses softmax with the cross-entropy loss.
#[derive(Debug)]
pub struct Dense {
    weight: Param,
    bias: Param,
    activation: Activation,
    input: Option<Array2<f32>>,
    input_shape: Vec<usize>,
    output: Option<Array2<f32>>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias
    pub fn new<R: Rng + ?Sized>(
        inputs: usize,
        units: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        Self {
            weight: Param::new(glorot_uniform(&[inputs, units], inputs, units, rng)),
            bias: Param::new(ArrayD::zeros(IxDyn(&[units]))),
            activation,
            input: None,
            input_shape: Vec::new(),
            output: None,
        }
    }

    pub fn units(&self) -> usize {
        self.weight.value.shape()[1]
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}

/// Row-wise softmax, shifted by the row max for stability
pub fn softmax(logits: &mut Array2<f32>) {
    for mut row in logits.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
}

impl Layer for Dense {
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        let shape = input.shape().to_vec();
        let batch = shape.first().copied().unwrap_or(0);
        let features = if batch == 0 { 0 } else { input.len() / batch };
        let weight = matrix(&self.weight.value)?;
        if features != weight.nrows() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![batch, weight.nrows()],
                actual: shape,
            });
        }
        let x = input
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((batch, features))
            .map_err(|e| TrainingFailure::Other(e.to_string()))?;

        let mut z = x.dot(&weight);
        for mut row in z.rows_mut() {
            row.zip_mut_with(&self.bias.value, |v, &b| *v += b);
        }
        match self.activation {
            Activation::Linear => {}
            Activation::Relu => z.mapv_inplace(|v| v.max(0.0)),
            Activation::Softmax => softmax(&mut z),
        }

        if mode == Mode::Train {
            self.input = Some(x);
            self.input_shape = shape;
            self.output = Some(z.clone());
        }
        Ok(z.into_dyn())
    }

    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        let (Some(x), Some(y)) = (self.input.as_ref(), self.output.as_ref()) else {
            return Err(missing_cache("dense"));
        };
        let mut dz = into_rank2(grad)?;
        if dz.dim() != y.dim() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: y.shape().to_vec(),
                actual: dz.shape().to_vec(),
            });
        }
        if self.activation == Activation::Relu {
            dz.zip_mut_with(y, |g, &out| {
                if out <= 0.0 {
                    *g = 0.0;
                }
            });
        }

        let dweight = x.t().dot(&dz);
        let dbias = dz.sum_axis(Axis(0));
        let dx = dz.dot(&matrix(&self.weight.value)?.t());

        let mut wgrad = matrix_mut(&mut self.weight.grad)?;
        wgrad += &dweight;
        self.bias.grad += &dbias.into_dyn();

        dx.into_dyn()
            .into_shape_with_order(IxDyn(&self.input_shape))
            .map_err(|e| TrainingFailure::Other(e.to_string()))
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.weight, &mut self.bias]
    }

    fn name(&self) -> &'static str {
        "dense"
    }
}
