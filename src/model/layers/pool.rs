//! Max pooling

use ndarray::{Array4, ArrayD};

use super::{into_rank4, missing_cache, Layer, Mode};
use crate::error::TrainingFailure;

/// Max pooling with no padding: output side is `(side - size) / stride + 1`
#[derive(Debug)]
pub struct MaxPool2d {
    size: usize,
    stride: usize,
    input_dim: Option<(usize, usize, usize, usize)>,
    /// `(row, col)` of the winning input for every output element
    argmax: Vec<(usize, usize)>,
}

impl MaxPool2d {
    pub fn new(size: usize, stride: usize) -> Self {
        Self { size, stride: stride.max(1), input_dim: None, argmax: Vec::new() }
    }

    /// Output side length for an input side, `None` if the window does not fit
    pub fn output_side(&self, side: usize) -> Option<usize> {
        (side >= self.size && self.size > 0).then(|| (side - self.size) / self.stride + 1)
    }
}

impl Layer for MaxPool2d {
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        let x = into_rank4(input)?;
        let (n, c, h, w) = x.dim();
        let (Some(ho), Some(wo)) = (self.output_side(h), self.output_side(w)) else {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n, c, self.size, self.size],
                actual: vec![n, c, h, w],
            });
        };

        let mut out = Array4::<f32>::zeros((n, c, ho, wo));
        let mut argmax = Vec::with_capacity(n * c * ho * wo);
        for b in 0..n {
            for ch in 0..c {
                for i in 0..ho {
                    for j in 0..wo {
                        let (r0, c0) = (i * self.stride, j * self.stride);
                        let mut best = (r0, c0);
                        let mut value = f32::NEG_INFINITY;
                        for r in r0..r0 + self.size {
                            for col in c0..c0 + self.size {
                                let v = x[[b, ch, r, col]];
                                if v > value || v.is_nan() {
                                    value = v;
                                    best = (r, col);
                                }
                            }
                        }
                        out[[b, ch, i, j]] = value;
                        argmax.push(best);
                    }
                }
            }
        }

        if mode == Mode::Train {
            self.input_dim = Some((n, c, h, w));
            self.argmax = argmax;
        }
        Ok(out.into_dyn())
    }

    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        let Some(dim) = self.input_dim else {
            return Err(missing_cache("max_pool"));
        };
        let dy = into_rank4(grad)?;
        if dy.len() != self.argmax.len() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![self.argmax.len()],
                actual: dy.shape().to_vec(),
            });
        }
        let mut dx = Array4::<f32>::zeros(dim);
        for (((b, ch, _, _), g), &(r, col)) in dy.indexed_iter().zip(&self.argmax) {
            dx[[b, ch, r, col]] += *g;
        }
        Ok(dx.into_dyn())
    }

    fn name(&self) -> &'static str {
        "max_pool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn test_output_side() {
        assert_eq!(MaxPool2d::new(3, 2).output_side(221), Some(110));
        assert_eq!(MaxPool2d::new(2, 2).output_side(110), Some(55));
        assert_eq!(MaxPool2d::new(3, 2).output_side(2), None);
    }

    #[test]
    fn test_forward_picks_window_max() {
        let mut pool = MaxPool2d::new(2, 2);
        let x = Array::from_shape_vec(
            IxDyn(&[1, 1, 2, 4]),
            vec![1.0, 5.0, 2.0, 0.0, 3.0, 4.0, 8.0, 7.0],
        )
        .unwrap();
        let y = pool.forward(x, Mode::Infer).unwrap();
        assert_eq!(y.shape(), &[1, 1, 1, 2]);
        assert_eq!(y[[0, 0, 0, 0]], 5.0);
        assert_eq!(y[[0, 0, 0, 1]], 8.0);
    }

    #[test]
    fn test_backward_routes_to_argmax() {
        let mut pool = MaxPool2d::new(2, 2);
        let x = Array::from_shape_vec(
            IxDyn(&[1, 1, 2, 4]),
            vec![1.0, 5.0, 2.0, 0.0, 3.0, 4.0, 8.0, 7.0],
        )
        .unwrap();
        pool.forward(x, Mode::Train).unwrap();
        let dy = Array::from_shape_vec(IxDyn(&[1, 1, 1, 2]), vec![1.0, 2.0]).unwrap();
        let dx = pool.backward(dy).unwrap();
        assert_eq!(dx.as_slice().unwrap(), &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_overlapping_windows_accumulate() {
        let mut pool = MaxPool2d::new(3, 2);
        let mut x = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 3, 5]));
        x[[0, 0, 1, 2]] = 9.0;
        pool.forward(x, Mode::Train).unwrap();
        let dx = pool.backward(ArrayD::ones(IxDyn(&[1, 1, 1, 2]))).unwrap();
        assert_eq!(dx[[0, 0, 1, 2]], 2.0);
    }
}
