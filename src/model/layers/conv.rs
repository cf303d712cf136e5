//! 2-D convolution (stride 1, zero padding) with ReLU

use ndarray::{s, Array2, Array4, ArrayD, ArrayView3, ArrayViewMut3, Axis, IxDyn};
use rand::Rng;

use super::{glorot_uniform, into_rank4, matrix, matrix_mut, missing_cache, Layer, Mode};
use crate::error::TrainingFailure;
use crate::optim::Param;

/// Convolution lowered to a matrix product over im2col patches
///
/// Weights are stored as `[filters, in_channels * k * k]`. Only the padded
/// input is cached for backward; patches are rebuilt one image at a time.
#[derive(Debug)]
pub struct Conv2d {
    weight: Param,
    bias: Param,
    kernel: usize,
    padding: usize,
    l2: f32,
    padded: Option<Array4<f32>>,
    output: Option<Array4<f32>>,
}

impl Conv2d {
    /// Glorot-uniform weights, zero bias
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        filters: usize,
        kernel: usize,
        padding: usize,
        rng: &mut R,
    ) -> Self {
        let patch = in_channels * kernel * kernel;
        let weight = glorot_uniform(&[filters, patch], patch, filters * kernel * kernel, rng);
        Self {
            weight: Param::new(weight),
            bias: Param::new(ArrayD::zeros(IxDyn(&[filters]))),
            kernel,
            padding,
            l2: 0.0,
            padded: None,
            output: None,
        }
    }

    /// Add an L2 penalty `l2 * Σw²` on the kernel
    pub fn with_l2(mut self, l2: f32) -> Self {
        self.l2 = l2;
        self
    }

    pub fn filters(&self) -> usize {
        self.weight.value.shape()[0]
    }

    fn in_channels(&self) -> usize {
        self.weight.value.shape()[1] / (self.kernel * self.kernel)
    }

    fn pad(&self, x: &Array4<f32>) -> Array4<f32> {
        let (n, c, h, w) = x.dim();
        let p = self.padding;
        let mut padded = Array4::zeros((n, c, h + 2 * p, w + 2 * p));
        padded.slice_mut(s![.., .., p..p + h, p..p + w]).assign(x);
        padded
    }

    /// Patch matrix `[C*k*k, Ho*Wo]` for one padded image
    fn im2col(&self, image: ArrayView3<f32>, ho: usize, wo: usize) -> Array2<f32> {
        let k = self.kernel;
        let channels = image.len_of(Axis(0));
        let mut cols = Array2::zeros((channels * k * k, ho * wo));
        for c in 0..channels {
            for ki in 0..k {
                for kj in 0..k {
                    let row = (c * k + ki) * k + kj;
                    let window = image.slice(s![c, ki..ki + ho, kj..kj + wo]);
                    for (dst, src) in cols.row_mut(row).iter_mut().zip(window.iter()) {
                        *dst = *src;
                    }
                }
            }
        }
        cols
    }

    /// Scatter-add patch gradients back onto one padded image
    fn col2im(&self, cols: &Array2<f32>, mut image: ArrayViewMut3<f32>, ho: usize, wo: usize) {
        let k = self.kernel;
        let channels = image.len_of(Axis(0));
        for c in 0..channels {
            for ki in 0..k {
                for kj in 0..k {
                    let row = (c * k + ki) * k + kj;
                    let mut window = image.slice_mut(s![c, ki..ki + ho, kj..kj + wo]);
                    for (dst, src) in window.iter_mut().zip(cols.row(row).iter()) {
                        *dst += *src;
                    }
                }
            }
        }
    }
}

impl Layer for Conv2d {
    fn forward(&mut self, input: ArrayD<f32>, mode: Mode) -> Result<ArrayD<f32>, TrainingFailure> {
        let x = into_rank4(input)?;
        let (n, c, h, w) = x.dim();
        if c != self.in_channels() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n, self.in_channels(), h, w],
                actual: vec![n, c, h, w],
            });
        }
        let padded = self.pad(&x);
        let k = self.kernel;
        let (hp, wp) = (h + 2 * self.padding, w + 2 * self.padding);
        if hp < k || wp < k {
            return Err(TrainingFailure::ShapeMismatch {
                expected: vec![n, c, k, k],
                actual: vec![n, c, hp, wp],
            });
        }
        let (ho, wo) = (hp - k + 1, wp - k + 1);

        let weight = matrix(&self.weight.value)?;
        let filters = weight.nrows();
        let mut out = Array4::<f32>::zeros((n, filters, ho, wo));
        for (image, mut dst) in padded.outer_iter().zip(out.outer_iter_mut()) {
            let z = weight.dot(&self.im2col(image, ho, wo));
            for (f, (mut plane, row)) in dst.outer_iter_mut().zip(z.outer_iter()).enumerate() {
                let b = self.bias.value[[f]];
                for (d, &v) in plane.iter_mut().zip(row.iter()) {
                    *d = (v + b).max(0.0);
                }
            }
        }

        if mode == Mode::Train {
            self.padded = Some(padded);
            self.output = Some(out.clone());
        }
        Ok(out.into_dyn())
    }

    fn backward(&mut self, grad: ArrayD<f32>) -> Result<ArrayD<f32>, TrainingFailure> {
        let (Some(padded), Some(output)) = (self.padded.as_ref(), self.output.as_ref()) else {
            return Err(missing_cache("conv2d"));
        };
        let mut dz = into_rank4(grad)?;
        if dz.dim() != output.dim() {
            return Err(TrainingFailure::ShapeMismatch {
                expected: output.shape().to_vec(),
                actual: dz.shape().to_vec(),
            });
        }
        dz.zip_mut_with(output, |g, &y| {
            if y <= 0.0 {
                *g = 0.0;
            }
        });

        let (n, filters, ho, wo) = dz.dim();
        let weight = matrix(&self.weight.value)?;
        let mut dweight = Array2::<f32>::zeros(weight.raw_dim());
        let mut dpadded = Array4::<f32>::zeros(padded.raw_dim());
        for i in 0..n {
            let image = padded.index_axis(Axis(0), i);
            let cols = self.im2col(image, ho, wo);
            let g = dz
                .index_axis(Axis(0), i)
                .to_owned()
                .into_shape_with_order((filters, ho * wo))
                .map_err(|e| TrainingFailure::Other(e.to_string()))?;
            dweight += &g.dot(&cols.t());
            let dcols = weight.t().dot(&g);
            self.col2im(&dcols, dpadded.index_axis_mut(Axis(0), i), ho, wo);
        }
        let dbias = dz.sum_axis(Axis(3)).sum_axis(Axis(2)).sum_axis(Axis(0));

        if self.l2 > 0.0 {
            dweight.scaled_add(2.0 * self.l2, &weight);
        }
        let mut wgrad = matrix_mut(&mut self.weight.grad)?;
        wgrad += &dweight;
        self.bias.grad += &dbias.into_dyn();

        let p = self.padding;
        let (_, _, hp, wp) = dpadded.dim();
        let dx = dpadded.slice(s![.., .., p..hp - p, p..wp - p]).to_owned();
        Ok(dx.into_dyn())
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.weight, &mut self.bias]
    }

    fn l2_penalty(&self) -> f32 {
        self.l2 * self.weight.sum_squares()
    }

    fn name(&self) -> &'static str {
        "conv2d"
    }
}
