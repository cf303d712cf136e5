//! Matérn 5/2 covariance

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Matérn kernel with ν = 5/2 and unit signal variance
///
/// k(r) = (1 + √5 r/ℓ + 5r²/(3ℓ²)) · exp(-√5 r/ℓ)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matern52 {
    pub length_scale: f64,
}

impl Matern52 {
    pub fn new(length_scale: f64) -> Self {
        Self { length_scale }
    }

    /// Covariance between two points
    pub fn eval(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        let r = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt();
        let s = 5.0_f64.sqrt() * r / self.length_scale;
        (1.0 + s + s * s / 3.0) * (-s).exp()
    }

    /// Gram matrix `K[i, j] = k(x_i, x_j)`
    pub fn gram(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let n = x.nrows();
        let mut k = Array2::zeros((n, n));
        for i in 0..n {
            k[[i, i]] = 1.0;
            for j in 0..i {
                let v = self.eval(x.row(i), x.row(j));
                k[[i, j]] = v;
                k[[j, i]] = v;
            }
        }
        k
    }

    /// Cross-covariance between every training row and one query point
    pub fn cross(&self, x: ArrayView2<'_, f64>, query: ArrayView1<'_, f64>) -> Array1<f64> {
        x.rows().into_iter().map(|row| self.eval(row, query)).collect()
    }
}
