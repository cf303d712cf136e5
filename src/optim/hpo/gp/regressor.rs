//! Exact Gaussian process regression

use ndarray::{Array1, Array2, ArrayView1};

use super::kernel::Matern52;
use super::linalg::{cholesky, solve_lower, solve_lower_transpose};

/// Length scales tried when fitting (unit-cube coordinates)
const LENGTH_SCALE_GRID: [f64; 8] = [0.05, 0.1, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0];

/// Diagonal jitter schedule for ill-conditioned Gram matrices
const JITTER: [f64; 5] = [0.0, 1e-8, 1e-6, 1e-4, 1e-2];

/// Fitted Gaussian process
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    kernel: Matern52,
    x: Array2<f64>,
    chol: Array2<f64>,
    alpha: Array1<f64>,
    y_mean: f64,
    y_std: f64,
    log_marginal_likelihood: f64,
}

impl GaussianProcess {
    /// Fit to observations `x` (n × d) and targets `y` (n)
    ///
    /// `noise` is added to the Gram diagonal. Returns `None` if `x` is empty,
    /// shapes disagree, or no length scale yields a factorizable Gram matrix.
    pub fn fit(x: Array2<f64>, y: &Array1<f64>, noise: f64) -> Option<Self> {
        let n = x.nrows();
        if n == 0 || y.len() != n {
            return None;
        }

        let y_mean = y.mean().unwrap_or(0.0);
        let y_std = {
            let var = y.mapv(|v| (v - y_mean).powi(2)).sum() / n as f64;
            let std = var.sqrt();
            if std > 1e-12 && std.is_finite() {
                std
            } else {
                1.0
            }
        };
        let y_norm = y.mapv(|v| (v - y_mean) / y_std);

        let mut best: Option<Self> = None;
        for &length_scale in &LENGTH_SCALE_GRID {
            let kernel = Matern52::new(length_scale);
            let Some(candidate) = Self::fit_with_kernel(kernel, &x, &y_norm, noise) else {
                continue;
            };
            let better = best
                .as_ref()
                .is_none_or(|b| candidate.log_marginal_likelihood > b.log_marginal_likelihood);
            if better {
                best = Some(Self { y_mean, y_std, ..candidate });
            }
        }
        best
    }

    fn fit_with_kernel(
        kernel: Matern52,
        x: &Array2<f64>,
        y_norm: &Array1<f64>,
        noise: f64,
    ) -> Option<Self> {
        let n = x.nrows();
        let gram = kernel.gram(x.view());
        let chol = JITTER.iter().find_map(|&jitter| {
            let mut k = gram.clone();
            for i in 0..n {
                k[[i, i]] += noise + jitter;
            }
            cholesky(&k)
        })?;

        let alpha = solve_lower_transpose(&chol, &solve_lower(&chol, y_norm));
        let log_det: f64 = chol.diag().iter().map(|d| d.ln()).sum();
        let lml = -0.5 * y_norm.dot(&alpha)
            - log_det
            - 0.5 * n as f64 * (2.0 * std::f64::consts::PI).ln();
        if !lml.is_finite() {
            return None;
        }

        Some(Self {
            kernel,
            x: x.clone(),
            chol,
            alpha,
            y_mean: 0.0,
            y_std: 1.0,
            log_marginal_likelihood: lml,
        })
    }

    /// Posterior mean and standard deviation at `query`, in target units
    pub fn predict(&self, query: ArrayView1<'_, f64>) -> (f64, f64) {
        let k_star = self.kernel.cross(self.x.view(), query);
        let mean = k_star.dot(&self.alpha);
        let v = solve_lower(&self.chol, &k_star);
        let var = (1.0 - v.dot(&v)).max(0.0);
        (mean * self.y_std + self.y_mean, var.sqrt() * self.y_std)
    }

    /// Selected kernel length scale
    pub fn length_scale(&self) -> f64 {
        self.kernel.length_scale
    }

    /// Log marginal likelihood of the standardized targets
    pub fn log_marginal_likelihood(&self) -> f64 {
        self.log_marginal_likelihood
    }

    /// Number of training points
    pub fn n_observations(&self) -> usize {
        self.x.nrows()
    }
}
