//! Guided proposal strategies
//!
//! A [`Proposer`] turns the observations gathered so far into the next point
//! of the unit cube. The driver maps that point back into the search space,
//! so proposers never see raw hyperparameter values.

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;

use super::gp::GaussianProcess;
use super::types::AcquisitionFunction;

/// A point of the unit cube with its observed score
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub point: Vec<f64>,
    pub score: f64,
}

/// Surrogate capability: given observations, propose the next point
pub trait Proposer {
    /// Propose a point in `[0, 1]^dim`
    fn propose(&mut self, observations: &[Observation], dim: usize, rng: &mut StdRng) -> Vec<f64>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Uniform random point of the unit cube
pub(crate) fn random_point(dim: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..dim).map(|_| rng.random::<f64>()).collect()
}

/// Ignores observations and samples uniformly
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomProposer;

impl Proposer for RandomProposer {
    fn propose(&mut self, _observations: &[Observation], dim: usize, rng: &mut StdRng) -> Vec<f64> {
        random_point(dim, rng)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Gaussian process surrogate with acquisition maximization
///
/// The acquisition is evaluated at `samples` uniform points; the best
/// `restarts` of those are refined by a bounded pattern search.
#[derive(Debug, Clone)]
pub struct GaussianProcessProposer {
    acquisition: AcquisitionFunction,
    noise: f64,
    samples: usize,
    restarts: usize,
}

impl GaussianProcessProposer {
    pub fn new(acquisition: AcquisitionFunction) -> Self {
        Self { acquisition, noise: 1e-6, samples: 10_000, restarts: 10 }
    }

    /// Number of random points scored per proposal
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    /// Number of local refinements per proposal
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Observation noise added to the Gram diagonal
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.max(0.0);
        self
    }

    fn fit(&self, observations: &[Observation], dim: usize) -> Option<GaussianProcess> {
        let n = observations.len();
        let mut x = Array2::<f64>::zeros((n, dim));
        for (i, obs) in observations.iter().enumerate() {
            for (j, &v) in obs.point.iter().take(dim).enumerate() {
                x[[i, j]] = v;
            }
        }
        let y: Array1<f64> = observations.iter().map(|o| o.score).collect();
        GaussianProcess::fit(x, &y, self.noise)
    }

    fn score(&self, gp: &GaussianProcess, point: &[f64], best: f64) -> f64 {
        let (mean, std) = gp.predict(ArrayView1::from(point));
        self.acquisition.evaluate(mean, std, best)
    }

    /// Coordinate pattern search inside the unit cube
    fn refine(
        &self,
        gp: &GaussianProcess,
        start: Vec<f64>,
        start_score: f64,
        best: f64,
    ) -> (Vec<f64>, f64) {
        let mut point = start;
        let mut value = start_score;
        let mut step = 0.05;
        let mut evaluations = 0;
        while step > 1e-4 && evaluations < 400 {
            let mut improved = false;
            for d in 0..point.len() {
                for dir in [1.0, -1.0] {
                    let mut trial = point.clone();
                    trial[d] = (trial[d] + dir * step).clamp(0.0, 1.0);
                    let v = self.score(gp, &trial, best);
                    evaluations += 1;
                    if v > value {
                        point = trial;
                        value = v;
                        improved = true;
                    }
                }
            }
            if !improved {
                step *= 0.5;
            }
        }
        (point, value)
    }
}

impl Proposer for GaussianProcessProposer {
    fn propose(&mut self, observations: &[Observation], dim: usize, rng: &mut StdRng) -> Vec<f64> {
        let usable: Vec<Observation> =
            observations.iter().filter(|o| o.score.is_finite()).cloned().collect();
        let Some(gp) = self.fit(&usable, dim) else {
            return random_point(dim, rng);
        };
        let best = usable.iter().map(|o| o.score).fold(f64::NEG_INFINITY, f64::max);

        let mut scored: Vec<(Vec<f64>, f64)> = (0..self.samples)
            .map(|_| {
                let point = random_point(dim, rng);
                let value = self.score(&gp, &point, best);
                (point, value)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut winner = scored[0].clone();
        for (point, value) in scored.into_iter().take(self.restarts) {
            let refined = self.refine(&gp, point, value, best);
            if refined.1 > winner.1 {
                winner = refined;
            }
        }
        winner.0.into_iter().map(|v| v.clamp(0.0, 1.0)).collect()
    }

    fn name(&self) -> &'static str {
        "gaussian_process"
    }
}
