//! Grid search for hyperparameter optimization

use rand::rngs::StdRng;

use super::proposer::{Observation, Proposer};

/// Regular grid over the unit cube, visited in lexicographic order
///
/// Grid points that already have an observation are skipped. Once every point
/// is used the grid wraps around.
#[derive(Debug, Clone)]
pub struct GridProposer {
    /// Grid points per dimension
    pub(crate) n_points: usize,
    cursor: usize,
}

/// Evenly spaced coordinates in `[0, 1]`
fn axis_values(n_points: usize) -> Vec<f64> {
    let divisor = (n_points - 1) as f64;
    (0..n_points).map(|i| i as f64 / divisor).collect()
}

impl GridProposer {
    /// Create new grid proposer
    pub fn new(n_points: usize) -> Self {
        Self { n_points: n_points.max(2), cursor: 0 }
    }

    /// Total grid size for `dim` dimensions
    pub fn len(&self, dim: usize) -> usize {
        self.n_points.saturating_pow(dim as u32)
    }

    /// Grid point with lexicographic index `index`
    pub fn point(&self, index: usize, dim: usize) -> Vec<f64> {
        let axis = axis_values(self.n_points);
        let mut rest = index;
        let mut point = vec![0.0; dim];
        for d in (0..dim).rev() {
            point[d] = axis[rest % self.n_points];
            rest /= self.n_points;
        }
        point
    }

    /// All grid points in visiting order
    #[cfg(test)]
    fn configurations(&self, dim: usize) -> Vec<Vec<f64>> {
        (0..self.len(dim)).map(|i| self.point(i, dim)).collect()
    }
}

fn already_observed(point: &[f64], observations: &[Observation]) -> bool {
    observations.iter().any(|o| {
        o.point.len() == point.len()
            && o.point.iter().zip(point).all(|(a, b)| (a - b).abs() < 1e-9)
    })
}

impl Proposer for GridProposer {
    fn propose(&mut self, observations: &[Observation], dim: usize, _rng: &mut StdRng) -> Vec<f64> {
        let total = self.len(dim).max(1);
        for _ in 0..total {
            let point = self.point(self.cursor % total, dim);
            self.cursor += 1;
            if !already_observed(&point, observations) {
                return point;
            }
        }
        let point = self.point(self.cursor % total, dim);
        self.cursor += 1;
        point
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}
