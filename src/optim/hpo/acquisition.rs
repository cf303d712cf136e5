//! Acquisition function evaluation

use super::types::AcquisitionFunction;

impl AcquisitionFunction {
    /// Score a point from its posterior `mean`/`std` and the best observed target
    ///
    /// Higher is better for every variant.
    pub fn evaluate(&self, mean: f64, std: f64, best: f64) -> f64 {
        match *self {
            AcquisitionFunction::UpperConfidenceBound { kappa } => mean + kappa * std,
            AcquisitionFunction::ExpectedImprovement { xi } => {
                let improvement = mean - best - xi;
                if std <= 0.0 {
                    return improvement.max(0.0);
                }
                let z = improvement / std;
                improvement * normal_cdf(z) + std * normal_pdf(z)
            }
            AcquisitionFunction::ProbabilityOfImprovement { xi } => {
                let improvement = mean - best - xi;
                if std <= 0.0 {
                    return if improvement > 0.0 { 1.0 } else { 0.0 };
                }
                normal_cdf(improvement / std)
            }
        }
    }
}

/// Standard normal density
pub fn normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Standard normal cumulative distribution
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Complementary error function (Chebyshev fit, |error| < 1.2e-7)
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}
