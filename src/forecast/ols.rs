//! Closed-form ordinary least squares for a single time regressor

use crate::error::{Error, Result};
use crate::region::RegionId;

/// Fitted line `value(t) = slope * t + intercept`, with `t` in months and
/// `t = 0` at a region's first observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit (1.0 for a constant series)
    pub r_squared: f64,
}

impl RegionModel {
    /// Fit `(t, value)` points.
    ///
    /// Fails with `Error::ModelFit` for fewer than two points, when every
    /// point has the same `t`, or when the coefficients are not finite.
    pub fn fit(region: &RegionId, points: &[(f64, f64)]) -> Result<Self> {
        let n = points.len();
        if n < 2 {
            return Err(Error::ModelFit {
                region: region.to_string(),
                reason: format!("need at least 2 time points, got {}", n),
            });
        }

        let n_f = n as f64;
        let t_mean = points.iter().map(|(t, _)| t).sum::<f64>() / n_f;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n_f;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for &(t, y) in points {
            let dt = t - t_mean;
            sxx += dt * dt;
            sxy += dt * (y - y_mean);
        }
        if sxx == 0.0 {
            return Err(Error::ModelFit {
                region: region.to_string(),
                reason: "all observations share one time index".to_string(),
            });
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * t_mean;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(Error::ModelFit {
                region: region.to_string(),
                reason: "regression coefficients are not finite".to_string(),
            });
        }

        let ss_total: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
        let ss_residual: f64 = points
            .iter()
            .map(|(t, y)| (y - (slope * t + intercept)).powi(2))
            .sum();
        let r_squared = if ss_total > 0.0 {
            1.0 - ss_residual / ss_total
        } else {
            1.0
        };

        Ok(RegionModel {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn predict(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> RegionId {
        RegionId::new("98101")
    }

    fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
        values.iter().enumerate().map(|(t, &y)| (t as f64, y)).collect()
    }

    #[test]
    fn test_exact_line() {
        let values: Vec<f64> = (0..30).map(|t| 100.0 + 5.0 * t as f64).collect();
        let model = RegionModel::fit(&region(), &indexed(&values)).unwrap();
        assert!((model.slope - 5.0).abs() < 1e-9);
        assert!((model.intercept - 100.0).abs() < 1e-9);
        assert!((model.r_squared - 1.0).abs() < 1e-12);
        assert!((model.predict(30.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_uneven_time_index() {
        // month 2 is missing; the line is still exact in calendar time
        let points = vec![(0.0, 100.0), (1.0, 105.0), (3.0, 115.0), (4.0, 120.0)];
        let model = RegionModel::fit(&region(), &points).unwrap();
        assert!((model.slope - 5.0).abs() < 1e-9);
        assert!((model.intercept - 100.0).abs() < 1e-9);
        assert!((model.predict(5.0) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_line() {
        let values = vec![1.5, 2.5, 5.5, 6.5];
        let model = RegionModel::fit(&region(), &indexed(&values)).unwrap();
        assert!((model.slope - 1.8).abs() < 1e-12);
        assert!((model.intercept - 1.3).abs() < 1e-12);
        assert!(model.r_squared < 1.0);
    }

    #[test]
    fn test_constant_series() {
        let model = RegionModel::fit(&region(), &indexed(&[7.0, 7.0, 7.0])).unwrap();
        assert_eq!(model.slope, 0.0);
        assert_eq!(model.intercept, 7.0);
        assert_eq!(model.r_squared, 1.0);
    }

    #[test]
    fn test_too_few_points() {
        assert!(matches!(
            RegionModel::fit(&region(), &[(0.0, 1.0)]),
            Err(Error::ModelFit { .. })
        ));
        assert!(matches!(
            RegionModel::fit(&region(), &[]),
            Err(Error::ModelFit { .. })
        ));
        assert!(matches!(
            RegionModel::fit(&region(), &[(2.0, 1.0), (2.0, 3.0)]),
            Err(Error::ModelFit { .. })
        ));
    }

    #[test]
    fn test_non_finite_input() {
        assert!(RegionModel::fit(&region(), &indexed(&[1.0, f64::INFINITY, 3.0])).is_err());
    }
}
