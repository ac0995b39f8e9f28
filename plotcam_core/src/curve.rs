//! Parametric curves evaluated in curve-space coordinates.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::error::{ensure_in_range, GeometryError, Result};

/// Margin added to the largest endpoint coordinate when sizing axis ranges.
pub const RANGE_MARGIN: f64 = 0.2;

/// A pure map `t ↦ (x, y, z)` over a closed domain.
pub trait ParametricCurve {
    /// Closed parameter domain `(t_start, t_end)`.
    fn domain(&self) -> (f64, f64);

    /// Evaluates without checking the domain.
    fn eval(&self, t: f64) -> Point3<f64>;

    /// Evaluates at `t`, rejecting parameters outside the domain.
    fn point(&self, t: f64) -> Result<Point3<f64>> {
        let (start, end) = self.domain();
        let t = ensure_in_range("curve parameter", t, start, end)?;
        Ok(self.eval(t))
    }

    fn start(&self) -> Point3<f64> {
        self.eval(self.domain().0)
    }

    fn end(&self) -> Point3<f64> {
        self.eval(self.domain().1)
    }

    /// `n` uniformly spaced samples over the whole domain.
    fn sample(&self, n: usize) -> Vec<Point3<f64>> {
        let (start, end) = self.domain();
        linspace(start, end, n).into_iter().map(|t| self.eval(t)).collect()
    }

    /// `n` uniformly spaced samples over `[start, until]`.
    fn sample_until(&self, until: f64, n: usize) -> Result<Vec<Point3<f64>>> {
        let (start, end) = self.domain();
        let until = ensure_in_range("curve parameter", until, start, end)?;
        Ok(linspace(start, until, n).into_iter().map(|t| self.eval(t)).collect())
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// `n = 1` yields just `start`; `n = 0` yields nothing.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Per-axis upper bounds for a frame enclosing the curve's endpoints.
///
/// Each bound is the largest absolute endpoint coordinate plus `margin`, so
/// the endpoints never touch the frame boundary.
pub fn endpoint_extents<C: ParametricCurve + ?Sized>(curve: &C, margin: f64) -> [f64; 3] {
    let (a, b) = (curve.start(), curve.end());
    [
        a.x.abs().max(b.x.abs()) + margin,
        a.y.abs().max(b.y.abs()) + margin,
        a.z.abs().max(b.z.abs()) + margin,
    ]
}

/// Optimal hyperparameters `(x, y)` against budget `z`.
///
/// `x = 3·t^(−1/2) − 1`, `y = t²`, `z = 1 − ½·sin(π(t − 1.2))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetCurve {
    pub t_start: f64,
    pub t_end: f64,
}

impl Default for BudgetCurve {
    fn default() -> Self {
        Self {
            t_start: 1.0,
            t_end: 2.0,
        }
    }
}

impl BudgetCurve {
    /// Creates the curve over `[t_start, t_end]`. `t_start` must be positive
    /// because `x` has a pole at zero.
    pub fn new(t_start: f64, t_end: f64) -> Result<Self> {
        if !(t_start > 0.0 && t_end > t_start) {
            return Err(GeometryError::out_of_range(
                "curve domain start",
                t_start,
                f64::MIN_POSITIVE,
                t_end,
            ));
        }
        Ok(Self { t_start, t_end })
    }
}

impl ParametricCurve for BudgetCurve {
    fn domain(&self) -> (f64, f64) {
        (self.t_start, self.t_end)
    }

    fn eval(&self, t: f64) -> Point3<f64> {
        Point3::new(
            3.0 * t.powf(-0.5) - 1.0,
            t * t,
            1.0 - 0.5 * (PI * (t - 1.2)).sin(),
        )
    }
}

/// Closed ellipse in the XY plane, one lap over `u ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseLoop {
    pub semi_x: f64,
    pub semi_y: f64,
}

impl Default for EllipseLoop {
    fn default() -> Self {
        Self {
            semi_x: 3.0,
            semi_y: 2.0,
        }
    }
}

impl ParametricCurve for EllipseLoop {
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn eval(&self, u: f64) -> Point3<f64> {
        let angle = TAU * u;
        Point3::new(self.semi_x * angle.cos(), self.semi_y * angle.sin(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_budget_curve_closed_form() {
        let curve = BudgetCurve::default();

        let p1 = curve.point(1.0).unwrap();
        assert_relative_eq!(p1.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p1.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p1.z, 1.0 - 0.5 * (-0.2 * PI).sin(), epsilon = 1e-12);

        let p2 = curve.point(2.0).unwrap();
        assert_relative_eq!(p2.x, 3.0 / 2f64.sqrt() - 1.0, epsilon = 1e-12);
        assert_relative_eq!(p2.y, 4.0, epsilon = 1e-12);
        assert_relative_eq!(p2.z, 1.0 - 0.5 * (0.8 * PI).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_ellipse_quarter_points() {
        let curve = EllipseLoop::default();
        assert_relative_eq!(curve.point(0.0).unwrap(), Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            curve.point(0.25).unwrap(),
            Point3::new(0.0, 2.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            curve.point(0.5).unwrap(),
            Point3::new(-3.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(curve.point(1.0).unwrap(), curve.point(0.0).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_domain() {
        let curve = BudgetCurve::default();
        assert!(curve.point(0.99).unwrap_err().is_out_of_range());
        assert!(curve.point(2.01).unwrap_err().is_out_of_range());
        assert!(EllipseLoop::default().point(-0.1).is_err());
        assert!(BudgetCurve::new(0.0, 1.0).is_err());
        assert!(BudgetCurve::new(2.0, 1.0).is_err());
    }

    #[test]
    fn test_continuity_finite_differences() {
        let curve = BudgetCurve::default();
        for &t in &[1.0, 1.3, 1.7, 1.99] {
            let d1 = (curve.eval(t + 1e-3) - curve.eval(t)).norm();
            let d2 = (curve.eval(t + 1e-4) - curve.eval(t)).norm();
            assert!(d1 > 0.0);
            // differences shrink roughly in proportion to ε
            assert_relative_eq!(d1 / d2, 10.0, epsilon = 0.1);
        }
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
        let xs = linspace(1.0, 2.0, 220);
        assert_eq!(xs.len(), 220);
        assert_eq!(xs[0], 1.0);
        assert_eq!(xs[219], 2.0);
    }

    #[test]
    fn test_endpoint_extents() {
        let [x, y, z] = endpoint_extents(&BudgetCurve::default(), RANGE_MARGIN);
        assert_relative_eq!(x, 2.2, epsilon = 1e-12);
        assert_relative_eq!(y, 4.2, epsilon = 1e-12);
        let z_start = 1.0 - 0.5 * (-0.2 * PI).sin();
        assert_relative_eq!(z, z_start + 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_until() {
        let curve = EllipseLoop::default();
        let pts = curve.sample_until(0.25, 3).unwrap();
        assert_eq!(pts.len(), 3);
        assert_relative_eq!(pts[2], Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert!(curve.sample_until(1.5, 3).is_err());
    }
}
