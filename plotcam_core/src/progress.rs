//! Progress-driven position and color along a closed loop.
//!
//! A single scalar `progress ∈ [0, 1]` drives everything: the marker sits at
//! `curve(progress)`, its color is the linear blend of two endpoint colors,
//! and the trail is the curve re-sampled from 0 to `progress`.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::curve::{linspace, ParametricCurve};
use crate::error::{ensure_in_range, GeometryError, Result};
use crate::path::SmoothPath;

/// Trail samples per unit of progress.
pub const TRAIL_DENSITY: f64 = 300.0;

/// Number of trail samples at progress `a`: `max(2, ⌊300·a⌋ + 2)`.
pub fn trail_sample_count(progress: f64) -> Result<usize> {
    let a = ensure_in_range("progress", progress, 0.0, 1.0)?;
    Ok(((TRAIL_DENSITY * a).floor() as usize + 2).max(2))
}

/// Monotone progress owned by the scene driver.
///
/// Once it reaches 1 it is frozen and ignores further updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    value: f64,
    frozen: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            value: 0.0,
            frozen: false,
        }
    }
}

impl ProgressState {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Moves progress forward to `target`.
    ///
    /// Fails with [`GeometryError::OutOfRange`] when `target` lies outside
    /// `[current, 1]`; progress never runs backwards.
    pub fn advance_to(&mut self, target: f64) -> Result<f64> {
        if self.frozen {
            return Ok(self.value);
        }
        self.value = ensure_in_range("progress", target, self.value, 1.0)?;
        if self.value >= 1.0 {
            self.frozen = true;
        }
        Ok(self.value)
    }
}

/// One evaluation of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    pub progress: f64,
    pub position: Point3<f64>,
    pub color: Rgb,
    pub trail: SmoothPath,
    /// Gradient color of every trail anchor, start color first.
    pub trail_colors: Vec<Rgb>,
}

/// Marker position and color swept along a loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSweep<C> {
    pub curve: C,
    pub from: Rgb,
    pub to: Rgb,
}

impl<C: ParametricCurve> ColorSweep<C> {
    pub fn new(curve: C, from: Rgb, to: Rgb) -> Self {
        Self { curve, from, to }
    }

    /// Maps `progress` onto the curve's domain.
    fn parameter(&self, progress: f64) -> f64 {
        let (start, end) = self.curve.domain();
        start + (end - start) * progress
    }

    /// Marker position at `progress`.
    pub fn position(&self, progress: f64) -> Result<Point3<f64>> {
        let a = ensure_in_range("progress", progress, 0.0, 1.0)?;
        self.curve.point(self.parameter(a))
    }

    /// Marker color at `progress`; exactly `from` at 0 and `to` at 1.
    pub fn color(&self, progress: f64) -> Result<Rgb> {
        let a = ensure_in_range("progress", progress, 0.0, 1.0)?;
        Ok(self.from.lerp(self.to, a))
    }

    /// Trail from the loop start to `progress`, with its gradient.
    pub fn trail(&self, progress: f64) -> Result<(SmoothPath, Vec<Rgb>)> {
        let n = trail_sample_count(progress)?;
        let (start, _) = self.curve.domain();
        let points: Vec<Point3<f64>> = linspace(start, self.parameter(progress), n)
            .into_iter()
            .map(|u| self.curve.eval(u))
            .collect();
        let colors = linspace(0.0, 1.0, n)
            .into_iter()
            .map(|f| self.from.lerp(self.to, f))
            .collect();
        Ok((SmoothPath::through(&points)?, colors))
    }

    /// Everything the renderer needs for one frame.
    pub fn sample(&self, progress: f64) -> Result<SweepSample> {
        let (trail, trail_colors) = self.trail(progress)?;
        Ok(SweepSample {
            progress,
            position: self.position(progress)?,
            color: self.color(progress)?,
            trail,
            trail_colors,
        })
    }
}

/// Convenience for callers holding an unchecked scalar: clamps into `[0, 1]`
/// first, as the frame driver does.
pub fn clamp_progress(progress: f64) -> Result<f64> {
    if progress.is_nan() {
        return Err(GeometryError::out_of_range("progress", progress, 0.0, 1.0));
    }
    Ok(progress.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLUE, GREEN};
    use crate::curve::EllipseLoop;
    use approx::assert_relative_eq;

    fn sweep() -> ColorSweep<EllipseLoop> {
        ColorSweep::new(EllipseLoop::default(), BLUE, GREEN)
    }

    #[test]
    fn test_trail_counts() {
        assert_eq!(trail_sample_count(0.0).unwrap(), 2);
        assert_eq!(trail_sample_count(0.5).unwrap(), 152);
        assert_eq!(trail_sample_count(1.0).unwrap(), 302);
        assert_eq!(trail_sample_count(0.001).unwrap(), 2);
        assert!(trail_sample_count(1.01).unwrap_err().is_out_of_range());
        assert!(trail_sample_count(-0.01).is_err());
    }

    #[test]
    fn test_color_endpoints_exact() {
        let s = sweep();
        assert_eq!(s.color(0.0).unwrap(), BLUE);
        assert_eq!(s.color(1.0).unwrap(), GREEN);
    }

    #[test]
    fn test_color_monotone_per_channel() {
        let s = sweep();
        let colors: Vec<Rgb> = (0..=100).map(|i| s.color(i as f64 / 100.0).unwrap()).collect();
        for w in colors.windows(2) {
            // BLUE -> GREEN: red rises, green and blue fall
            assert!(w[1].r >= w[0].r);
            assert!(w[1].g <= w[0].g);
            assert!(w[1].b <= w[0].b);
        }
    }

    #[test]
    fn test_position_follows_loop() {
        let s = sweep();
        assert_relative_eq!(s.position(0.25).unwrap(), Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert!(s.position(1.5).is_err());
    }

    #[test]
    fn test_trail_at_zero_is_two_points() {
        let (trail, colors) = sweep().trail(0.0).unwrap();
        let anchors = trail.anchors();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0], anchors[1]);
        assert_eq!(colors, vec![BLUE, GREEN]);
    }

    #[test]
    fn test_full_sample_ends_at_marker() {
        let sample = sweep().sample(1.0).unwrap();
        assert_eq!(sample.color, GREEN);
        assert_eq!(sample.trail.anchors().len(), 302);
        assert_eq!(sample.trail_colors.len(), 302);
        assert_relative_eq!(sample.trail.end(), sample.position, epsilon = 1e-12);
    }

    #[test]
    fn test_progress_state_monotone_and_freezes() {
        let mut state = ProgressState::default();
        assert_eq!(state.advance_to(0.4).unwrap(), 0.4);
        assert!(state.advance_to(0.3).unwrap_err().is_out_of_range());
        assert_eq!(state.value(), 0.4);
        assert_eq!(state.advance_to(1.0).unwrap(), 1.0);
        assert!(state.is_frozen());
        // frozen: further updates are ignored
        assert_eq!(state.advance_to(0.2).unwrap(), 1.0);
    }

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(1.2).unwrap(), 1.0);
        assert_eq!(clamp_progress(-3.0).unwrap(), 0.0);
        assert!(clamp_progress(f64::NAN).is_err());
    }
}
