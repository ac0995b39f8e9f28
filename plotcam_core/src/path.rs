//! Smooth paths through sampled points.
//!
//! A sampled curve is handed to the renderer as a chain of cubic Bézier
//! segments that pass through every sample. Handles come from Catmull-Rom
//! tangents, with the end tangents clamped to the first and last chords.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::curve::ParametricCurve;
use crate::error::{ensure_in_range, GeometryError, Result};

/// Sample count for the static traces of a finished motion.
pub const STATIC_TRACE_SAMPLES: usize = 220;

/// One cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment {
    pub start: Point3<f64>,
    pub handle_start: Point3<f64>,
    pub handle_end: Point3<f64>,
    pub end: Point3<f64>,
}

impl CubicSegment {
    /// Bernstein evaluation at `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let s = 1.0 - t;
        let coords = self.start.coords * (s * s * s)
            + self.handle_start.coords * (3.0 * s * s * t)
            + self.handle_end.coords * (3.0 * s * t * t)
            + self.end.coords * (t * t * t);
        Point3::from(coords)
    }
}

/// Chain of cubic segments through a list of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothPath {
    segments: Vec<CubicSegment>,
}

impl SmoothPath {
    /// Interpolates `points` (at least two).
    pub fn through(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::InsufficientSamples {
                required: 2,
                got: points.len(),
            });
        }
        let last = points.len() - 1;
        let tangent = |i: usize| -> Vector3<f64> {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];
            (next - prev) / 6.0
        };

        let segments = (0..last)
            .map(|i| CubicSegment {
                start: points[i],
                handle_start: points[i] + tangent(i),
                handle_end: points[i + 1] - tangent(i + 1),
                end: points[i + 1],
            })
            .collect();

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// The interpolated samples, in order.
    pub fn anchors(&self) -> Vec<Point3<f64>> {
        let mut anchors: Vec<Point3<f64>> = self.segments.iter().map(|s| s.start).collect();
        if let Some(last) = self.segments.last() {
            anchors.push(last.end);
        }
        anchors
    }

    pub fn start(&self) -> Point3<f64> {
        self.segments[0].start
    }

    pub fn end(&self) -> Point3<f64> {
        self.segments[self.segments.len() - 1].end
    }

    /// Point at `alpha ∈ [0, 1]` along the chain, each segment taking an
    /// equal share of the parameter.
    pub fn point_at(&self, alpha: f64) -> Result<Point3<f64>> {
        let alpha = ensure_in_range("path fraction", alpha, 0.0, 1.0)?;
        let scaled = alpha * self.segments.len() as f64;
        let index = (scaled.floor() as usize).min(self.segments.len() - 1);
        Ok(self.segments[index].point_at(scaled - index as f64))
    }

    /// `per_segment` points on every segment, for polyline renderers.
    pub fn flatten(&self, per_segment: usize) -> Vec<Point3<f64>> {
        let per_segment = per_segment.max(1);
        let mut out = Vec::with_capacity(self.segments.len() * per_segment + 1);
        for segment in &self.segments {
            for k in 0..per_segment {
                out.push(segment.point_at(k as f64 / per_segment as f64));
            }
        }
        out.push(self.end());
        out
    }

    /// The same path translated by `offset`.
    pub fn shifted(&self, offset: &Vector3<f64>) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| CubicSegment {
                    start: s.start + offset,
                    handle_start: s.handle_start + offset,
                    handle_end: s.handle_end + offset,
                    end: s.end + offset,
                })
                .collect(),
        }
    }
}

/// Samples `curve` over its whole domain, maps each curve point through
/// `map` (e.g. an axis frame projection) and fits a smooth path.
pub fn trace<C, F>(curve: &C, samples: usize, map: F) -> Result<SmoothPath>
where
    C: ParametricCurve + ?Sized,
    F: Fn(&Point3<f64>) -> Point3<f64>,
{
    let points: Vec<Point3<f64>> = curve.sample(samples).iter().map(map).collect();
    SmoothPath::through(&points)
}

/// Like [`trace`] but only over `[t_start, until]`.
pub fn trace_until<C, F>(curve: &C, until: f64, samples: usize, map: F) -> Result<SmoothPath>
where
    C: ParametricCurve + ?Sized,
    F: Fn(&Point3<f64>) -> Point3<f64>,
{
    let points: Vec<Point3<f64>> = curve.sample_until(until, samples)?.iter().map(map).collect();
    SmoothPath::through(&points)
}

/// Sample count for a partial trace covering `fraction` of the domain,
/// proportional to the full static trace and never below two.
pub fn partial_sample_count(fraction: f64) -> usize {
    let fraction = fraction.clamp(0.0, 1.0);
    ((STATIC_TRACE_SAMPLES as f64 * fraction).ceil() as usize).max(2)
}
