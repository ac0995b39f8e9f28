//! Dashed projection guides from a curve point down to the axes.
//!
//! A [`GuideSet`] holds three segments: the drop from the point to the XY
//! plane, and the two runs from that foot to the X and Y axes. Live guides are
//! rebuilt every frame from the moving point; frozen guides are built once
//! from a fixed endpoint and only ever read afterwards.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::axis_frame::AxisFrame;

/// Fraction of a dashed line that is ink rather than gap.
pub const DASHED_RATIO: f64 = 0.5;

/// Upper bound on the dashes of one guide segment.
pub const MAX_DASHES: usize = 1000;

/// A straight world-space segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl GuideSegment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Point at fraction `alpha` of the way from start to end.
    pub fn point_at(&self, alpha: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * alpha
    }

    /// Splits the segment into `count` dashes covering `ratio` of its length.
    ///
    /// The first dash starts at `start` and the last one ends at `end`.
    pub fn dashes(&self, count: usize, ratio: f64) -> Vec<GuideSegment> {
        if count == 0 {
            return Vec::new();
        }
        let n = count as f64;
        let dash = ratio / n;
        let gap = if count == 1 { 1.0 - ratio } else { (1.0 - ratio) / (n - 1.0) };
        let period = dash + gap;

        (0..count)
            .map(|i| {
                let from = i as f64 * period;
                let to = if i == count - 1 && count > 1 { 1.0 } else { from + dash };
                GuideSegment::new(self.point_at(from), self.point_at(to))
            })
            .collect()
    }
}

/// How a guide is cut into dashes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    /// Target world length of one dash; the count follows the segment length.
    Length(f64),
    /// Fixed number of dashes regardless of length.
    Count(usize),
}

impl DashStyle {
    /// Dash count for a segment of `length` world units, at most
    /// [`MAX_DASHES`] and never fewer than 2 for length-based styles.
    pub fn count_for(&self, length: f64) -> usize {
        match *self {
            DashStyle::Length(dash_length) if dash_length > 0.0 => {
                let n = ((length / dash_length) * DASHED_RATIO).ceil();
                if n.is_finite() {
                    (n.min(MAX_DASHES as f64) as usize).max(2)
                } else {
                    MAX_DASHES
                }
            }
            DashStyle::Length(_) => 2,
            DashStyle::Count(n) => n.min(MAX_DASHES),
        }
    }
}

/// Drop and axis guides for a single curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideSet {
    /// Point to its XY-plane foot.
    pub drop: GuideSegment,
    /// Foot to the X axis.
    pub to_x: GuideSegment,
    /// Foot to the Y axis.
    pub to_y: GuideSegment,
}

impl GuideSet {
    /// Guides for curve-space coordinates `coords`.
    pub fn at_coords(frame: &AxisFrame, coords: &Point3<f64>) -> Self {
        let point = frame.to_world(coords);
        let foot = frame.xy_projection(coords);
        Self {
            drop: GuideSegment::new(point, foot),
            to_x: GuideSegment::new(foot, frame.x_axis_projection(coords)),
            to_y: GuideSegment::new(foot, frame.y_axis_projection(coords)),
        }
    }

    /// Guides for a world point (a marker that may have been moved by the
    /// renderer); the point is pulled back into curve space first.
    pub fn following(frame: &AxisFrame, world_point: &Point3<f64>) -> Self {
        Self::at_coords(frame, &frame.to_curve_space(world_point))
    }

    pub fn segments(&self) -> [GuideSegment; 3] {
        [self.drop, self.to_x, self.to_y]
    }

    /// All dashes of all three segments.
    pub fn dashes(&self, style: DashStyle) -> Vec<GuideSegment> {
        self.segments()
            .iter()
            .flat_map(|s| s.dashes(style.count_for(s.length()), DASHED_RATIO))
            .collect()
    }

    /// The same guides translated by `offset`.
    pub fn shifted(&self, offset: &nalgebra::Vector3<f64>) -> Self {
        let shift = |s: GuideSegment| GuideSegment::new(s.start + offset, s.end + offset);
        Self {
            drop: shift(self.drop),
            to_x: shift(self.to_x),
            to_y: shift(self.to_y),
        }
    }
}

/// Guides computed once and never updated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrozenGuides {
    guides: GuideSet,
    style: DashStyle,
}

impl FrozenGuides {
    /// Freezes the guides of `coords` as laid out in `frame` right now.
    pub fn freeze(frame: &AxisFrame, coords: &Point3<f64>, style: DashStyle) -> Self {
        Self {
            guides: GuideSet::at_coords(frame, coords),
            style,
        }
    }

    pub fn guides(&self) -> &GuideSet {
        &self.guides
    }

    pub fn style(&self) -> DashStyle {
        self.style
    }

    pub fn dashes(&self) -> Vec<GuideSegment> {
        self.guides.dashes(self.style)
    }

    /// Frozen guides ride along when the whole plot group is shifted.
    pub fn shifted(&self, offset: &nalgebra::Vector3<f64>) -> Self {
        Self {
            guides: self.guides.shifted(offset),
            style: self.style,
        }
    }
}
