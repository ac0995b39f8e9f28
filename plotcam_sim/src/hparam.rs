//! Hyperparameter-estimation scene.
//!
//! A dot rides the budget curve through 3D axes with dashed guides down to
//! the XY plane and both axes. Once it reaches the end, the camera swings
//! round to look at the XY chord side on while the plot drops down screen,
//! and a flat plotting frame is laid along the chord.
//!
//! Static geometry is built once. Frame geometry is rebuilt from scratch for
//! every timestamp.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use plotcam_core::camera::side_on_pose;
use plotcam_core::guides::{DashStyle, FrozenGuides, GuideSegment, GuideSet};
use plotcam_core::path::{
    partial_sample_count, trace, trace_until, SmoothPath, STATIC_TRACE_SAMPLES,
};
use plotcam_core::{
    AxisFrame, BudgetCurve, CameraMove, CameraPose, LabelAnchor, ParametricCurve, RateFunction,
    Reprojection, ScreenBasis,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

use crate::config::{HparamConfig, RenderConfig};
use crate::error::SceneError;
use crate::exporter::{FrameGeometry, SceneStatics};
use crate::scenarios::{Scene, SceneId};
use crate::timeline::{phase_fraction, Timeline};

/// Label anchors sit this far along their axis.
const LABEL_FRACTION: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HparamPhase {
    Setup,
    StartGuides,
    Trace,
    Hold,
    CameraMove,
    Reproject,
}

/// Drawable parts of the scene, for the renderer's visibility list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Axes,
    AxisLabels,
    Dot,
    ZDot,
    StartGuides,
    LiveGuides,
    LiveTraces,
    Trace3d,
    TraceXy,
    TraceZ,
    EndGuides,
    PlotFrame,
    PlotLabels,
}

impl HparamPhase {
    pub fn name(&self) -> &'static str {
        match self {
            HparamPhase::Setup => "setup",
            HparamPhase::StartGuides => "start_guides",
            HparamPhase::Trace => "trace",
            HparamPhase::Hold => "hold",
            HparamPhase::CameraMove => "camera_move",
            HparamPhase::Reproject => "reproject",
        }
    }

    /// Elements on screen during this phase.
    pub fn visible(&self) -> Vec<Element> {
        use Element::*;
        match self {
            HparamPhase::Setup => vec![Axes, AxisLabels],
            HparamPhase::StartGuides => vec![Axes, AxisLabels, Dot, StartGuides],
            HparamPhase::Trace => vec![
                Axes,
                AxisLabels,
                Dot,
                ZDot,
                StartGuides,
                LiveGuides,
                LiveTraces,
            ],
            HparamPhase::Hold | HparamPhase::CameraMove => vec![
                Axes,
                AxisLabels,
                Dot,
                ZDot,
                StartGuides,
                Trace3d,
                TraceXy,
                TraceZ,
                EndGuides,
            ],
            HparamPhase::Reproject => vec![Trace3d, TraceXy, PlotFrame, PlotLabels],
        }
    }
}

/// The 3D point, its XY projection and its Z-axis projection, traced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSet {
    pub path_3d: SmoothPath,
    pub xy: SmoothPath,
    pub z: SmoothPath,
}

impl TraceSet {
    fn shifted(&self, offset: &Vector3<f64>) -> Self {
        Self {
            path_3d: self.path_3d.shifted(offset),
            xy: self.xy.shifted(offset),
            z: self.z.shifted(offset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: LabelAnchor,
    pub y: LabelAnchor,
    pub z: LabelAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLabels {
    pub x: LabelAnchor,
    pub y: LabelAnchor,
}

/// Geometry computed once per run.
///
/// Plot-group members are stored as built; each frame's `plot_offset` says
/// how far the group has moved since. The reprojection is already placed at
/// its final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HparamStatics {
    pub curve: BudgetCurve,
    pub axes: AxisFrame,
    pub labels: AxisLabels,
    pub start_guides: FrozenGuides,
    pub start_dashes: Vec<GuideSegment>,
    pub end_guides: FrozenGuides,
    pub end_dashes: Vec<GuideSegment>,
    pub traces: TraceSet,
    pub initial_pose: CameraPose,
    pub target_pose: CameraPose,
    /// Total shift of the plot group over the camera move.
    pub plot_shift: Vector3<f64>,
    pub reprojection: Reprojection,
    pub plot_labels: PlotLabels,
}

/// Geometry of one frame, already shifted with the plot group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HparamFrame {
    pub phase: HparamPhase,
    pub camera: CameraPose,
    pub basis: ScreenBasis,
    pub plot_offset: Vector3<f64>,
    pub visible: Vec<Element>,
    /// Curve parameter the dot sits at.
    pub t: f64,
    pub dot: Point3<f64>,
    pub z_dot: Point3<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_guides: Option<GuideSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub live_dashes: Vec<GuideSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_traces: Option<TraceSet>,
}

/// Label anchors of the scene axes.
fn axis_labels(axes: &AxisFrame) -> AxisLabels {
    let [x_max, y_max, z_max] = [axes.ranges[0].max, axes.ranges[1].max, axes.ranges[2].max];
    let about =
        |axis: Unit<Vector3<f64>>, angle: f64| UnitQuaternion::from_axis_angle(&axis, angle);

    // later rotations compose on the left
    let x_orientation = about(Vector3::x_axis(), -FRAC_PI_2) * about(Vector3::z_axis(), PI);
    let y_orientation = about(Vector3::y_axis(), FRAC_PI_2) * about(Vector3::z_axis(), FRAC_PI_2);
    let z_orientation = about(Vector3::y_axis(), FRAC_PI_2);

    AxisLabels {
        x: axes.label_anchor(
            &Point3::new(LABEL_FRACTION * x_max, 0.0, 0.0),
            x_orientation,
            &Vector3::new(0.0, -0.3, 0.3),
        ),
        y: axes.label_anchor(
            &Point3::new(0.0, LABEL_FRACTION * y_max, 0.0),
            y_orientation,
            &Vector3::new(-0.3, 0.0, 0.3),
        ),
        z: axes.label_anchor(
            &Point3::new(0.0, 0.0, LABEL_FRACTION * z_max),
            z_orientation,
            &Vector3::new(0.0, 0.6, 0.0),
        ),
    }
}

/// Label anchors of the flat plotting frame, turned a quarter about the
/// screen axes so they face the side-on camera.
fn plot_labels(reprojection: &Reprojection, basis: &ScreenBasis) -> Result<PlotLabels, SceneError> {
    let frame = &reprojection.frame;
    let (x_len, y_len) = (frame.ranges[0].max, frame.ranges[1].max);
    let quarter_about = |v: &Vector3<f64>| -> Result<UnitQuaternion<f64>, SceneError> {
        let axis = Unit::try_new(*v, 1e-12)
            .ok_or_else(|| plotcam_core::GeometryError::degenerate("screen axis has zero length"))?;
        Ok(UnitQuaternion::from_axis_angle(&axis, FRAC_PI_2))
    };

    Ok(PlotLabels {
        x: frame.label_anchor(
            &Point3::new(LABEL_FRACTION * x_len, -0.3, 0.0),
            quarter_about(&basis.right)?,
            &Vector3::zeros(),
        ),
        y: frame.label_anchor(
            &Point3::new(-0.3, LABEL_FRACTION * y_len, 0.0),
            quarter_about(&basis.up)?,
            &Vector3::zeros(),
        ),
    })
}

/// The hyperparameter-estimation scene script.
pub struct HparamScene {
    config: HparamConfig,
    timeline: Timeline<HparamPhase>,
    camera_move: CameraMove,
    statics: HparamStatics,
}

impl HparamScene {
    /// Builds all static geometry.
    pub fn new(config: &HparamConfig) -> Result<Self, SceneError> {
        let curve = BudgetCurve::new(config.t_start, config.t_end)?;
        let initial_pose = CameraPose::from_degrees(config.camera_phi_deg, config.camera_theta_deg);
        let basis = initial_pose.screen_basis()?;
        let drop = basis.down() * config.drop_distance;

        let axes = AxisFrame::enclosing(&curve, config.range_margin, config.axis_length)?
            .shifted(&drop);
        debug!(
            "hparam axes: x<={:.3} y<={:.3} z<={:.3}",
            axes.ranges[0].max, axes.ranges[1].max, axes.ranges[2].max
        );

        let (start, end) = (curve.start(), curve.end());
        let start_style = DashStyle::Length(config.start_dash_length);
        let start_guides = FrozenGuides::freeze(&axes, &start, start_style);
        let end_style = DashStyle::Count(config.frozen_dash_count);
        let end_guides = FrozenGuides::freeze(&axes, &end, end_style);

        let traces = TraceSet {
            path_3d: trace(&curve, STATIC_TRACE_SAMPLES, |c| axes.to_world(c))?,
            xy: trace(&curve, STATIC_TRACE_SAMPLES, |c| axes.xy_projection(c))?,
            z: trace(&curve, STATIC_TRACE_SAMPLES, |c| axes.z_axis_projection(c))?,
        };

        let center = axes.coords_to_point(0.5 * (start.x + end.x), 0.5 * (start.y + end.y), 0.0);
        let target_pose =
            side_on_pose(end.x - start.x, end.y - start.y, center)?.with_zoom(initial_pose.zoom);
        debug!(
            "hparam camera target: phi={:.4} theta={:.4}",
            target_pose.phi, target_pose.theta
        );

        // the plot group drops a second time during the camera move
        let reprojection = Reprojection::build(
            &start,
            &end,
            &axes,
            &basis.up,
            &traces.xy.anchors(),
            &drop,
            &config.reprojection,
        )?;
        let plot_labels = plot_labels(&reprojection, &basis)?;

        let timing = &config.timing;
        let timeline = Timeline::new(vec![
            (HparamPhase::Setup, timing.setup),
            (HparamPhase::StartGuides, timing.start_guides),
            (HparamPhase::Trace, timing.trace),
            (HparamPhase::Hold, timing.hold),
            (HparamPhase::CameraMove, timing.camera_move),
            (HparamPhase::Reproject, timing.reproject),
        ]);

        let camera_move = CameraMove {
            from: initial_pose,
            to: target_pose,
            run_time: timing.camera_move,
            rate: RateFunction::Smooth,
        };

        let statics = HparamStatics {
            curve,
            labels: axis_labels(&axes),
            start_dashes: start_guides.dashes(),
            end_dashes: end_guides.dashes(),
            axes,
            start_guides,
            end_guides,
            traces,
            initial_pose,
            target_pose,
            plot_shift: drop,
            reprojection,
            plot_labels,
        };

        Ok(Self {
            config: *config,
            timeline,
            camera_move,
            statics,
        })
    }

    pub fn statics(&self) -> &HparamStatics {
        &self.statics
    }

    pub fn timeline(&self) -> &Timeline<HparamPhase> {
        &self.timeline
    }

    /// Frame geometry at `time` seconds into the scene.
    pub fn frame_at(&self, time: f64) -> Result<HparamFrame, SceneError> {
        let (phase, elapsed) = self
            .timeline
            .locate(time)
            .ok_or(SceneError::EmptyTimeline(SceneId::HparamEstimation.name()))?;
        let s = &self.statics;
        let (t_start, t_end) = s.curve.domain();

        let (camera, plot_offset) = match phase {
            HparamPhase::CameraMove => {
                let raw = phase_fraction(elapsed, self.camera_move.run_time);
                let fraction = RateFunction::Smooth.apply(raw);
                (self.camera_move.pose_at(elapsed), s.plot_shift * fraction)
            }
            HparamPhase::Reproject => (s.target_pose, s.plot_shift),
            _ => (s.initial_pose, Vector3::zeros()),
        };

        let t = match phase {
            HparamPhase::Setup | HparamPhase::StartGuides => t_start,
            HparamPhase::Trace => {
                let raw = phase_fraction(elapsed, self.config.timing.trace);
                let alpha = RateFunction::Linear.apply(raw);
                (t_start + (t_end - t_start) * alpha).min(t_end)
            }
            _ => t_end,
        };
        let coords = s.curve.point(t)?;
        let dot = s.axes.to_world(&coords);
        let z_dot = s.axes.z_axis_projection(&coords);

        let (live_guides, live_dashes, live_traces) = if phase == HparamPhase::Trace {
            let guides = GuideSet::following(&s.axes, &dot);
            let dashes = guides.dashes(DashStyle::Length(self.config.live_dash_length));
            let n = partial_sample_count((t - t_start) / (t_end - t_start));
            let traces = TraceSet {
                path_3d: trace_until(&s.curve, t, n, |c| s.axes.to_world(c))?,
                xy: trace_until(&s.curve, t, n, |c| s.axes.xy_projection(c))?,
                z: trace_until(&s.curve, t, n, |c| s.axes.z_axis_projection(c))?,
            };
            (
                Some(guides.shifted(&plot_offset)),
                dashes
                    .into_iter()
                    .map(|d| GuideSegment::new(d.start + plot_offset, d.end + plot_offset))
                    .collect(),
                Some(traces.shifted(&plot_offset)),
            )
        } else {
            (None, Vec::new(), None)
        };

        Ok(HparamFrame {
            phase,
            basis: camera.screen_basis()?,
            camera,
            plot_offset,
            visible: phase.visible(),
            t,
            dot: dot + plot_offset,
            z_dot: z_dot + plot_offset,
            live_guides,
            live_dashes,
            live_traces,
        })
    }

    /// Post-run checks on the built geometry. Returns the first violation.
    pub fn check_final(&self, last: &HparamFrame) -> Option<String> {
        let s = &self.statics;
        let b = &s.reprojection.basis;
        let orthonormal = [
            (b.x_dir.norm() - 1.0).abs(),
            (b.y_dir.norm() - 1.0).abs(),
            b.x_dir.dot(&b.y_dir).abs(),
            (b.x_dir.cross(&b.y_dir) - b.z_dir).norm(),
        ]
        .iter()
        .all(|e| *e < 1e-9);
        if !orthonormal {
            return Some("reprojection basis is not right-handed orthonormal".to_string());
        }
        if last.phase != HparamPhase::Reproject {
            return Some(format!("scene ended in phase {:?}", last.phase));
        }
        if (last.camera.phi - FRAC_PI_2).abs() > 1e-9 {
            return Some(format!("camera did not reach side-on view (phi = {})", last.camera.phi));
        }
        None
    }
}

impl Scene for HparamScene {
    fn id(&self) -> SceneId {
        SceneId::HparamEstimation
    }

    fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    fn render(&self) -> RenderConfig {
        self.config.render
    }

    fn static_geometry(&self) -> SceneStatics {
        SceneStatics::Hparam(self.statics.clone())
    }

    fn frame(&mut self, time: f64) -> Result<FrameGeometry, SceneError> {
        self.frame_at(time).map(FrameGeometry::Hparam)
    }

    fn verify(&self, last: &FrameGeometry) -> Option<String> {
        match last {
            FrameGeometry::Hparam(frame) => self.check_final(frame),
            _ => Some("unexpected frame kind".to_string()),
        }
    }
}
