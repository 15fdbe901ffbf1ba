//! Geometric resampling of trajectories along an Akima spline.

use crate::error::{Error, Result};
use crate::math::{heading, try_normalize, ParametricCurve2d, Point2d, SplineCurve2d};
use crate::pose::Pose;
use crate::sanitize::MIN_POINT_DISTANCE;
use crate::trajectory::{calc_distance2d, Trajectory, TrajectoryPoint};
use crate::util::Interval;

/// A trajectory rebuilt as a continuous curve over arc length.
///
/// X and Y follow Akima splines. Height, heading rate and time are
/// interpolated linearly between the source points; velocity and acceleration
/// hold the value of the point at the start of each segment.
pub struct TrajectoryCurve {
    curve: SplineCurve2d,
    points: Vec<TrajectoryPoint>,
    align_orientation: bool,
}

impl TrajectoryCurve {
    /// Builds a curve through the valid points of `points`.
    ///
    /// Points with non-finite poses, and points on top of their predecessor,
    /// are skipped. Returns `None` if fewer than two points remain.
    pub fn build(points: &[TrajectoryPoint]) -> Option<Self> {
        let mut usable: Vec<TrajectoryPoint> = Vec::with_capacity(points.len());
        for p in points.iter().filter(|p| p.pose.is_valid()) {
            let overlaps = usable
                .last()
                .map_or(false, |last| calc_distance2d(last, p) <= f64::EPSILON);
            if !overlaps {
                usable.push(*p);
            }
        }
        let xy = usable.iter().map(|p| p.pose.xy()).collect::<Vec<Point2d>>();
        let curve = SplineCurve2d::through(&xy)?;
        Some(Self {
            curve,
            points: usable,
            align_orientation: false,
        })
    }

    /// Makes sampled orientations follow the tangent of the curve instead of
    /// interpolating the source orientations.
    pub fn align_orientation_with_trajectory_direction(&mut self) {
        self.align_orientation = true;
    }

    /// The length of the curve in m.
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Samples the trajectory at arc length `s`.
    pub fn compute(&self, s: f64) -> TrajectoryPoint {
        let s = self.curve.bounds().clamp(s);
        let idx = self.curve.segment_index(s);
        let knots = self.curve.knots();
        let (a, b) = (&self.points[idx], &self.points[idx + 1]);
        let ratio = Interval::new(knots[idx], knots[idx + 1]).inv_lerp(s);

        let xy = self.curve.sample(s);
        let mut pose = Pose::lerp(&a.pose, &b.pose, ratio);
        pose.position.x = xy.x;
        pose.position.y = xy.y;
        if self.align_orientation {
            match try_normalize(self.curve.sample_dt(s)) {
                Some(tangent) => pose.set_yaw(heading(tangent)),
                None => pose.orientation = a.pose.orientation,
            }
        }

        TrajectoryPoint {
            pose,
            velocity: a.velocity,
            acceleration: a.acceleration,
            heading_rate: a.heading_rate + (b.heading_rate - a.heading_rate) * ratio,
            time_from_start: a.time_from_start + (b.time_from_start - a.time_from_start) * ratio,
        }
    }
}

/// Replaces the trajectory with samples of its spline every `resolution` m.
///
/// The original last point is appended if the samples stop short of it, so
/// the trajectory keeps its length. On failure the trajectory is unchanged.
pub fn apply_spline(points: &mut Trajectory, resolution: f64) -> Result<()> {
    if !(resolution > 0.0) {
        log::warn!("Invalid spline interpolation resolution {}", resolution);
        return Err(Error::InvalidResolution(resolution));
    }
    let Some(mut curve) = TrajectoryCurve::build(points) else {
        log::warn!("Failed to build interpolation trajectory");
        return Err(Error::SplineConstruction);
    };
    curve.align_orientation_with_trajectory_direction();

    let length = curve.length();
    let count = (length / resolution).floor() as usize + 1;
    let mut output = (0..count)
        .map(|i| curve.compute(i as f64 * resolution))
        .filter(|p| p.pose.is_valid())
        .collect::<Trajectory>();

    if output.len() < 2 {
        log::warn!("Not enough points in trajectory after spline interpolation");
        return Err(Error::NotEnoughPoints {
            stage: "after spline interpolation",
            len: output.len(),
        });
    }

    match points.last() {
        Some(original_last) if original_last.pose.is_valid() => {
            if let Some(last) = output.last() {
                if calc_distance2d(last, original_last) > MIN_POINT_DISTANCE {
                    output.push(*original_last);
                }
            }
        }
        _ => log::warn!("Last point in original trajectory is invalid, dropping it"),
    }
    *points = output;
    Ok(())
}
