//! Trajectory points and the geometric queries shared by the processing steps.

use crate::math::{azimuth, normalize_radian, Point2d, Point3d};
use crate::pose::Pose;
use cgmath::prelude::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Speeds below this are treated as this when converting distance to time, in m/s.
const MIN_TIME_SPEED: f64 = 1e-3;

/// A single planned waypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryPoint {
    pub pose: Pose,
    /// Longitudinal velocity in m/s.
    pub velocity: f64,
    /// Longitudinal acceleration in m/s<sup>2</sup>.
    pub acceleration: f64,
    /// Heading rate in rad/s.
    pub heading_rate: f64,
    /// Time since the start of the trajectory in s.
    pub time_from_start: f64,
}

impl TrajectoryPoint {
    /// Creates a point on the ground plane.
    pub fn new(x: f64, y: f64, yaw: f64, velocity: f64) -> Self {
        Self {
            pose: Pose::from_xy_yaw(x, y, yaw),
            velocity,
            ..Default::default()
        }
    }
}

/// An ordered sequence of waypoints, first point first.
pub type Trajectory = Vec<TrajectoryPoint>;

/// Planar distance between two trajectory points.
pub fn calc_distance2d(a: &TrajectoryPoint, b: &TrajectoryPoint) -> f64 {
    a.pose.distance2d(&b.pose)
}

/// Sets the yaw of every point to the azimuth towards its successor, assuming
/// the vehicle drives forward. The last point takes its predecessor's yaw.
pub fn insert_orientation(points: &mut [TrajectoryPoint]) {
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() - 1 {
        let yaw = azimuth(points[i].pose.xy(), points[i + 1].pose.xy());
        points[i].pose.set_yaw(yaw);
    }
    let n = points.len();
    points[n - 1].pose.orientation = points[n - 2].pose.orientation;
}

/// Removes the first point whose yaw deviates from its predecessor's by more
/// than 90 degrees. Returns true if a point was removed.
pub fn remove_first_invalid_orientation_point(points: &mut Trajectory) -> bool {
    let invalid = points.iter().tuple_windows().position(|(a, b)| {
        normalize_radian(a.pose.yaw() - b.pose.yaw()).abs() > FRAC_PI_2
    });
    match invalid {
        Some(idx) => {
            points.remove(idx + 1);
            true
        }
        None => false,
    }
}

/// Index of the point closest to `position` on the ground plane.
pub fn find_nearest_index(points: &[TrajectoryPoint], position: Point3d) -> Option<usize> {
    points
        .iter()
        .map(|p| squared_distance2d(p.pose.position, position))
        .position_min_by(|a, b| a.total_cmp(b))
}

/// Index of the segment closest to `position`, i.e. the nearest point, or its
/// predecessor when the position lies behind the nearest point.
pub fn find_nearest_segment_index(points: &[TrajectoryPoint], position: Point3d) -> Option<usize> {
    let nearest = find_nearest_index(points, position)?;
    if nearest == 0 {
        return Some(0);
    }
    if nearest == points.len() - 1 {
        return Some(nearest - 1);
    }
    let p = points[nearest].pose.xy();
    let next = points[nearest + 1].pose.xy();
    let target = Point2d::new(position.x, position.y);
    if (next - p).dot(target - p) < 0.0 {
        Some(nearest - 1)
    } else {
        Some(nearest)
    }
}

/// Finds the first point near `pose`, relaxing constraints when nothing matches.
///
/// The search first looks for the first contiguous run of points within both
/// `dist_threshold` and `yaw_threshold` and takes the closest of that run.
/// Failing that, only the distance is constrained, and finally the globally
/// nearest point is returned.
pub fn find_first_nearest_index_with_soft_constraints(
    points: &[TrajectoryPoint],
    pose: &Pose,
    dist_threshold: f64,
    yaw_threshold: f64,
) -> Option<usize> {
    if points.is_empty() {
        return None;
    }
    let yaw = pose.yaw();
    let within_yaw = |p: &TrajectoryPoint| normalize_radian(p.pose.yaw() - yaw).abs() <= yaw_threshold;

    first_nearest_where(points, pose, dist_threshold, within_yaw)
        .or_else(|| first_nearest_where(points, pose, dist_threshold, |_| true))
        .or_else(|| find_nearest_index(points, pose.position))
}

fn first_nearest_where(
    points: &[TrajectoryPoint],
    pose: &Pose,
    dist_threshold: f64,
    accept: impl Fn(&TrajectoryPoint) -> bool,
) -> Option<usize> {
    let max_dist2 = dist_threshold * dist_threshold;
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let dist2 = squared_distance2d(p.pose.position, pose.position);
        if dist2 > max_dist2 || !accept(p) {
            if best.is_some() {
                break;
            }
            continue;
        }
        if best.map_or(true, |(_, d)| dist2 < d) {
            best = Some((i, dist2));
        }
    }
    best.map(|(i, _)| i)
}

/// Recomputes `time_from_start` from the distances and velocities between
/// points, starting from the segment nearest to `position`.
///
/// Points up to and including the start of that segment are stamped zero; the
/// stamps are non-decreasing.
pub fn calculate_time_from_start(points: &mut [TrajectoryPoint], position: Point3d) {
    let Some(seg_idx) = find_nearest_segment_index(points, position) else {
        return;
    };
    for p in points.iter_mut() {
        p.time_from_start = 0.0;
    }
    for i in seg_idx + 1..points.len() {
        let (from, to) = (&points[i - 1], &points[i]);
        let ds = calc_distance2d(from, to);
        let v = from.velocity.abs().max(to.velocity.abs()).max(MIN_TIME_SPEED);
        points[i].time_from_start = points[i - 1].time_from_start + ds / v;
    }
}

fn squared_distance2d(a: Point3d, b: Point3d) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}
