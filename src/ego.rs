//! Merging the vehicle's own state into trajectories.

use crate::config::PipelineConfig;
use crate::math::normalize_radian;
use crate::pose::Pose;
use crate::trajectory::{calc_distance2d, Trajectory, TrajectoryPoint};
use serde::{Deserialize, Serialize};

/// Distance and yaw changes below this are treated as no movement.
const STATIONARY_EPSILON: f64 = 1e-2;

/// The current state of the controlled vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleState {
    pub pose: Pose,
    /// Longitudinal velocity in m/s.
    pub velocity: f64,
    /// Longitudinal acceleration in m/s<sup>2</sup>.
    pub acceleration: f64,
}

impl VehicleState {
    /// A trajectory point at the vehicle's pose and speed.
    pub fn to_point(&self) -> TrajectoryPoint {
        TrajectoryPoint {
            pose: self.pose,
            velocity: self.velocity,
            ..Default::default()
        }
    }
}

/// Appends the vehicle state to a trajectory of previously driven points.
///
/// * Empty: the state becomes the only point.
/// * Barely moved since the last point: nothing changes.
/// * Jumped further than the nearest thresholds: the history is discarded and
///   restarted from the state.
/// * Otherwise the state is appended and the history trimmed to
///   `backward_path_extension_m` of path behind the vehicle.
pub fn add_ego_state_to_trajectory(
    points: &mut Trajectory,
    state: &VehicleState,
    config: &PipelineConfig,
) {
    let ego = state.to_point();
    let Some(last) = points.last() else {
        points.push(ego);
        return;
    };

    let yaw_diff = normalize_radian(ego.pose.yaw() - last.pose.yaw()).abs();
    let distance = calc_distance2d(last, &ego);
    if distance < STATIONARY_EPSILON && yaw_diff < STATIONARY_EPSILON {
        return;
    }
    if distance > config.nearest_dist_threshold_m || yaw_diff > config.nearest_yaw_threshold_rad {
        log::debug!(
            "Ego state jumped {:.2} m / {:.2} rad, restarting history",
            distance,
            yaw_diff
        );
        points.clear();
        points.push(ego);
        return;
    }

    points.push(ego);

    let mut clip_idx = 0;
    let mut accumulated = 0.0;
    for i in (1..points.len()).rev() {
        accumulated += calc_distance2d(&points[i - 1], &points[i]);
        if accumulated > config.backward_path_extension_m {
            clip_idx = i;
            break;
        }
    }
    points.drain(..clip_idx);
}

/// Prepends previously driven points to a trajectory. Nothing happens if
/// either is empty.
pub fn expand_trajectory_with_ego_history(points: &mut Trajectory, history: &[TrajectoryPoint]) {
    if history.is_empty() || points.is_empty() {
        return;
    }
    points.splice(0..0, history.iter().copied());
}
