//! Element-wise bounds on the velocity profile.

use crate::config::PipelineConfig;
use crate::ego::VehicleState;
use crate::trajectory::TrajectoryPoint;

/// The speed and acceleration the velocity optimizer starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialMotion {
    /// Speed in m/s.
    pub speed: f64,
    /// Acceleration in m/s<sup>2</sup>.
    pub acc: f64,
}

impl InitialMotion {
    /// Seeds from the vehicle when it is already faster than the pull-out
    /// speed, otherwise from the pull-out target.
    pub fn new(state: &VehicleState, config: &PipelineConfig) -> Self {
        if state.velocity > config.target_pull_out_speed_mps {
            Self {
                speed: state.velocity,
                acc: state.acceleration,
            }
        } else {
            Self {
                speed: config.target_pull_out_speed_mps,
                acc: config.target_pull_out_acc_mps2,
            }
        }
    }
}

/// Raises every velocity to at least `min_velocity` and every acceleration to
/// at least `min_acceleration`.
pub fn clamp_velocities(points: &mut [TrajectoryPoint], min_velocity: f64, min_acceleration: f64) {
    for point in points {
        point.velocity = f64::max(point.velocity, min_velocity);
        point.acceleration = f64::max(point.acceleration, min_acceleration);
    }
}

/// Caps every velocity at `max_velocity`.
pub fn set_max_velocity(points: &mut [TrajectoryPoint], max_velocity: f64) {
    for point in points {
        point.velocity = f64::min(point.velocity, max_velocity);
    }
}

/// Replaces negative velocities with zero.
pub fn clamp_negative_velocities(points: &mut [TrajectoryPoint]) {
    for point in points {
        point.velocity = f64::max(point.velocity, 0.0);
    }
}
