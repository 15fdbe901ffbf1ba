//! Post-processing of planned vehicle trajectories.
//!
//! A raw planned path is sanitized, its velocity profile bounded and smoothed,
//! its geometry resampled along a spline and its timing recomputed, so that a
//! controller can track it. See [interpolate_trajectory] for the pipeline and
//! [TrajectoryInterpolator] for processing one trajectory per planning cycle.

pub use cgmath;
pub use config::PipelineConfig;
pub use ego::{add_ego_state_to_trajectory, expand_trajectory_with_ego_history, VehicleState};
pub use error::{Error, Result};
pub use pipeline::{interpolate_trajectory, Smoothers, TrajectoryInterpolator};
pub use pose::Pose;
pub use resample::resample_by_time;
pub use sanitize::{remove_close_proximity_points, remove_invalid_points};
pub use smoother::{filter_velocity, smooth_trajectory_with_elastic_band, PathSmoother, VelocityOptimizer};
pub use spline::{apply_spline, TrajectoryCurve};
pub use trajectory::{Trajectory, TrajectoryPoint};
pub use util::Interval;
pub use velocity::{clamp_negative_velocities, clamp_velocities, set_max_velocity, InitialMotion};

mod config;
mod ego;
mod error;
pub mod math;
mod pipeline;
mod pose;
mod resample;
mod sanitize;
mod smoother;
mod spline;
pub mod trajectory;
mod util;
mod velocity;
