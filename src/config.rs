//! Pipeline configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The parameters of a trajectory interpolation run.
///
/// Missing fields take their [Default] values when deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum distance from the ego pose for a point to count as "nearest", in m.
    pub nearest_dist_threshold_m: f64,
    /// Maximum yaw deviation from the ego pose for a point to count as "nearest", in rad.
    pub nearest_yaw_threshold_rad: f64,
    /// Speed the trajectory is raised to when pulling out from standstill, in m/s.
    pub target_pull_out_speed_mps: f64,
    /// Acceleration the trajectory is raised to when pulling out from standstill, in m/s<sup>2</sup>.
    pub target_pull_out_acc_mps2: f64,
    /// Upper speed bound, in m/s.
    pub max_speed_mps: f64,
    /// Arc-length step between spline samples, in m.
    pub spline_interpolation_resolution_m: f64,
    /// Length of driven path kept behind the vehicle, in m.
    pub backward_path_extension_m: f64,
    /// Time step of the temporal resampler, in s.
    pub time_resampling_interval_s: f64,
    pub fix_invalid_points: bool,
    pub set_engage_speed: bool,
    pub limit_velocity: bool,
    pub smooth_velocities: bool,
    pub use_akima_spline_interpolation: bool,
    pub smooth_trajectories: bool,
    pub extend_trajectory_backward: bool,
    pub resample_by_time: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nearest_dist_threshold_m: 3.0,
            nearest_yaw_threshold_rad: 1.046,
            target_pull_out_speed_mps: 1.0,
            target_pull_out_acc_mps2: 1.0,
            max_speed_mps: 8.33,
            spline_interpolation_resolution_m: 0.5,
            backward_path_extension_m: 5.0,
            time_resampling_interval_s: 0.1,
            fix_invalid_points: true,
            set_engage_speed: true,
            limit_velocity: true,
            smooth_velocities: false,
            use_akima_spline_interpolation: true,
            smooth_trajectories: false,
            extend_trajectory_backward: false,
            resample_by_time: false,
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
