//! The full post-processing pipeline.

use crate::config::PipelineConfig;
use crate::ego::{add_ego_state_to_trajectory, expand_trajectory_with_ego_history, VehicleState};
use crate::error::{Error, Result};
use crate::resample::resample_by_time;
use crate::sanitize::remove_invalid_points;
use crate::smoother::{
    filter_velocity, smooth_trajectory_with_elastic_band, PathSmoother, VelocityOptimizer,
};
use crate::spline::apply_spline;
use crate::trajectory::{calculate_time_from_start, Trajectory, TrajectoryPoint};
use crate::velocity::{
    clamp_negative_velocities, clamp_velocities, set_max_velocity, InitialMotion,
};

/// The external smoothers available to the pipeline, borrowed for the
/// duration of a call.
#[derive(Default)]
pub struct Smoothers<'a> {
    pub velocity: Option<&'a mut dyn VelocityOptimizer>,
    pub path: Option<&'a mut dyn PathSmoother>,
}

/// Refines a planned trajectory in place.
///
/// Invalid points are removed, the velocity profile is bounded and smoothed,
/// the path is resampled along a spline and optionally smoothed, and time from
/// start is recomputed from the vehicle's position. Steps switched off in
/// `config` are skipped; steps which fail leave the trajectory as it was and
/// the pipeline carries on.
///
/// Returns [Error::NotEnoughPoints] when fewer than two points remain after
/// sanitizing or at the end; the trajectory is then left as it stood.
pub fn interpolate_trajectory(
    points: &mut Trajectory,
    state: &VehicleState,
    config: &PipelineConfig,
    smoothers: &mut Smoothers,
) -> Result<()> {
    if config.fix_invalid_points {
        remove_invalid_points(points).ok();
    }
    ensure_enough_points(points, "after invalid point removal")?;

    let initial_motion = InitialMotion::new(state, config);

    // Engage speed
    if config.set_engage_speed && state.velocity < config.target_pull_out_speed_mps {
        clamp_velocities(points, initial_motion.speed, initial_motion.acc);
    }
    if config.limit_velocity {
        set_max_velocity(points, config.max_speed_mps);
    }
    if config.smooth_velocities {
        filter_velocity(
            points,
            &initial_motion,
            state,
            config,
            smoothers.velocity.as_deref_mut(),
        )
        .ok();
        ensure_enough_points(points, "after velocity smoothing")?;
    }
    if config.use_akima_spline_interpolation {
        apply_spline(points, config.spline_interpolation_resolution_m).ok();
    }
    if config.smooth_trajectories {
        smooth_trajectory_with_elastic_band(points, state, smoothers.path.as_deref_mut()).ok();
    }

    calculate_time_from_start(points, state.pose.position);

    if config.resample_by_time {
        resample_by_time(points, config.time_resampling_interval_s).ok();
    }

    ensure_enough_points(points, "after interpolation")
}

fn ensure_enough_points(points: &Trajectory, stage: &'static str) -> Result<()> {
    if points.len() < 2 {
        log::error!("Not enough points in trajectory {}", stage);
        return Err(Error::NotEnoughPoints {
            stage,
            len: points.len(),
        });
    }
    Ok(())
}

/// Processes a stream of planned trajectories for one vehicle.
///
/// Keeps the path the vehicle has driven so it can be prepended to each new
/// trajectory when `extend_trajectory_backward` is set.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryInterpolator {
    config: PipelineConfig,
    ego_history: Trajectory,
}

impl TrajectoryInterpolator {
    /// Creates an interpolator with an empty driving history.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ego_history: vec![],
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the configuration. The driving history is kept.
    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }

    /// The driven path currently retained behind the vehicle.
    pub fn ego_history(&self) -> &[TrajectoryPoint] {
        &self.ego_history
    }

    /// Processes the trajectory of one planning cycle.
    pub fn on_trajectory(
        &mut self,
        points: &mut Trajectory,
        state: &VehicleState,
        smoothers: &mut Smoothers,
    ) -> Result<()> {
        clamp_negative_velocities(points);
        if self.config.extend_trajectory_backward {
            add_ego_state_to_trajectory(&mut self.ego_history, state, &self.config);
            expand_trajectory_with_ego_history(points, &self.ego_history);
        }
        interpolate_trajectory(points, state, &self.config, smoothers)
    }
}
