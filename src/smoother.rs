//! Driving the external velocity optimizer and path smoother.

use crate::config::PipelineConfig;
use crate::ego::VehicleState;
use crate::error::{Error, Result};
use crate::pose::Pose;
use crate::trajectory::{
    find_first_nearest_index_with_soft_constraints, Trajectory, TrajectoryPoint,
};
use crate::velocity::InitialMotion;

/// A jerk-constrained velocity profile optimizer.
///
/// Implementations may keep state between calls, so one instance must not be
/// shared between independent trajectory streams.
pub trait VelocityOptimizer {
    /// Limits speed so the lateral acceleration stays within bounds.
    fn apply_lateral_acceleration_filter(
        &mut self,
        points: Trajectory,
        speed: f64,
        acc: f64,
        enable_smooth_limit: bool,
        use_resampling: bool,
    ) -> Trajectory;

    /// Limits speed so the steering angle rate stays within bounds.
    fn apply_steering_rate_limit(&mut self, points: Trajectory, use_resampling: bool) -> Trajectory;

    /// Resamples with a spacing that depends on the ego speed.
    fn resample(
        &mut self,
        points: Trajectory,
        speed: f64,
        pose: &Pose,
        nearest_dist_threshold: f64,
        nearest_yaw_threshold: f64,
    ) -> Trajectory;

    /// Optimizes the velocity profile, returning `None` if the solver fails.
    fn optimize(&mut self, speed: f64, acc: f64, points: &[TrajectoryPoint]) -> Option<Trajectory>;
}

/// An elastic band path smoother, which warm-starts from its previous solution.
pub trait PathSmoother {
    fn smooth_path(&mut self, points: Trajectory, pose: &Pose) -> Trajectory;

    /// Forgets the previous solution.
    fn reset_state(&mut self);
}

/// Smooths the velocity profile with the optimizer.
///
/// The trajectory is filtered for lateral acceleration and steering rate,
/// resampled, clipped so it starts at the point nearest the vehicle, and then
/// optimized. If the optimizer fails, the clipped trajectory is kept and
/// [Error::OptimizationFailed] returned. With no optimizer nothing changes.
pub fn filter_velocity<O: VelocityOptimizer + ?Sized>(
    points: &mut Trajectory,
    initial_motion: &InitialMotion,
    state: &VehicleState,
    config: &PipelineConfig,
    optimizer: Option<&mut O>,
) -> Result<()> {
    let Some(optimizer) = optimizer else {
        log::error!("Velocity optimizer is not initialized");
        return Err(Error::MissingVelocityOptimizer);
    };
    let InitialMotion { speed, acc } = *initial_motion;
    let dist_threshold = config.nearest_dist_threshold_m;
    let yaw_threshold = config.nearest_yaw_threshold_rad;

    let mut filtered = std::mem::take(points);
    filtered = optimizer.apply_lateral_acceleration_filter(filtered, speed, acc, true, true);
    // Already resampled by the lateral acceleration filter
    filtered = optimizer.apply_steering_rate_limit(filtered, false);
    filtered = optimizer.resample(filtered, speed, &state.pose, dist_threshold, yaw_threshold);
    *points = filtered;

    if points.len() < 2 {
        log::debug!("Not enough points after resampling to optimize velocity");
        return Ok(());
    }

    let closest = find_first_nearest_index_with_soft_constraints(
        points,
        &state.pose,
        dist_threshold,
        yaw_threshold,
    )
    .unwrap_or(0);
    points.drain(..closest);

    match optimizer.optimize(speed, acc, points) {
        Some(optimized) => {
            *points = optimized;
            Ok(())
        }
        None => {
            log::warn!("Failed to solve velocity optimization");
            Err(Error::OptimizationFailed)
        }
    }
}

/// Smooths the path geometry with an elastic band, then resets the smoother
/// so the next call does not start from this solution.
pub fn smooth_trajectory_with_elastic_band<S: PathSmoother + ?Sized>(
    points: &mut Trajectory,
    state: &VehicleState,
    smoother: Option<&mut S>,
) -> Result<()> {
    let Some(smoother) = smoother else {
        log::error!("Elastic band path smoother is not initialized");
        return Err(Error::MissingPathSmoother);
    };
    *points = smoother.smooth_path(std::mem::take(points), &state.pose);
    smoother.reset_state();
    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// Records calls and applies simple, predictable transformations.
    #[derive(Default)]
    pub struct MockOptimizer {
        pub calls: Vec<&'static str>,
        pub fail: bool,
        pub keep_points: Option<usize>,
    }

    impl VelocityOptimizer for MockOptimizer {
        fn apply_lateral_acceleration_filter(
            &mut self,
            points: Trajectory,
            _speed: f64,
            _acc: f64,
            enable_smooth_limit: bool,
            use_resampling: bool,
        ) -> Trajectory {
            assert!(enable_smooth_limit && use_resampling);
            self.calls.push("lateral");
            points
        }

        fn apply_steering_rate_limit(&mut self, points: Trajectory, use_resampling: bool) -> Trajectory {
            assert!(!use_resampling);
            self.calls.push("steering");
            points
        }

        fn resample(
            &mut self,
            mut points: Trajectory,
            _speed: f64,
            _pose: &Pose,
            _dist: f64,
            _yaw: f64,
        ) -> Trajectory {
            self.calls.push("resample");
            if let Some(n) = self.keep_points {
                points.truncate(n);
            }
            points
        }

        fn optimize(&mut self, speed: f64, acc: f64, points: &[TrajectoryPoint]) -> Option<Trajectory> {
            self.calls.push("optimize");
            if self.fail {
                return None;
            }
            Some(
                points
                    .iter()
                    .map(|p| TrajectoryPoint {
                        velocity: speed,
                        acceleration: acc,
                        ..*p
                    })
                    .collect(),
            )
        }
    }

    #[derive(Default)]
    pub struct MockPathSmoother {
        pub smoothed: usize,
        pub resets: usize,
    }

    impl PathSmoother for MockPathSmoother {
        fn smooth_path(&mut self, points: Trajectory, _pose: &Pose) -> Trajectory {
            assert_eq!(self.smoothed, self.resets, "smoother used without reset");
            self.smoothed += 1;
            points
        }

        fn reset_state(&mut self) {
            self.resets += 1;
        }
    }

    fn setup() -> (Trajectory, VehicleState, PipelineConfig) {
        let points = (0..10)
            .map(|i| TrajectoryPoint::new(i as f64, 0.0, 0.0, 3.0))
            .collect();
        let state = VehicleState {
            pose: Pose::from_xy_yaw(3.1, 0.2, 0.0),
            velocity: 2.0,
            acceleration: 0.4,
        };
        (points, state, PipelineConfig::default())
    }

    #[test]
    fn runs_steps_in_order_and_clips_behind_vehicle() {
        let (mut points, state, config) = setup();
        let motion = InitialMotion::new(&state, &config);
        let mut optimizer = MockOptimizer::default();
        filter_velocity(&mut points, &motion, &state, &config, Some(&mut optimizer)).unwrap();

        assert_eq!(optimizer.calls, vec!["lateral", "steering", "resample", "optimize"]);
        assert_eq!(points.len(), 7);
        assert_approx_eq!(points[0].pose.position.x, 3.0);
        assert_approx_eq!(points[0].velocity, 2.0);
        assert_approx_eq!(points[0].acceleration, 0.4);
    }

    #[test]
    fn failed_optimization_keeps_clipped_trajectory() {
        let (mut points, state, config) = setup();
        let motion = InitialMotion::new(&state, &config);
        let mut optimizer = MockOptimizer {
            fail: true,
            ..Default::default()
        };
        let result = filter_velocity(&mut points, &motion, &state, &config, Some(&mut optimizer));
        assert!(matches!(result, Err(Error::OptimizationFailed)));
        assert_eq!(points.len(), 7);
        assert_approx_eq!(points[0].velocity, 3.0);
    }

    #[test]
    fn stops_when_resampling_leaves_too_few_points() {
        let (mut points, state, config) = setup();
        let motion = InitialMotion::new(&state, &config);
        let mut optimizer = MockOptimizer {
            keep_points: Some(1),
            ..Default::default()
        };
        filter_velocity(&mut points, &motion, &state, &config, Some(&mut optimizer)).unwrap();
        assert_eq!(points.len(), 1);
        assert!(!optimizer.calls.contains(&"optimize"));
    }

    #[test]
    fn missing_optimizer_is_a_no_op() {
        let (mut points, state, config) = setup();
        let motion = InitialMotion::new(&state, &config);
        let before = points.clone();
        let result = filter_velocity(&mut points, &motion, &state, &config, None::<&mut MockOptimizer>);
        assert!(matches!(result, Err(Error::MissingVelocityOptimizer)));
        assert_eq!(points, before);
    }

    #[test]
    fn elastic_band_is_reset_after_each_use() {
        let (mut points, state, _) = setup();
        let mut smoother = MockPathSmoother::default();
        for _ in 0..3 {
            smooth_trajectory_with_elastic_band(&mut points, &state, Some(&mut smoother)).unwrap();
        }
        assert_eq!(smoother.smoothed, 3);
        assert_eq!(smoother.resets, 3);
        assert_eq!(points.len(), 10);

        let result =
            smooth_trajectory_with_elastic_band(&mut points, &state, None::<&mut MockPathSmoother>);
        assert!(matches!(result, Err(Error::MissingPathSmoother)));
        assert_eq!(points.len(), 10);
    }
}
