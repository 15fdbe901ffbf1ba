//! Resampling a trajectory at a fixed time step.

use crate::error::{Error, Result};
use crate::pose::Pose;
use crate::trajectory::{calc_distance2d, Trajectory, TrajectoryPoint};
use itertools::Itertools;

/// The smallest time step the resampler accepts, in s.
pub const MIN_TIME_STEP: f64 = 0.01;

/// Resamples the trajectory every `dt` seconds of travel.
///
/// Starting from the first point, each segment is walked in steps of
/// `velocity * dt`, using the velocity of the point at the start of the
/// segment. Segments which are stationary, or which would be crossed in a
/// single step, contribute no points. Time from start grows by `dt` for every
/// emitted point.
///
/// If fewer than two points would remain, the trajectory is left unchanged and
/// [Error::NotEnoughPoints] returned.
pub fn resample_by_time(points: &mut Trajectory, dt: f64) -> Result<()> {
    if !(dt >= MIN_TIME_STEP) {
        log::error!("Time step {} s is too small to resample", dt);
        return Err(Error::TimeStepTooSmall(dt));
    }
    if points.len() < 2 {
        log::error!("Not enough points in trajectory to resample");
        return Err(Error::NotEnoughPoints {
            stage: "before time resampling",
            len: points.len(),
        });
    }

    let mut time = points[0].time_from_start;
    let mut output = vec![points[0]];
    for (a, b) in points.iter().tuple_windows() {
        let length = calc_distance2d(a, b);
        let step = a.velocity.abs() * dt;
        if step <= 0.0 || step >= length {
            continue;
        }
        let mut covered = step;
        while covered < length {
            let ratio = covered / length;
            time += dt;
            output.push(TrajectoryPoint {
                pose: Pose::lerp(&a.pose, &b.pose, ratio),
                velocity: a.velocity,
                acceleration: a.acceleration,
                heading_rate: a.heading_rate + (b.heading_rate - a.heading_rate) * ratio,
                time_from_start: time,
            });
            covered += step;
        }
    }
    if output.len() < 2 {
        log::warn!("Not enough points in trajectory after time resampling");
        return Err(Error::NotEnoughPoints {
            stage: "after time resampling",
            len: output.len(),
        });
    }
    *points = output;
    Ok(())
}
