//! Removal of duplicate and badly oriented points.

use crate::error::{Error, Result};
use crate::trajectory::{
    calc_distance2d, insert_orientation, remove_first_invalid_orientation_point, Trajectory,
};

/// Points closer than this to their predecessor are considered duplicates, in m.
pub const MIN_POINT_DISTANCE: f64 = 1e-2;

/// Removes overlapping points and points whose inferred heading reverses the
/// direction of travel.
///
/// Yaw is re-inferred after every removal, since dropping a point changes the
/// heading of its predecessor; the loop stops once a pass removes nothing.
/// Trajectories with fewer than two points are left unchanged.
pub fn remove_invalid_points(points: &mut Trajectory) -> Result<()> {
    if points.len() < 2 {
        log::error!("Not enough points in trajectory to remove invalid points");
        return Err(Error::NotEnoughPoints {
            stage: "before invalid point removal",
            len: points.len(),
        });
    }
    remove_close_proximity_points(points, MIN_POINT_DISTANCE);

    let mut previous_len = points.len() + 1;
    while previous_len != points.len() {
        previous_len = points.len();
        insert_orientation(points);
        remove_first_invalid_orientation_point(points);
    }
    Ok(())
}

/// Drops every point closer than `min_dist` to the previous surviving point.
/// The first point is always kept.
pub fn remove_close_proximity_points(points: &mut Trajectory, min_dist: f64) {
    if points.len() < 2 {
        return;
    }
    let mut last_kept = 0;
    let mut write = 1;
    for read in 1..points.len() {
        if calc_distance2d(&points[last_kept], &points[read]) < min_dist {
            continue;
        }
        points.swap(write, read);
        last_kept = write;
        write += 1;
    }
    points.truncate(write);
}
