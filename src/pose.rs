//! Vehicle poses: a 3D position and a quaternion orientation.

use crate::math::{Point2d, Point3d};
use cgmath::prelude::*;
use cgmath::{Quaternion, Rad};
use serde::{Deserialize, Serialize};

/// A position in space together with an orientation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3d,
    pub orientation: Quaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3d::new(0.0, 0.0, 0.0),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

impl Pose {
    /// Creates a pose on the ground plane facing along `yaw` radians.
    pub fn from_xy_yaw(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            position: Point3d::new(x, y, 0.0),
            orientation: yaw_to_quaternion(yaw),
        }
    }

    /// The position projected onto the ground plane.
    pub fn xy(&self) -> Point2d {
        Point2d::new(self.position.x, self.position.y)
    }

    /// The heading about the z-axis in radians.
    pub fn yaw(&self) -> f64 {
        let Quaternion { s: w, v } = self.orientation;
        let siny_cosp = 2.0 * (w * v.z + v.x * v.y);
        let cosy_cosp = 1.0 - 2.0 * (v.y * v.y + v.z * v.z);
        siny_cosp.atan2(cosy_cosp)
    }

    /// Replaces the orientation with a pure rotation about the z-axis.
    pub fn set_yaw(&mut self, yaw: f64) {
        self.orientation = yaw_to_quaternion(yaw);
    }

    /// Returns true if all seven scalars of the pose are finite.
    pub fn is_valid(&self) -> bool {
        let p = self.position;
        let q = self.orientation;
        [p.x, p.y, p.z, q.v.x, q.v.y, q.v.z, q.s]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Planar distance between two poses.
    pub fn distance2d(&self, other: &Pose) -> f64 {
        self.xy().distance(other.xy())
    }

    /// Interpolates between two poses.
    ///
    /// The position is interpolated linearly and the orientation spherically,
    /// so the heading turns smoothly from `a` to `b` as `ratio` goes from 0 to 1.
    pub fn lerp(a: &Pose, b: &Pose, ratio: f64) -> Pose {
        let position = a.position + (b.position - a.position) * ratio;
        let orientation = if a.orientation.dot(b.orientation) < 0.0 {
            // Shortest arc
            a.orientation.slerp(-b.orientation, ratio)
        } else {
            a.orientation.slerp(b.orientation, ratio)
        };
        Pose {
            position,
            orientation,
        }
    }
}

fn yaw_to_quaternion(yaw: f64) -> Quaternion<f64> {
    Quaternion::from_angle_z(Rad(yaw))
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn yaw_round_trips_through_quaternion() {
        for yaw in [-3.0, -PI / 2.0, 0.0, 0.3, PI / 2.0, 3.0] {
            let pose = Pose::from_xy_yaw(1.0, 2.0, yaw);
            assert_approx_eq!(pose.yaw(), yaw);
        }
    }

    #[test]
    fn validate_rejects_each_non_finite_scalar() {
        let pose = Pose::from_xy_yaw(1.0, 2.0, 0.5);
        assert!(pose.is_valid());
        for i in 0..7 {
            for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let mut p = pose;
                match i {
                    0 => p.position.x = bad,
                    1 => p.position.y = bad,
                    2 => p.position.z = bad,
                    3 => p.orientation.v.x = bad,
                    4 => p.orientation.v.y = bad,
                    5 => p.orientation.v.z = bad,
                    _ => p.orientation.s = bad,
                }
                assert!(!p.is_valid(), "scalar {} = {} accepted", i, bad);
            }
        }
    }

    #[test]
    fn lerp_interpolates_position_and_heading() {
        let a = Pose::from_xy_yaw(0.0, 0.0, 0.0);
        let b = Pose::from_xy_yaw(2.0, 4.0, PI / 2.0);
        let mid = Pose::lerp(&a, &b, 0.5);
        assert_approx_eq!(mid.position.x, 1.0);
        assert_approx_eq!(mid.position.y, 2.0);
        assert_approx_eq!(mid.yaw(), PI / 4.0);

        let end = Pose::lerp(&a, &b, 1.0);
        assert_approx_eq!(end.yaw(), PI / 2.0);
    }

    #[test]
    fn lerp_takes_the_short_way_round() {
        let a = Pose::from_xy_yaw(0.0, 0.0, 3.0);
        let b = Pose::from_xy_yaw(1.0, 0.0, -3.0);
        let mid = Pose::lerp(&a, &b, 0.5);
        assert_approx_eq!(mid.yaw().abs(), PI);
    }
}
