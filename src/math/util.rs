use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use std::f64::consts::PI;

/// Wraps an angle in radians into the range (-π, π].
pub fn normalize_radian(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

/// The azimuth of the vector from `from` to `to`, in radians.
pub fn azimuth(from: Point2d, to: Point2d) -> f64 {
    let v = to - from;
    v.y.atan2(v.x)
}

/// The heading of a tangent vector, in radians.
pub fn heading(tangent: Vector2d) -> f64 {
    tangent.y.atan2(tangent.x)
}

/// Normalises a vector, returning `None` if it has no usable direction.
pub fn try_normalize(v: Vector2d) -> Option<Vector2d> {
    let mag = v.magnitude();
    (mag.is_finite() && mag > f64::EPSILON).then(|| v / mag)
}
