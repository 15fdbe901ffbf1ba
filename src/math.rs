//! Mathematical structs and functions.

use cgmath::{Point2, Point3, Vector2};
pub use util::*;
pub use cubic::CubicFn;
pub use curve::ParametricCurve2d;
pub use spline::{AkimaSpline, SplineCurve2d};

mod util;
mod cubic;
mod curve;
mod spline;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// A 3D point
pub type Point3d = Point3<f64>;
