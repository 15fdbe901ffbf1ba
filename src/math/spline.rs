//! Akima splines and the arc-length parameterised curves built from them.

use super::{CubicFn, ParametricCurve2d, Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;
use itertools::Itertools;

/// Below this weight sum the Akima slope falls back to the mean of the neighbouring secants.
const WEIGHT_EPSILON: f64 = 1e-9;

/// A piecewise cubic interpolant using Akima's slope estimate, which avoids the
/// overshoot a natural cubic spline shows around sharp changes in the data.
#[derive(Clone, Debug)]
pub struct AkimaSpline {
    knots: Vec<f64>,
    segments: Vec<CubicFn>,
}

impl AkimaSpline {
    /// Fits a spline through the points `(xs[i], ys[i])`.
    ///
    /// Returns `None` unless there are at least two points, both slices have the
    /// same length, every value is finite and `xs` is strictly increasing.
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return None;
        }
        if xs.iter().tuple_windows().any(|(a, b)| b <= a) {
            return None;
        }

        let secants = xs
            .iter()
            .zip(ys)
            .tuple_windows()
            .map(|((x1, y1), (x2, y2))| (y2 - y1) / (x2 - x1))
            .collect::<Vec<_>>();

        // Two extrapolated secants at each end, so every knot has four neighbours
        let mut m = Vec::with_capacity(secants.len() + 4);
        let (m0, m1) = (secants[0], *secants.get(1).unwrap_or(&secants[0]));
        let before = 2.0 * m0 - m1;
        m.push(2.0 * before - m0);
        m.push(before);
        m.extend_from_slice(&secants);
        for _ in 0..2 {
            let n = m.len();
            m.push(2.0 * m[n - 1] - m[n - 2]);
        }

        let slopes = (0..xs.len())
            .map(|i| {
                let w1 = (m[i + 3] - m[i + 2]).abs();
                let w2 = (m[i + 1] - m[i]).abs();
                if w1 + w2 < WEIGHT_EPSILON {
                    0.5 * (m[i + 1] + m[i + 2])
                } else {
                    (w1 * m[i + 1] + w2 * m[i + 2]) / (w1 + w2)
                }
            })
            .collect::<Vec<_>>();

        let segments = (0..xs.len() - 1)
            .map(|i| CubicFn::fit(xs[i], ys[i], slopes[i], xs[i + 1], ys[i + 1], slopes[i + 1]))
            .collect();

        Some(Self {
            knots: xs.to_vec(),
            segments,
        })
    }

    /// The range of x-values the spline was fitted over.
    pub fn bounds(&self) -> Interval<f64> {
        Interval::new(self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// The x-values of the fitted points.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Index of the segment containing `x`, clamped to the first and last segment.
    pub fn segment_index(&self, x: f64) -> usize {
        let idx = self.knots.partition_point(|k| *k <= x);
        idx.saturating_sub(1).min(self.segments.len() - 1)
    }

    pub fn y(&self, x: f64) -> f64 {
        self.y_and_dy(x).0
    }

    pub fn dy(&self, x: f64) -> f64 {
        self.y_and_dy(x).1
    }

    pub fn y_and_dy(&self, x: f64) -> (f64, f64) {
        self.segments[self.segment_index(x)].y_and_dy(x)
    }
}

/// A 2D curve made of independent Akima splines for x and y, parameterised by
/// the cumulative chord length of the points it was built from.
#[derive(Clone, Debug)]
pub struct SplineCurve2d {
    x: AkimaSpline,
    y: AkimaSpline,
}

impl SplineCurve2d {
    /// Builds a curve through `points`. Consecutive duplicate points must be
    /// removed beforehand, since they produce a zero-length parameter step.
    pub fn through(points: &[Point2d]) -> Option<Self> {
        let mut s = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        s.push(acc);
        for (a, b) in points.iter().tuple_windows() {
            acc += a.distance(*b);
            s.push(acc);
        }
        let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
        let ys = points.iter().map(|p| p.y).collect::<Vec<_>>();
        Some(Self {
            x: AkimaSpline::new(&s, &xs)?,
            y: AkimaSpline::new(&s, &ys)?,
        })
    }

    /// The arc-length parameter of each point the curve was built from.
    pub fn knots(&self) -> &[f64] {
        self.x.knots()
    }

    /// The total length of the curve, measured along its chords.
    pub fn length(&self) -> f64 {
        self.x.bounds().max
    }

    /// Index of the source segment containing the parameter `s`.
    pub fn segment_index(&self, s: f64) -> usize {
        self.x.segment_index(s)
    }
}

impl ParametricCurve2d for SplineCurve2d {
    fn sample(&self, t: f64) -> Point2d {
        Point2d::new(self.x.y(t), self.y.y(t))
    }

    fn bounds(&self) -> Interval<f64> {
        self.x.bounds()
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.dy(t), self.y.dy(t))
    }
}
