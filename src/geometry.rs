//! Plane geometry helpers.
//!
//! Screen convention: `y` grows downward, so angles increase clockwise.

use std::f64::consts::{PI, TAU};

/// A point (or displacement) on the plane
pub type Point = (f64, f64);

/// Heading pointing along +x
pub const ANGLE_RIGHT: f64 = 0.0;
/// Heading pointing down the screen
pub const ANGLE_DOWN: f64 = PI / 2.0;
/// Heading pointing along -x
pub const ANGLE_LEFT: f64 = PI;
/// Heading pointing up the screen
pub const ANGLE_UP: f64 = PI * 1.5;

/// Euclidean distance between two points
#[inline]
pub fn dist(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Convert a displacement to `(angle, magnitude)`
#[inline]
pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
    (y.atan2(x), x.hypot(y))
}

/// Convert `(angle, magnitude)` to a displacement
#[inline]
pub fn to_cartesian(angle: f64, magnitude: f64) -> Point {
    (magnitude * angle.cos(), magnitude * angle.sin())
}

/// Angle of the ray from `from` to `to`
#[inline]
pub fn angle_between(from: Point, to: Point) -> f64 {
    to_polar(to.0 - from.0, to.1 - from.1).0
}

/// Two circles intersect when their centres are no further apart than
/// the sum of their radii.
#[inline]
pub fn circles_touching(c1: Point, c2: Point, r1: f64, r2: f64) -> bool {
    dist(c1, c2) <= r1 + r2
}

/// Signed difference `a - b` wrapped into `(-PI, PI]`
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}
