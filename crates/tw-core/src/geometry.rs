//! Geometry primitives shared by every layer.
//!
//! All quantities are `f64` in metres and radians.  Angles follow the
//! mathematical convention: counter-clockwise positive, 0 along +x.  Lateral
//! road coordinates (`t`) are positive to the left of the reference line.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

use crate::RoadId;

/// Map `angle` into the half-open interval (−π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

// ── Vector2d ──────────────────────────────────────────────────────────────────

/// A planar vector or point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2d {
    pub x: f64,
    pub y: f64,
}

impl Vector2d {
    pub const ZERO: Vector2d = Vector2d { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `heading`.
    #[inline]
    pub fn from_heading(heading: f64) -> Self {
        Self { x: heading.cos(), y: heading.sin() }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(self, other: Vector2d) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3-D cross product.  Positive when `other` lies to
    /// the left of `self`.
    #[inline]
    pub fn cross(self, other: Vector2d) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate counter-clockwise by `angle`.
    pub fn rotate(self, angle: f64) -> Vector2d {
        let (sin, cos) = angle.sin_cos();
        Vector2d {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Direction of the vector; `0.0` for the zero vector.
    #[inline]
    pub fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn distance(self, other: Vector2d) -> f64 {
        (other - self).length()
    }

    /// Left-hand normal of the unit vector along `heading`.
    #[inline]
    pub fn left_normal(heading: f64) -> Vector2d {
        Vector2d { x: -heading.sin(), y: heading.cos() }
    }
}

impl Add for Vector2d {
    type Output = Vector2d;
    #[inline]
    fn add(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2d {
    type Output = Vector2d;
    #[inline]
    fn sub(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2d {
    type Output = Vector2d;
    #[inline]
    fn mul(self, rhs: f64) -> Vector2d {
        Vector2d::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2d {
    type Output = Vector2d;
    #[inline]
    fn neg(self) -> Vector2d {
        Vector2d::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vector2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Position / Orientation / Dimension ────────────────────────────────────────

/// Absolute 3-D position of an object's reference point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the ground plane.
    #[inline]
    pub fn planar(self) -> Vector2d {
        Vector2d::new(self.x, self.y)
    }
}

/// Absolute orientation in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub yaw:   f64,
    pub pitch: f64,
    pub roll:  f64,
}

impl Orientation {
    #[inline]
    pub const fn from_yaw(yaw: f64) -> Self {
        Self { yaw, pitch: 0.0, roll: 0.0 }
    }
}

/// Bounding-box extent of an object.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub length: f64,
    pub width:  f64,
    pub height: f64,
}

impl Dimension {
    #[inline]
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self { length, width, height }
    }

    /// Ground-plane corners of a box centred on `center` and rotated by
    /// `yaw`, in the order front-left, front-right, rear-right, rear-left.
    pub fn corners(&self, center: Vector2d, yaw: f64) -> [Vector2d; 4] {
        let half_l = self.length * 0.5;
        let half_w = self.width * 0.5;
        [
            Vector2d::new(half_l, half_w),
            Vector2d::new(half_l, -half_w),
            Vector2d::new(-half_l, -half_w),
            Vector2d::new(-half_l, half_w),
        ]
        .map(|local| center + local.rotate(yaw))
    }
}

// ── RoadCoordinate ────────────────────────────────────────────────────────────

/// Road-relative placement: longitudinal `s`, lateral `t` from the lane
/// centre, and `yaw` relative to the lane heading.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadCoordinate {
    pub road: RoadId,
    pub s:    f64,
    pub t:    f64,
    pub yaw:  f64,
}
