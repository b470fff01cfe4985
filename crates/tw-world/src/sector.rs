//! Radius plus angular-window filter approximating a sensor's field of view.
//!
//! Boundaries are inclusive: a point exactly at the radius, or exactly on
//! the left or right boundary angle, is inside.  The window runs
//! counter-clockwise from the right boundary to the left one; when
//! `left < right` after normalization it wraps through ±π.

use tw_core::{normalize_angle, Vector2d};

use crate::{MovingObject, StationaryObject, TrafficSign, WorldObject};

const EPS: f64 = 1e-9;

/// Anything with a reference point in the ground plane.
pub trait Located {
    fn location(&self) -> Vector2d;
}

impl Located for Vector2d {
    #[inline]
    fn location(&self) -> Vector2d {
        *self
    }
}

impl Located for WorldObject {
    #[inline]
    fn location(&self) -> Vector2d {
        self.position.planar()
    }
}

impl Located for MovingObject {
    #[inline]
    fn location(&self) -> Vector2d {
        self.base.location()
    }
}

impl Located for StationaryObject {
    #[inline]
    fn location(&self) -> Vector2d {
        self.base.location()
    }
}

impl Located for TrafficSign {
    #[inline]
    fn location(&self) -> Vector2d {
        self.position
    }
}

/// A circular sector around `origin`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sector {
    origin: Vector2d,
    radius: f64,
    /// `(left, right)` boundary angles; `None` for a full circle.
    bounds: Option<(f64, f64)>,
}

impl Sector {
    /// `None` for a non-positive radius or a zero-width window.
    pub fn new(origin: Vector2d, radius: f64, left: f64, right: f64) -> Option<Self> {
        let (left, right) = (normalize_angle(left), normalize_angle(right));
        if !(radius > 0.0) || (left - right).abs() < EPS {
            return None;
        }
        Some(Self { origin, radius, bounds: Some((left, right)) })
    }

    /// A full circle; `None` for a non-positive radius.
    pub fn circle(origin: Vector2d, radius: f64) -> Option<Self> {
        (radius > 0.0).then_some(Self { origin, radius, bounds: None })
    }

    pub fn contains(&self, point: Vector2d) -> bool {
        let rel = point - self.origin;
        let distance = rel.length();
        if distance < EPS {
            return true;
        }
        if distance > self.radius {
            return false;
        }
        let Some((left, right)) = self.bounds else {
            return true;
        };
        let direction = rel.heading();
        let outside = if left < right {
            direction < right && direction > left
        } else {
            direction < right || direction > left
        };
        !outside
    }
}

/// Items of `items` inside the sector `origin`/`radius`/`left`/`right`.
/// Degenerate sectors match nothing.
pub fn apply_sector_filter<'a, T, I>(
    items: I,
    origin: Vector2d,
    radius: f64,
    left: f64,
    right: f64,
) -> Vec<&'a T>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    match Sector::new(origin, radius, left, right) {
        Some(sector) => items.into_iter().filter(|i| sector.contains(i.location())).collect(),
        None => Vec::new(),
    }
}
