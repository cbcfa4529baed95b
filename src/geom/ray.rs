//! Bounded sightlines.
//!
//! A `Ray` has an origin, a unit direction and a finite length, so every
//! intersection query is limited to the search radius it was cast with.

use crate::geom::EPS;
use crate::{Point, Polygon, Vector};

/// A ray defined by an origin point, a direction vector and a length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Point,
    /// Unit direction vector
    pub direction: Vector,
    /// Maximum distance from the origin
    pub length: f64,
}

impl Ray {
    /// Creates a new ray from origin point, direction vector and length.
    ///
    /// The direction vector is automatically normalized.
    /// Returns `None` for a zero direction or a non-positive length.
    pub fn new(origin: Point, direction: Vector, length: f64) -> Option<Self> {
        if length.is_nan() || length <= 0. {
            return None;
        }
        let normalized = direction.normalize()?;
        Some(Self {
            origin,
            direction: normalized,
            length,
        })
    }

    /// Returns the point along the ray at parameter t.
    ///
    /// point = origin + t * direction
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Calculates the intersection of this ray with a polygon.
    ///
    /// Returns `Some((t, point))` if the ray hits the polygon with
    /// `0 < t <= length`, boundary included.
    pub fn intersect_polygon(&self, polygon: &Polygon) -> Option<(f64, Point)> {
        let (a, b, c, d) = polygon.plane_coefficients();
        let plane_normal = Vector::new(a, b, c);

        let denom = plane_normal.dot(self.direction);
        if denom.abs() < EPS {
            return None; // Ray parallel to plane
        }

        // Plane: a*x + b*y + c*z + d = 0, ray: P = origin + t * direction
        let origin_dot = a * self.origin.x + b * self.origin.y + c * self.origin.z + d;
        let t = -origin_dot / denom;

        // Hits at the origin itself do not count
        if t < EPS || t > self.length + EPS {
            return None;
        }

        let intersection_point = self.point_at(t);
        if polygon.is_point_inside(intersection_point, true) {
            Some((t, intersection_point))
        } else {
            None
        }
    }
}
