use crate::Vector;
use crate::geom::EPS;
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS
            && (self.y - other.y).abs() < EPS
            && (self.z - other.z).abs() < EPS
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    // Creates a new point along the edge pt1->pt2 with some relative distance from pt1.
    pub fn new_between_2_points(pt1: Self, pt2: Self, rel_d: f64) -> Self {
        pt1 + (pt2 - pt1) * rel_d
    }

    /// Returns true if the point lies on the segment `beg`-`end` (endpoints included).
    pub fn is_on_segment(&self, beg: Self, end: Self) -> bool {
        let seg = end - beg;
        let len_sq = seg.dot(seg);
        if len_sq < EPS * EPS {
            return self.is_close(&beg);
        }
        let t = (*self - beg).dot(seg) / len_sq;
        if !(-EPS..=1.0 + EPS).contains(&t) {
            return false;
        }
        let projected = beg + seg * t.clamp(0.0, 1.0);
        self.is_close(&projected)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Point({:.prec$}, {:.prec$}, {:.prec$})",
            self.x,
            self.y,
            self.z,
            prec = prec
        )
    }
}

// Implement +
impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
            z: self.z + other.dz,
        }
    }
}

// Implement - (point - point gives the vector between them)
impl Sub for Point {
    type Output = Vector;
    fn sub(self, other: Self) -> Vector {
        Vector::from_points(other, self)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, other: Vector) -> Self {
        self + other * -1.
    }
}

/// Appends `pt` to `pts` unless a close point is already present.
pub fn push_unique(pts: &mut Vec<Point>, pt: Point) {
    if !pts.iter().any(|p| p.is_close(&pt)) {
        pts.push(pt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let pa = Point::new(5., 5., 5.);
        let pb = Point::new(5.00000000000001, 5., 5.);
        let pc = Point::new(5.0001, 5., 5.);
        assert!(pa.is_close(&pb));
        assert!(!pa.is_close(&pc));
    }

    #[test]
    fn test_sub_gives_vector() {
        let p0 = Point::new(1., 2., 3.);
        let p1 = Point::new(2., 4., 6.);
        assert!((p1 - p0).is_close(&Vector::new(1., 2., 3.)));
        assert!((p1 - Vector::new(1., 2., 3.)).is_close(&p0));
        assert!((p0.distance(&p1) - 14f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_new_between_2_points() {
        let p0 = Point::new(0., 0., 0.);
        let p1 = Point::new(1., 1., 1.);
        let ptest = Point::new_between_2_points(p0, p1, 0.5);
        assert!(ptest.is_close(&Point::new(0.5, 0.5, 0.5)));
        let ptest = Point::new_between_2_points(p0, p1, 1.0);
        assert!(ptest.is_close(&p1));
        let ptest = Point::new_between_2_points(p0, p0, 0.5);
        assert!(ptest.is_close(&p0));
    }

    #[test]
    fn test_is_on_segment() {
        let a = Point::new(0., 0., 0.);
        let b = Point::new(2., 0., 0.);
        assert!(Point::new(1., 0., 0.).is_on_segment(a, b));
        assert!(a.is_on_segment(a, b));
        assert!(!Point::new(3., 0., 0.).is_on_segment(a, b));
        assert!(!Point::new(1., 0.1, 0.).is_on_segment(a, b));
    }

    #[test]
    fn test_push_unique() {
        let mut pts = vec![Point::new(0., 0., 0.)];
        push_unique(&mut pts, Point::new(0., 0., 1e-14));
        push_unique(&mut pts, Point::new(1., 0., 0.));
        assert_eq!(pts.len(), 2);
    }
}
