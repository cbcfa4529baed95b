//! Bounded planes spanned by two sightlines.
//!
//! A `BoundedPlane` is the parallelogram `origin + s*u + t*v` with
//! `s in [0, u_len]` and `t in [0, v_len]`. Intersecting it with a polygon
//! yields the endpoints of the intersection segments, clipped to the
//! parallelogram.

use crate::geom::EPS;
use crate::geom::point::push_unique;
use crate::geom::ray::Ray;
use crate::geom::segment::{clip_segment_to_rect, segment_plane_crossing};
use crate::{Point, Polygon, Vector};

/// Minimum `|u x v|` for the two spanning directions.
const MIN_SPAN_SINE: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct BoundedPlane {
    pub origin: Point,
    pub u: Vector,
    pub v: Vector,
    pub u_len: f64,
    pub v_len: f64,
    normal: Vector,
}

impl BoundedPlane {
    /// Creates a plane spanned by `u_len` along `u` and `v_len` along `v`.
    ///
    /// Returns `None` if the directions are (nearly) parallel or a length is not positive.
    pub fn new(origin: Point, u: Vector, u_len: f64, v: Vector, v_len: f64) -> Option<Self> {
        if u_len.is_nan() || v_len.is_nan() || u_len <= 0. || v_len <= 0. {
            return None;
        }
        let u = u.normalize()?;
        let v = v.normalize()?;
        let cross = u.cross(v);
        if cross.length() < MIN_SPAN_SINE {
            return None;
        }
        let normal = cross.normalize()?;
        Some(Self {
            origin,
            u,
            v,
            u_len,
            v_len,
            normal,
        })
    }

    /// Creates the plane spanned by two sightlines cast from a common origin.
    pub fn from_rays(a: &Ray, b: &Ray) -> Option<Self> {
        if !a.origin.is_close(&b.origin) {
            return None;
        }
        Self::new(a.origin, a.direction, a.length, b.direction, b.length)
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Oblique coordinates `(s, t)` of the projection of `p` onto the plane.
    pub fn local_coords(&self, p: Point) -> (f64, f64) {
        let r = p - self.origin;
        let ru = r.dot(self.u);
        let rv = r.dot(self.v);
        let c = self.u.dot(self.v);
        let det = 1. - c * c;
        ((ru - c * rv) / det, (rv - c * ru) / det)
    }

    pub fn point_at(&self, s: f64, t: f64) -> Point {
        self.origin + self.u * s + self.v * t
    }

    /// Returns true if `p` lies on the plane within its bounds.
    pub fn contains(&self, p: Point) -> bool {
        if (p - self.origin).dot(self.normal).abs() > 1e-6 {
            return false;
        }
        let (s, t) = self.local_coords(p);
        (-EPS..=self.u_len + EPS).contains(&s) && (-EPS..=self.v_len + EPS).contains(&t)
    }

    /// Clips the segment `a`-`b` (lying in the plane) to the plane bounds.
    fn clip(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let (sa, ta) = self.local_coords(a);
        let (sb, tb) = self.local_coords(b);
        let ((s0, t0), (s1, t1)) = clip_segment_to_rect((sa, ta), (sb, tb), self.u_len, self.v_len)?;
        Some((self.point_at(s0, t0), self.point_at(s1, t1)))
    }

    /// Endpoints of the segments where `polygon` meets this bounded plane.
    ///
    /// A polygon lying in the plane contributes its clipped edges. Points are
    /// deduplicated; their order is not significant.
    pub fn intersect_polygon(&self, polygon: &Polygon) -> Vec<Point> {
        let mut out: Vec<Point> = Vec::new();

        let coplanar = polygon
            .vertices()
            .iter()
            .all(|p| (*p - self.origin).dot(self.normal).abs() < EPS);
        if coplanar {
            for (a, b) in polygon.edges() {
                if let Some((p, q)) = self.clip(a, b) {
                    push_unique(&mut out, p);
                    push_unique(&mut out, q);
                }
            }
            return out;
        }

        let mut crossings: Vec<Point> = Vec::new();
        for (a, b) in polygon.edges() {
            if let Some(pt) = segment_plane_crossing(a, b, self.origin, self.normal) {
                push_unique(&mut crossings, pt);
            }
        }
        if crossings.is_empty() {
            return out;
        }

        // Order the crossings along the line shared by both planes
        let Some(line_dir) = self.normal.cross(polygon.vn).normalize() else {
            return out;
        };
        let start = crossings[0];
        crossings.sort_by(|p, q| {
            let tp = (*p - start).dot(line_dir);
            let tq = (*q - start).dot(line_dir);
            tp.total_cmp(&tq)
        });

        // Consecutive crossings enclose a segment if their midpoint is inside the polygon
        let mut segments: Vec<(Point, Point)> = Vec::new();
        let mut covered = vec![false; crossings.len()];
        for k in 0..crossings.len().saturating_sub(1) {
            let mid = Point::new_between_2_points(crossings[k], crossings[k + 1], 0.5);
            if polygon.is_point_inside(mid, true) {
                segments.push((crossings[k], crossings[k + 1]));
                covered[k] = true;
                covered[k + 1] = true;
            }
        }
        for (k, pt) in crossings.iter().enumerate() {
            if !covered[k] {
                segments.push((*pt, *pt));
            }
        }

        for (a, b) in segments {
            if let Some((p, q)) = self.clip(a, b) {
                push_unique(&mut out, p);
                push_unique(&mut out, q);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    /// Vertical plane x = 0 spanned by +y (outward) and +z (up), 10 x 10.
    fn make_plane() -> BoundedPlane {
        BoundedPlane::new(
            Point::new(0., 0., 0.),
            Vector::new(0., 1., 0.),
            10.,
            Vector::new(0., 0., 1.),
            10.,
        )
        .unwrap()
    }

    #[test]
    fn test_parallel_directions() {
        let p = BoundedPlane::new(
            Point::new(0., 0., 0.),
            Vector::new(0., 1., 0.),
            1.,
            Vector::new(0., 2., 0.),
            1.,
        );
        assert!(p.is_none());
    }

    #[test]
    fn test_from_rays() {
        let o = Point::new(1., 1., 1.);
        let a = Ray::new(o, Vector::new(0., 1., 0.), 5.).unwrap();
        let b = Ray::new(o, Vector::new(0., 0., 1.), 7.).unwrap();
        let plane = BoundedPlane::from_rays(&a, &b).unwrap();
        assert_eq!(plane.u_len, 5.);
        assert_eq!(plane.v_len, 7.);
        assert!(plane.contains(Point::new(1., 6., 8.)));
        assert!(!plane.contains(Point::new(1., 6.5, 8.)));
        assert!(!plane.contains(Point::new(1.5, 2., 2.)));
    }

    #[test]
    fn test_oblique_local_coords() {
        let plane = BoundedPlane::new(
            Point::new(0., 0., 0.),
            Vector::new(1., 0., 0.),
            10.,
            Vector::new(1., 1., 0.),
            10.,
        )
        .unwrap();
        let p = plane.point_at(2., 3.);
        let (s, t) = plane.local_coords(p);
        assert!((s - 2.).abs() < 1e-12);
        assert!((t - 3.).abs() < 1e-12);
    }

    #[test]
    fn test_crossing_wall() -> Result<()> {
        // Wall at y = 3 (normal -y), spanning x in [-1, 1] and z in [-2, 4]
        let wall = Polygon::new(
            "wall",
            vec![
                Point::new(-1., 3., -2.),
                Point::new(-1., 3., 4.),
                Point::new(1., 3., 4.),
                Point::new(1., 3., -2.),
            ],
            None,
        )?;
        let pts = make_plane().intersect_polygon(&wall);
        // Clipped to t >= 0
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| p.is_close(&Point::new(0., 3., 0.))));
        assert!(pts.iter().any(|p| p.is_close(&Point::new(0., 3., 4.))));
        Ok(())
    }

    #[test]
    fn test_missing_wall() -> Result<()> {
        let wall = Polygon::new(
            "wall",
            vec![
                Point::new(2., 3., 0.),
                Point::new(2., 3., 4.),
                Point::new(4., 3., 4.),
                Point::new(4., 3., 0.),
            ],
            None,
        )?;
        assert!(make_plane().intersect_polygon(&wall).is_empty());
        Ok(())
    }

    #[test]
    fn test_concave_polygon_gives_two_segments() -> Result<()> {
        // C-shaped polygon in plane y = 2, notch open towards +x, crossed by x = 0
        let c_shape = Polygon::new(
            "c",
            vec![
                Point::new(-1., 2., 0.),
                Point::new(1., 2., 0.),
                Point::new(1., 2., 1.),
                Point::new(-0.5, 2., 1.),
                Point::new(-0.5, 2., 2.),
                Point::new(1., 2., 2.),
                Point::new(1., 2., 3.),
                Point::new(-1., 2., 3.),
            ],
            None,
        )?;
        let pts = make_plane().intersect_polygon(&c_shape);
        assert_eq!(pts.len(), 4);
        for z in [0., 1., 2., 3.] {
            assert!(pts.iter().any(|p| p.is_close(&Point::new(0., 2., z))));
        }
        Ok(())
    }

    #[test]
    fn test_coplanar_polygon() -> Result<()> {
        let square = Polygon::new(
            "in_plane",
            vec![
                Point::new(0., 1., 1.),
                Point::new(0., 2., 1.),
                Point::new(0., 2., 2.),
                Point::new(0., 1., 2.),
            ],
            None,
        )?;
        let pts = make_plane().intersect_polygon(&square);
        assert_eq!(pts.len(), 4);
        Ok(())
    }
}
