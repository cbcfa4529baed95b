//! Geometry queries used by the shading probe.
//!
//! The probe only needs a handful of planar operations. They are collected in
//! the `GeometryQuery` trait so a different geometry backend can be plugged in.

use crate::geom::plane::BoundedPlane;
use crate::geom::point::push_unique;
use crate::geom::ray::Ray;
use crate::geom::solid::Solid;
use crate::{Point, Polygon, Vector};

pub trait GeometryQuery {
    /// Casts a sightline of the given length. `None` if the direction is degenerate.
    fn cast_ray(&self, origin: Point, direction: Vector, length: f64) -> Option<Ray>;

    /// Points where the sightline hits the obstruction, ordered by distance.
    fn intersect_ray(&self, ray: &Ray, obstruction: &Solid) -> Vec<Point>;

    /// Endpoints of the intersection curves between the plane and the obstruction.
    fn intersect_plane(&self, plane: &BoundedPlane, obstruction: &Solid) -> Vec<Point>;

    fn polygon_centroid(&self, polygon: &Polygon) -> Point;

    fn polygon_normal(&self, polygon: &Polygon) -> Vector;
}

/// Hand-written planar implementation of [`GeometryQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarQuery;

impl GeometryQuery for PlanarQuery {
    fn cast_ray(&self, origin: Point, direction: Vector, length: f64) -> Option<Ray> {
        Ray::new(origin, direction, length)
    }

    fn intersect_ray(&self, ray: &Ray, obstruction: &Solid) -> Vec<Point> {
        let mut hits: Vec<(f64, Point)> = obstruction
            .polygons()
            .iter()
            .filter_map(|poly| ray.intersect_polygon(poly))
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut pts: Vec<Point> = Vec::with_capacity(hits.len());
        for (_, pt) in hits {
            push_unique(&mut pts, pt);
        }
        pts
    }

    fn intersect_plane(&self, plane: &BoundedPlane, obstruction: &Solid) -> Vec<Point> {
        let mut pts: Vec<Point> = Vec::new();
        for poly in obstruction.polygons() {
            for pt in plane.intersect_polygon(poly) {
                push_unique(&mut pts, pt);
            }
        }
        pts
    }

    fn polygon_centroid(&self, polygon: &Polygon) -> Point {
        polygon.centroid()
    }

    fn polygon_normal(&self, polygon: &Polygon) -> Vector {
        polygon.vn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_ray_through_box() -> Result<()> {
        let solid = Solid::from_box(2., 2., 2., Some((-1., 4., -1.)), "box")?;
        let q = PlanarQuery;
        let ray = q.cast_ray(Point::new(0., 0., 0.), Vector::new(0., 1., 0.), 99.).unwrap();
        let hits = q.intersect_ray(&ray, &solid);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].is_close(&Point::new(0., 4., 0.)));
        assert!(hits[1].is_close(&Point::new(0., 6., 0.)));

        let short = q.cast_ray(Point::new(0., 0., 0.), Vector::new(0., 1., 0.), 3.).unwrap();
        assert!(q.intersect_ray(&short, &solid).is_empty());
        Ok(())
    }

    #[test]
    fn test_plane_through_box() -> Result<()> {
        // Box in front (y in [4, 6]) reaching from z = -1 to z = 3
        let solid = Solid::from_box(2., 2., 4., Some((-1., 4., -1.)), "box")?;
        let q = PlanarQuery;
        let plane = BoundedPlane::new(
            Point::new(0., 0., 0.),
            Vector::new(0., 1., 0.),
            99.,
            Vector::up(),
            99.,
        )
        .unwrap();
        let pts = q.intersect_plane(&plane, &solid);
        // Cross-section rectangle clipped at z = 0
        assert_eq!(pts.len(), 4);
        for expected in [
            Point::new(0., 4., 0.),
            Point::new(0., 6., 0.),
            Point::new(0., 4., 3.),
            Point::new(0., 6., 3.),
        ] {
            assert!(pts.iter().any(|p| p.is_close(&expected)), "missing {expected}");
        }
        Ok(())
    }
}
