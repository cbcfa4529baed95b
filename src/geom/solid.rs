use crate::{Point, Polygon, Vector};
use anyhow::Result;

/// Opaque geometry that may cast shade: a named set of planar polygons.
///
/// The polygons do not need to form a closed shell, so a single surface
/// (a canopy, a free-standing screen) is a `Solid` with one polygon.
#[derive(Debug, Clone)]
pub struct Solid {
    pub name: String,
    polygons: Vec<Polygon>,
}

impl Solid {
    pub fn new(name: &str, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.to_string(),
            polygons,
        }
    }

    /// Wraps a single surface.
    pub fn from_polygon(polygon: Polygon) -> Self {
        let name = polygon.name.clone();
        Self::new(&name, vec![polygon])
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Return a box with given dimensions and location.
    ///
    /// `x`, `y`, `z` are the dimensions along the X, Y and Z axes.
    /// The corner `(min(x), min(y), min(z))` will be located at `origin`.
    /// All face normals point outwards.
    pub fn from_box(x: f64, y: f64, z: f64, origin: Option<(f64, f64, f64)>, name: &str) -> Result<Self> {
        let origin_vec = match origin {
            Some((dx, dy, dz)) => Vector::new(dx, dy, dz),
            None => Vector::new(0., 0., 0.),
        };

        let p0 = Point::new(0., 0., 0.) + origin_vec;
        let p1 = Point::new(x, 0., 0.) + origin_vec;
        let p2 = Point::new(x, y, 0.) + origin_vec;
        let p3 = Point::new(0., y, 0.) + origin_vec;
        let p4 = Point::new(0., 0., z) + origin_vec;
        let p5 = Point::new(x, 0., z) + origin_vec;
        let p6 = Point::new(x, y, z) + origin_vec;
        let p7 = Point::new(0., y, z) + origin_vec;

        let polygons = vec![
            Polygon::new("floor", vec![p0, p3, p2, p1], None)?,
            Polygon::new("wall_0", vec![p0, p1, p5, p4], None)?,
            Polygon::new("wall_1", vec![p1, p2, p6, p5], None)?,
            Polygon::new("wall_2", vec![p3, p7, p6, p2], None)?,
            Polygon::new("wall_3", vec![p0, p4, p7, p3], None)?,
            Polygon::new("ceiling", vec![p4, p5, p6, p7], None)?,
        ];

        Ok(Self::new(name, polygons))
    }
}
