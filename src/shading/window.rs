//! Window geometry as seen by the shading engine.
//!
//! Conventions:
//! - Azimuth: degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
//! - Tilt: degrees from horizontal-up (0 = skylight facing up, 90 = vertical wall).

use crate::geom::EPS;
use crate::{Point, Polygon, Vector};
use anyhow::{Result, anyhow, bail};

/// A glazing polygon with the orientation data derived from it.
#[derive(Debug, Clone)]
pub struct Window {
    pub name: String,
    glazing: Polygon,
    azimuth: f64,
    tilt: f64,
    width: f64,
    height: f64,
    /// In-plane up direction.
    up: Vector,
    /// In-plane right direction, seen from outside.
    right: Vector,
    bottom: (Point, Point),
    top: (Point, Point),
    sides: [(Point, Point); 2],
}

impl Window {
    /// Creates a window from its glazing polygon (frame already removed).
    ///
    /// The outward normal follows the vertex order of the polygon.
    /// Fails if the glazing has no distinct bottom, top, left and right edges
    /// or has zero width or height.
    pub fn new(glazing: Polygon) -> Result<Self> {
        let name = glazing.name.clone();
        let n = glazing.vn;

        let azimuth = if n.dx.abs() < EPS && n.dy.abs() < EPS {
            0.
        } else {
            n.dx.atan2(n.dy).to_degrees().rem_euclid(360.)
        };
        let tilt = n.dz.clamp(-1., 1.).acos().to_degrees();

        // Horizontal glazing has no vertical to project, use north instead
        let up = Vector::up()
            .reject(n)
            .normalize()
            .or_else(|| Vector::new(0., 1., 0.).reject(n).normalize())
            .ok_or_else(|| anyhow!("Window {name} has no in-plane up direction"))?;
        let right = up.cross(n);

        let centroid = glazing.centroid();
        let along = |p: Point, dir: Vector| (p - centroid).dot(dir);

        let (mut u_min, mut u_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in glazing.vertices() {
            u_min = u_min.min(along(*p, right));
            u_max = u_max.max(along(*p, right));
            v_min = v_min.min(along(*p, up));
            v_max = v_max.max(along(*p, up));
        }
        let width = u_max - u_min;
        let height = v_max - v_min;
        if width < EPS || height < EPS {
            bail!("Window {name} has zero width or height");
        }

        // Edges running mostly sideways are bottom/top candidates, the rest are sides
        let mut horizontal: Vec<(Point, Point)> = Vec::new();
        let mut vertical: Vec<(Point, Point)> = Vec::new();
        for (a, b) in glazing.edges() {
            let d = b - a;
            if d.dot(right).abs() >= d.dot(up).abs() {
                horizontal.push((a, b));
            } else {
                vertical.push((a, b));
            }
        }
        if horizontal.len() < 2 || vertical.len() < 2 {
            bail!(
                "Window {name} needs two horizontal and two vertical glazing edges, found {} and {}",
                horizontal.len(),
                vertical.len()
            );
        }

        let midpoint = |e: &(Point, Point)| Point::new_between_2_points(e.0, e.1, 0.5);
        let by_position = |edges: &[(Point, Point)], dir: Vector| {
            let mut sorted = edges.to_vec();
            sorted.sort_by(|a, b| along(midpoint(a), dir).total_cmp(&along(midpoint(b), dir)));
            sorted
        };

        let horizontal = by_position(&horizontal, up);
        let vertical = by_position(&vertical, right);
        let bottom = *horizontal
            .first()
            .ok_or_else(|| anyhow!("Window {name} has no bottom edge"))?;
        let top = *horizontal
            .last()
            .ok_or_else(|| anyhow!("Window {name} has no top edge"))?;
        let left = *vertical
            .first()
            .ok_or_else(|| anyhow!("Window {name} has no left edge"))?;
        let right_edge = *vertical
            .last()
            .ok_or_else(|| anyhow!("Window {name} has no right edge"))?;

        Ok(Self {
            name,
            glazing,
            azimuth,
            tilt,
            width,
            height,
            up,
            right,
            bottom,
            top,
            sides: [left, right_edge],
        })
    }

    /// Creates a window from the outer opening by removing a frame of constant width.
    ///
    /// Fails if the frame is too wide for the opening.
    pub fn from_frame(outer: &Polygon, frame_width: f64) -> Result<Self> {
        let glazing = outer
            .offset(frame_width)
            .map_err(|e| anyhow!("Cannot inset window {} by frame: {e}", outer.name))?;
        Self::new(glazing)
    }

    pub fn glazing(&self) -> &Polygon {
        &self.glazing
    }

    /// Outward unit normal.
    pub fn normal(&self) -> Vector {
        self.glazing.vn
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Glazing extent along the in-plane right direction.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Glazing extent along the in-plane up direction.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn up(&self) -> Vector {
        self.up
    }

    pub fn right(&self) -> Vector {
        self.right
    }

    pub fn centroid(&self) -> Point {
        self.glazing.centroid()
    }

    pub fn bottom_edge(&self) -> (Point, Point) {
        self.bottom
    }

    pub fn top_edge(&self) -> (Point, Point) {
        self.top
    }

    /// Left and right side edges, seen from outside.
    pub fn side_edges(&self) -> [(Point, Point); 2] {
        self.sides
    }

    pub fn bottom_midpoint(&self) -> Point {
        let (a, b) = self.bottom_edge();
        Point::new_between_2_points(a, b, 0.5)
    }

    pub fn top_midpoint(&self) -> Point {
        let (a, b) = self.top_edge();
        Point::new_between_2_points(a, b, 0.5)
    }

    pub fn side_midpoints(&self) -> [Point; 2] {
        self.side_edges()
            .map(|(a, b)| Point::new_between_2_points(a, b, 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// South-facing (normal -y) glazing in the plane y = 0.
    fn south_glazing(width: f64, height: f64, sill: f64) -> Result<Polygon> {
        Polygon::new(
            "south",
            vec![
                Point::new(0., 0., sill),
                Point::new(width, 0., sill),
                Point::new(width, 0., sill + height),
                Point::new(0., 0., sill + height),
            ],
            None,
        )
    }

    #[test]
    fn test_south_window() -> Result<()> {
        let w = Window::new(south_glazing(1.5, 1.2, 1.0)?)?;
        assert!(w.normal().is_close(&Vector::new(0., -1., 0.)));
        assert!((w.azimuth() - 180.).abs() < 1e-9);
        assert!((w.tilt() - 90.).abs() < 1e-9);
        assert!((w.width() - 1.5).abs() < 1e-12);
        assert!((w.height() - 1.2).abs() < 1e-12);
        assert!(w.bottom_midpoint().is_close(&Point::new(0.75, 0., 1.0)));
        assert!(w.top_midpoint().is_close(&Point::new(0.75, 0., 2.2)));
        assert!(w.right().is_close(&Vector::new(1., 0., 0.)));
        assert!(w.up().is_close(&Vector::up()));

        let (a, b) = w.bottom_edge();
        assert!(a.z == 1. && b.z == 1.);
        let (a, b) = w.top_edge();
        assert!(a.z == 2.2 && b.z == 2.2);
        let [(l0, l1), (r0, r1)] = w.side_edges();
        assert!(l0.x == 0. && l1.x == 0.);
        assert!(r0.x == 1.5 && r1.x == 1.5);
        let [left, right] = w.side_midpoints();
        // Seen from the south, east (+x) is on the right
        assert!(left.is_close(&Point::new(0., 0., 1.6)));
        assert!(right.is_close(&Point::new(1.5, 0., 1.6)));
        Ok(())
    }

    #[test]
    fn test_azimuths() -> Result<()> {
        // East-facing glazing in the plane x = 0
        let east = Polygon::new(
            "east",
            vec![
                Point::new(0., 0., 0.),
                Point::new(0., 1., 0.),
                Point::new(0., 1., 1.),
                Point::new(0., 0., 1.),
            ],
            None,
        )?;
        let w = Window::new(east)?;
        assert!((w.azimuth() - 90.).abs() < 1e-9);

        let west = Polygon::new("west", w.glazing().vertices().to_vec(), Some(Vector::new(-1., 0., 0.)))?;
        let w = Window::new(west)?;
        assert!((w.azimuth() - 270.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_skylight() -> Result<()> {
        let sky = Polygon::new(
            "sky",
            vec![
                Point::new(0., 0., 3.),
                Point::new(1., 0., 3.),
                Point::new(1., 2., 3.),
                Point::new(0., 2., 3.),
            ],
            None,
        )?;
        let w = Window::new(sky)?;
        assert!(w.tilt().abs() < 1e-9);
        assert_eq!(w.azimuth(), 0.);
        // Up falls back to north
        assert!(w.up().is_close(&Vector::new(0., 1., 0.)));
        assert!((w.height() - 2.).abs() < 1e-12);
        assert!((w.width() - 1.).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_triangle_is_malformed() -> Result<()> {
        let tri = Polygon::new(
            "tri",
            vec![
                Point::new(0., 0., 0.),
                Point::new(1., 0., 0.),
                Point::new(0.5, 0., 1.),
            ],
            None,
        )?;
        assert!(Window::new(tri).is_err());
        Ok(())
    }

    #[test]
    fn test_from_frame() -> Result<()> {
        let outer = south_glazing(1.7, 1.4, 0.9)?;
        let w = Window::from_frame(&outer, 0.1)?;
        assert!((w.width() - 1.5).abs() < 1e-9);
        assert!((w.height() - 1.2).abs() < 1e-9);
        assert!(w.bottom_midpoint().is_close(&Point::new(0.85, 0., 1.0)));
        Ok(())
    }

    #[test]
    fn test_frame_too_wide() -> Result<()> {
        let outer = south_glazing(1.0, 1.0, 0.0)?;
        assert!(Window::from_frame(&outer, 0.6).is_err());
        Ok(())
    }
}
