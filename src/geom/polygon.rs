//! Planar polygons.

use crate::geom::EPS;
use crate::geom::projection::PlaneBasis;
use crate::{Point, Vector};
use anyhow::{Result, anyhow, bail};

/// Maximum distance of a vertex from the polygon plane.
const PLANARITY_TOL: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub name: String,
    pts: Vec<Point>,
    /// Unit normal (right-hand rule over the vertex order).
    pub vn: Vector,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    ///
    /// Consecutive duplicate vertices are dropped. If `normal` is given and points
    /// against the vertex winding, the vertex order is reversed so that the
    /// right-hand rule always matches `vn`.
    ///
    /// Fails if fewer than 3 distinct vertices remain, if the vertices are
    /// collinear or if they do not lie in one plane.
    pub fn new(name: &str, pts: Vec<Point>, normal: Option<Vector>) -> Result<Self> {
        let mut pts = remove_consecutive_duplicates(pts);
        if pts.len() < 3 {
            bail!("Polygon {name} needs at least 3 distinct vertices, got {}", pts.len());
        }

        let newell = newell_vector(&pts);
        let mut vn = newell
            .normalize()
            .ok_or_else(|| anyhow!("Polygon {name} is degenerate (collinear vertices)"))?;

        if let Some(n) = normal {
            let n = n
                .normalize()
                .ok_or_else(|| anyhow!("Normal of polygon {name} has zero length"))?;
            let cos = n.dot(vn);
            if cos.abs() < 1.0 - 1e-6 {
                bail!("Normal {n} is not perpendicular to polygon {name}");
            }
            if cos < 0.0 {
                pts.reverse();
            }
            vn = n;
        }

        let p0 = pts[0];
        for p in pts.iter() {
            let dist = (*p - p0).dot(vn);
            if dist.abs() > PLANARITY_TOL {
                bail!("Polygon {name} is not planar (vertex {p} is {dist:.2e} off its plane)");
            }
        }

        Ok(Self {
            name: name.to_string(),
            pts,
            vn,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    /// Iterates over the closed edge loop `(pts[i], pts[i + 1])`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| (self.pts[i], self.pts[(i + 1) % n]))
    }

    pub fn area(&self) -> f64 {
        newell_vector(&self.pts).length() / 2.
    }

    /// Area centroid.
    pub fn centroid(&self) -> Point {
        let p0 = self.pts[0];
        let mut total = 0.;
        let mut acc = Vector::new(0., 0., 0.);
        for i in 1..self.pts.len() - 1 {
            let p1 = self.pts[i];
            let p2 = self.pts[i + 1];
            let signed = (p1 - p0).cross(p2 - p0).dot(self.vn) / 2.;
            let tri_centroid = Vector::from_a_point(p0) + Vector::from_a_point(p1) + Vector::from_a_point(p2);
            acc = acc + tri_centroid * (signed / 3.);
            total += signed;
        }

        if total.abs() < EPS {
            let n = self.pts.len() as f64;
            let sum = self
                .pts
                .iter()
                .fold(Vector::new(0., 0., 0.), |s, p| s + Vector::from_a_point(*p));
            let avg = sum * (1. / n);
            return Point::new(avg.dx, avg.dy, avg.dz);
        }

        let c = acc * (1. / total);
        Point::new(c.dx, c.dy, c.dz)
    }

    /// Plane equation `a*x + b*y + c*z + d = 0`.
    pub fn plane_coefficients(&self) -> (f64, f64, f64, f64) {
        let p0 = self.pts[0];
        let d = -(self.vn.dx * p0.x + self.vn.dy * p0.y + self.vn.dz * p0.z);
        (self.vn.dx, self.vn.dy, self.vn.dz, d)
    }

    /// Signed distance of `pt` from the polygon plane (positive on the normal side).
    pub fn distance_to_plane(&self, pt: Point) -> f64 {
        (pt - self.pts[0]).dot(self.vn)
    }

    /// Checks if a point lies inside the polygon.
    ///
    /// If `boundary_in` is true, points on edges or vertices count as inside.
    pub fn is_point_inside(&self, ptest: Point, boundary_in: bool) -> bool {
        if self.distance_to_plane(ptest).abs() > PLANARITY_TOL {
            return false;
        }

        if self.edges().any(|(a, b)| ptest.is_on_segment(a, b)) {
            return boundary_in;
        }

        let Some(basis) = PlaneBasis::from_normal(self.pts[0], self.vn) else {
            return false;
        };
        let (x, y) = basis.project(ptest);
        let poly2d: Vec<(f64, f64)> = self.pts.iter().map(|p| basis.project(*p)).collect();

        // Crossing number
        let n = poly2d.len();
        let mut inside = false;
        for i in 0..n {
            let (xi, yi) = poly2d[i];
            let (xj, yj) = poly2d[(i + n - 1) % n];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
        }
        inside
    }

    /// Returns a copy with every edge moved inwards by `distance`.
    ///
    /// Fails if the offset collapses or inverts the polygon, i.e. if `distance`
    /// is too large for this outline.
    pub fn offset(&self, distance: f64) -> Result<Polygon> {
        let basis = PlaneBasis::from_normal(self.pts[0], self.vn)
            .ok_or_else(|| anyhow!("Cannot build a plane basis for polygon {}", self.name))?;
        let pts2d: Vec<(f64, f64)> = self.pts.iter().map(|p| basis.project(*p)).collect();
        let n = pts2d.len();

        // Edge directions and their inward (left-hand) normals
        let mut dirs: Vec<(f64, f64)> = Vec::with_capacity(n);
        for i in 0..n {
            let (x0, y0) = pts2d[i];
            let (x1, y1) = pts2d[(i + 1) % n];
            let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            dirs.push(((x1 - x0) / len, (y1 - y0) / len));
        }

        let mut new_pts2d: Vec<(f64, f64)> = Vec::with_capacity(n);
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let (ex0, ey0) = dirs[prev];
            let (ex1, ey1) = dirs[i];
            let (px, py) = pts2d[i];
            // Points on the two offset lines meeting at vertex i
            let (ax, ay) = (px - ey0 * distance, py + ex0 * distance);
            let (bx, by) = (px - ey1 * distance, py + ex1 * distance);
            let denom = ex0 * ey1 - ey0 * ex1;
            if denom.abs() < EPS {
                new_pts2d.push((bx, by));
            } else {
                let t = ((bx - ax) * ey1 - (by - ay) * ex1) / denom;
                new_pts2d.push((ax + ex0 * t, ay + ey0 * t));
            }
        }

        // Every offset edge must keep its original direction
        for i in 0..n {
            let (x0, y0) = new_pts2d[i];
            let (x1, y1) = new_pts2d[(i + 1) % n];
            let (ex, ey) = dirs[i];
            if (x1 - x0) * ex + (y1 - y0) * ey <= EPS {
                bail!(
                    "Offset of {distance} collapses polygon {} (edge {i} inverted)",
                    self.name
                );
            }
        }

        let pts: Vec<Point> = new_pts2d
            .iter()
            .map(|(x, y)| basis.unproject(*x, *y))
            .collect();
        Polygon::new(&self.name, pts, Some(self.vn))
    }
}

/// Newell's method; the length of the result is twice the polygon area.
fn newell_vector(pts: &[Point]) -> Vector {
    let n = pts.len();
    let mut v = Vector::new(0., 0., 0.);
    for i in 0..n {
        let c = pts[i];
        let nx = pts[(i + 1) % n];
        v.dx += (c.y - nx.y) * (c.z + nx.z);
        v.dy += (c.z - nx.z) * (c.x + nx.x);
        v.dz += (c.x - nx.x) * (c.y + nx.y);
    }
    v
}

fn remove_consecutive_duplicates(pts: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts {
        if !out.last().is_some_and(|last| last.is_close(&p)) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].is_close(&out[out.len() - 1]) {
        out.pop();
    }
    out
}
