//! Line segment operations.
//!
//! Crossing of a segment with a plane and clipping of a segment to a
//! rectangle in 2D parameter space.

use crate::geom::EPS;
use crate::{Point, Vector};

/// Point where the segment `p1`-`p2` crosses the plane through `plane_pt` with
/// normal `plane_n`.
///
/// Returns `None` if both endpoints lie strictly on the same side of the plane
/// or if the segment lies in the plane.
pub fn segment_plane_crossing(p1: Point, p2: Point, plane_pt: Point, plane_n: Vector) -> Option<Point> {
    let d1 = (p1 - plane_pt).dot(plane_n);
    let d2 = (p2 - plane_pt).dot(plane_n);

    if d1.abs() < EPS && d2.abs() < EPS {
        return None;
    }
    if d1.abs() < EPS {
        return Some(p1);
    }
    if d2.abs() < EPS {
        return Some(p2);
    }
    if (d1 < 0.) == (d2 < 0.) {
        return None;
    }

    Some(p1 + (p2 - p1) * (d1 / (d1 - d2)))
}

/// Clips the 2D segment `a`-`b` to the rectangle `[0, s_max] x [0, t_max]`
/// (Liang-Barsky).
///
/// A degenerate segment (`a == b`) is kept if the point lies in the rectangle.
/// Returns the clipped endpoints or `None` if nothing remains.
pub fn clip_segment_to_rect(
    a: (f64, f64),
    b: (f64, f64),
    s_max: f64,
    t_max: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (ds, dt) = (b.0 - a.0, b.1 - a.1);
    let checks = [
        (-ds, a.0 + EPS),
        (ds, s_max + EPS - a.0),
        (-dt, a.1 + EPS),
        (dt, t_max + EPS - a.1),
    ];

    let mut u0: f64 = 0.;
    let mut u1: f64 = 1.;
    for (p, q) in checks {
        if p.abs() < EPS * EPS {
            if q < 0. {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0. {
            u0 = u0.max(r);
        } else {
            u1 = u1.min(r);
        }
        if u0 > u1 {
            return None;
        }
    }

    // Endpoints within EPS of the boundary are snapped onto it
    let snap = |s: f64, t: f64| (s.clamp(0., s_max), t.clamp(0., t_max));
    Some((
        snap(a.0 + u0 * ds, a.1 + u0 * dt),
        snap(a.0 + u1 * ds, a.1 + u1 * dt),
    ))
}
