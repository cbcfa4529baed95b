//! Geometric probing of the obstructions around a window.
//!
//! Each mechanism casts bounded sightlines from a reference point on the
//! glazing, keeps the obstructions those sightlines hit, slices the survivors
//! with a bounded plane and reduces the resulting points to one pair of
//! lengths (offset and depth) that the correlation model consumes.

use crate::geom::EPS;
use crate::geom::plane::BoundedPlane;
use crate::geom::query::{GeometryQuery, PlanarQuery};
use crate::geom::ray::Ray;
use crate::shading::config::ProbeConfig;
use crate::shading::window::Window;
use crate::{Point, Solid, Vector};
use tracing::{debug, trace};

/// Rise and run from the glazing bottom edge to the horizon obstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizonMeasurement {
    /// Vertical rise `h_hori`.
    pub height: f64,
    /// Horizontal run `d_hori`.
    pub distance: f64,
}

/// Drop and offset from the glazing top edge to the overhang.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverhangMeasurement {
    /// Vertical drop `d_over`.
    pub drop: f64,
    /// Horizontal offset `o_over`.
    pub offset: f64,
}

/// Offset and depth of the reveals, averaged over the sides that found one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevealMeasurement {
    pub offset: f64,
    pub depth: f64,
}

/// All three measurements of one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub horizon: HorizonMeasurement,
    pub overhang: OverhangMeasurement,
    pub reveal: RevealMeasurement,
}

/// Measures obstruction offsets and depths relative to a window.
#[derive(Debug, Clone)]
pub struct GeometryProbe<Q: GeometryQuery = PlanarQuery> {
    query: Q,
    config: ProbeConfig,
}

impl GeometryProbe<PlanarQuery> {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            query: PlanarQuery,
            config,
        }
    }
}

impl Default for GeometryProbe<PlanarQuery> {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

impl<Q: GeometryQuery> GeometryProbe<Q> {
    /// Creates a probe backed by a custom geometry implementation.
    pub fn with_query(query: Q, config: ProbeConfig) -> Self {
        Self { query, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs all three probes.
    pub fn measure(&self, window: &Window, obstructions: &[Solid]) -> Measurements {
        Measurements {
            horizon: self.find_horizon_shading(window, obstructions),
            overhang: self.find_overhang_shading(window, obstructions),
            reveal: self.find_reveal_shading(window, obstructions),
        }
    }

    /// Finds the most obstructing point in front of the glazing bottom edge.
    ///
    /// The sightline plane is spanned by the outward normal and the global up
    /// direction. The point with the largest angle above the normal wins.
    pub fn find_horizon_shading(&self, window: &Window, obstructions: &[Solid]) -> HorizonMeasurement {
        let radius = self.config.search_radius;
        let origin = window.bottom_midpoint();
        let normal = self.query.polygon_normal(window.glazing());

        let (Some(ray_out), Some(ray_up)) = (
            self.query.cast_ray(origin, normal, radius),
            self.query.cast_ray(origin, Vector::up(), radius),
        ) else {
            debug!("Window {}: cannot cast horizon sightlines", window.name);
            return HorizonMeasurement::default();
        };

        let candidates = self.hit_by(&ray_out, obstructions);
        if candidates.is_empty() {
            trace!("Window {}: no horizon obstruction", window.name);
            return HorizonMeasurement::default();
        }

        let Some(plane) = BoundedPlane::from_rays(&ray_out, &ray_up) else {
            debug!(
                "Window {}: horizon plane is degenerate (normal {normal} is vertical)",
                window.name
            );
            return HorizonMeasurement::default();
        };

        let mut best: Option<(f64, f64)> = None;
        for solid in candidates {
            let pts = self.query.intersect_plane(&plane, solid);
            let Some((angle, hyp)) = extreme_angle(origin, normal, &pts, |a, b| a > b) else {
                continue;
            };
            trace!(
                "Window {}: horizon candidate {} at {angle:.3} deg",
                window.name, solid.name
            );
            if best.is_none_or(|(best_angle, _)| angle > best_angle) {
                best = Some((angle, hyp));
            }
        }

        let Some((angle, hyp)) = best else {
            return HorizonMeasurement::default();
        };
        let (height, distance) = decompose(hyp, angle);
        let m = HorizonMeasurement { height, distance };
        debug!("Window {}: horizon {m:?}", window.name);
        m
    }

    /// Finds the overhang point closest to the outward normal above the glazing top edge.
    pub fn find_overhang_shading(&self, window: &Window, obstructions: &[Solid]) -> OverhangMeasurement {
        let radius = self.config.search_radius;
        let origin = window.top_midpoint();
        let centroid = self.query.polygon_centroid(window.glazing());
        let normal = self.query.polygon_normal(window.glazing());
        let Some(up) = (origin - centroid).normalize() else {
            debug!("Window {}: top edge midpoint coincides with centroid", window.name);
            return OverhangMeasurement::default();
        };

        let Some(test_plane) = BoundedPlane::new(origin, normal, self.config.overhang_test_depth, up, radius)
        else {
            debug!("Window {}: overhang test plane is degenerate", window.name);
            return OverhangMeasurement::default();
        };
        let candidates: Vec<&Solid> = obstructions
            .iter()
            .filter(|s| !self.query.intersect_plane(&test_plane, s).is_empty())
            .collect();
        if candidates.is_empty() {
            trace!("Window {}: no overhang", window.name);
            return OverhangMeasurement::default();
        }

        let Some(plane) = BoundedPlane::new(origin, normal, radius, up, radius) else {
            return OverhangMeasurement::default();
        };
        let pts: Vec<Point> = candidates
            .iter()
            .flat_map(|s| self.query.intersect_plane(&plane, s))
            .collect();

        let Some((angle, hyp)) = extreme_angle(origin, normal, &pts, |a, b| a < b) else {
            return OverhangMeasurement::default();
        };
        let (drop, offset) = decompose(hyp, angle);
        let m = OverhangMeasurement { drop, offset };
        debug!("Window {}: overhang {m:?}", window.name);
        m
    }

    /// Finds the reveals (or fins) on both sides of the glazing and averages them.
    pub fn find_reveal_shading(&self, window: &Window, obstructions: &[Solid]) -> RevealMeasurement {
        let radius = self.config.search_radius;
        let centroid = self.query.polygon_centroid(window.glazing());
        let normal = self.query.polygon_normal(window.glazing());
        let test_origin = centroid + normal * self.config.reveal_test_offset;

        let mut sum_offset = 0.;
        let mut sum_depth = 0.;
        let mut count = 0_usize;

        for mid in window.side_midpoints() {
            let to_mid = mid - centroid;
            let Some(side_dir) = to_mid.normalize() else {
                continue;
            };

            let test_len = to_mid.length() + self.config.reveal_test_reach;
            let Some(test_ray) = self.query.cast_ray(test_origin, side_dir, test_len) else {
                continue;
            };
            let candidates = self.hit_by(&test_ray, obstructions);
            if candidates.is_empty() {
                continue;
            }

            let Some(plane) = BoundedPlane::new(mid, normal, radius, side_dir, radius) else {
                debug!("Window {}: reveal plane is degenerate", window.name);
                continue;
            };
            let pts: Vec<Point> = candidates
                .iter()
                .flat_map(|s| self.query.intersect_plane(&plane, s))
                .filter(|p| normal.angle_deg(*p - mid) <= self.config.reveal_max_angle_deg)
                .collect();

            let Some((_, hyp, pt)) = closest_to_axis(mid, normal, &pts) else {
                continue;
            };

            // The side angle is in degrees but goes into sin() as radians.
            // Existing results depend on this, keep it until they are recalibrated.
            let side_angle = side_dir.angle_deg(pt - mid);
            let offset = hyp * side_angle.sin();
            let depth = (hyp * hyp - offset * offset).max(0.).sqrt();
            trace!(
                "Window {}: reveal at {pt}, offset {offset:.4}, depth {depth:.4}",
                window.name
            );

            sum_offset += offset;
            sum_depth += depth;
            count += 1;
        }

        let n = count.max(1) as f64;
        let m = RevealMeasurement {
            offset: sum_offset / n,
            depth: sum_depth / n,
        };
        debug!("Window {}: reveal {m:?} from {count} side(s)", window.name);
        m
    }

    fn hit_by<'a>(&self, ray: &Ray, obstructions: &'a [Solid]) -> Vec<&'a Solid> {
        obstructions
            .iter()
            .filter(|s| !self.query.intersect_ray(ray, s).is_empty())
            .collect()
    }
}

/// Splits `hyp` at `angle_deg` from the axis into the components across and along it.
///
/// Components below `EPS` are returned as exactly 0, so a point straight
/// above the origin has zero run.
fn decompose(hyp: f64, angle_deg: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    let snap = |v: f64| if v.abs() < EPS { 0. } else { v };
    (snap(hyp * theta.sin()), snap(hyp * theta.cos()))
}

/// Picks the point whose angle from `axis` wins under `better`.
///
/// Returns `(angle_deg, hypotenuse)`. Points at the origin are skipped.
fn extreme_angle(
    origin: Point,
    axis: Vector,
    pts: &[Point],
    better: impl Fn(f64, f64) -> bool,
) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for p in pts {
        let v = *p - origin;
        let hyp = v.length();
        if hyp < EPS {
            continue;
        }
        let angle = axis.angle_deg(v);
        if best.is_none_or(|(b, _)| better(angle, b)) {
            best = Some((angle, hyp));
        }
    }
    best
}

/// Like `extreme_angle` with the smallest angle winning, also returning the point.
fn closest_to_axis(origin: Point, axis: Vector, pts: &[Point]) -> Option<(f64, f64, Point)> {
    let mut best: Option<(f64, f64, Point)> = None;
    for p in pts {
        let v = *p - origin;
        let hyp = v.length();
        if hyp < EPS {
            continue;
        }
        let angle = axis.angle_deg(v);
        if best.is_none_or(|(b, _, _)| angle < b) {
            best = Some((angle, hyp, *p));
        }
    }
    best
}
