//! Empirical correlations from obstruction geometry to seasonal shading factors.
//!
//! Every evaluation follows the same steps:
//! 1. reduce the two measured lengths to one dimensionless ratio,
//! 2. look up `(r, a)` for the window orientation and the one 90 degrees
//!    further round, in the parallel and the perpendicular regime,
//! 3. evaluate the correlation form of the active table,
//! 4. blend the two orientations by azimuth and the two regimes by tilt.
//!
//! The horizon mechanism is additionally floored by straight-line geometry.

use crate::shading::tables::table;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Summer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    Horizon,
    Reveal,
    Overhang,
}

/// Compass sector a coefficient set was fitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    South,
    EastWest,
    North,
}

impl Orientation {
    /// Maps an azimuth already floored to a multiple of 90 degrees.
    pub fn from_quantized_azimuth(azimuth_down: f64) -> Self {
        match azimuth_down.rem_euclid(360.) as u32 {
            180 => Orientation::South,
            0 => Orientation::North,
            _ => Orientation::EastWest,
        }
    }
}

/// Glazing orientation relative to the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Vertical glazing (tilt 90).
    Parallel,
    /// Horizontal glazing (tilt 0).
    Perpendicular,
}

/// Azimuth normalised to `[0, 360)` and floored to a multiple of 90 degrees.
pub fn azimuth_down(azimuth: f64) -> f64 {
    (azimuth.rem_euclid(360.) / 90.).floor() * 90.
}

/// Cosine interpolation between `y1` (at `mu = 0`) and `y2` (at `mu = 1`).
pub fn cosine_interpolate(y1: f64, y2: f64, mu: f64) -> f64 {
    let mu2 = (1. - (mu * PI).cos()) / 2.;
    y1 * (1. - mu2) + y2 * mu2
}

/// Shading correlations for one site latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingCorrelation {
    latitude: f64,
}

impl ShadingCorrelation {
    pub fn new(latitude: f64) -> Self {
        Self { latitude }
    }

    /// Horizon factor from the rise `h` and run `d` of the obstruction.
    pub fn winter_horizon(&self, h: f64, d: f64, tilt: f64, azimuth: f64, glazing_height: f64) -> f64 {
        self.horizon(Season::Winter, h, d, tilt, azimuth, glazing_height)
    }

    pub fn summer_horizon(&self, h: f64, d: f64, tilt: f64, azimuth: f64, glazing_height: f64) -> f64 {
        self.horizon(Season::Summer, h, d, tilt, azimuth, glazing_height)
    }

    /// Reveal factor from the averaged reveal offset `o` and depth `d`.
    pub fn winter_reveal(&self, o: f64, d: f64, tilt: f64, azimuth: f64, glazing_width: f64) -> f64 {
        let x = obstruction_ratio(o, d, glazing_width);
        self.factor(Mechanism::Reveal, Season::Winter, x, tilt, azimuth)
    }

    pub fn summer_reveal(&self, o: f64, d: f64, tilt: f64, azimuth: f64, glazing_width: f64) -> f64 {
        let x = obstruction_ratio(o, d, glazing_width);
        self.factor(Mechanism::Reveal, Season::Summer, x, tilt, azimuth)
    }

    /// Overhang factor from the drop `d_over` above the glazing head and the projection `o_over`.
    pub fn winter_overhang(&self, d_over: f64, o_over: f64, tilt: f64, azimuth: f64, glazing_height: f64) -> f64 {
        let x = obstruction_ratio(o_over, d_over, glazing_height);
        self.factor(Mechanism::Overhang, Season::Winter, x, tilt, azimuth)
    }

    pub fn summer_overhang(&self, d_over: f64, o_over: f64, tilt: f64, azimuth: f64, glazing_height: f64) -> f64 {
        let x = obstruction_ratio(o_over, d_over, glazing_height);
        self.factor(Mechanism::Overhang, Season::Summer, x, tilt, azimuth)
    }

    /// Evaluates the blended correlation for a ratio `x` that is already computed.
    ///
    /// No horizon floor is applied here.
    pub fn factor(&self, mechanism: Mechanism, season: Season, x: f64, tilt: f64, azimuth: f64) -> f64 {
        let t = table(mechanism, season);
        let azimuth = azimuth.rem_euclid(360.);
        let az_down = azimuth_down(azimuth);
        let this_side = Orientation::from_quantized_azimuth(az_down);
        let other_side = Orientation::from_quantized_azimuth(az_down + 270.);
        let mu_az = (azimuth - az_down) / 90.;

        let blend = |regime: Regime| {
            let y1 = t.evaluate(this_side, regime, self.latitude, x);
            let y2 = t.evaluate(other_side, regime, self.latitude, x);
            cosine_interpolate(y1, y2, mu_az)
        };
        let parallel = blend(Regime::Parallel);
        let perpendicular = blend(Regime::Perpendicular);

        cosine_interpolate(perpendicular, parallel, tilt / 90.)
    }

    fn horizon(&self, season: Season, h: f64, d: f64, tilt: f64, azimuth: f64, glazing_height: f64) -> f64 {
        let x = if d == 0. { 1. } else { h / d };
        let value = self.factor(Mechanism::Horizon, season, x, tilt, azimuth);

        let s = tilt.to_radians().sin().abs();
        let floor = if s == 0. { 0. } else { 1. - h / (glazing_height * s) };
        value.max(floor)
    }
}

/// `offset / (0.5 * dimension + depth)`.
fn obstruction_ratio(offset: f64, depth: f64, dimension: f64) -> f64 {
    offset / (0.5 * dimension + depth)
}
