//! Latitude-banded correlation coefficients.
//!
//! Every mechanism and season has one table. A table declares the correlation
//! form and, per orientation and regime, a list of latitude bands. A band
//! applies to latitudes up to and including `upto`; the last band covers every
//! larger latitude. Within a band `r` and `a` are polynomials in latitude,
//! coefficients in ascending order of power.
//!
//! The coefficients are this crate's own calibration, not the published
//! correlation tables of any standard. They are fitted to keep every curve
//! within [0, 1] and non-increasing in the ratio, and are pinned by tests.

use crate::shading::correlation::{Mechanism, Orientation, Regime, Season};

/// Shape of a correlation curve in the obstruction ratio `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationForm {
    /// `r * exp(a * x) + (1 - r)`, with `a <= 0`.
    Exponential,
    /// `r + (1 - r) / (1 + x^2)^a`, with `a >= 0`.
    Power,
}

impl CorrelationForm {
    pub fn eval(self, r: f64, a: f64, x: f64) -> f64 {
        match self {
            CorrelationForm::Exponential => r * (a * x).exp() + (1. - r),
            CorrelationForm::Power => r + (1. - r) / (1. + x * x).powf(a),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Band {
    /// Highest latitude (inclusive) the band applies to.
    pub upto: f64,
    pub r: &'static [f64],
    pub a: &'static [f64],
}

impl Band {
    pub fn coefficients(&self, latitude: f64) -> (f64, f64) {
        (polyval(self.r, latitude), polyval(self.a, latitude))
    }
}

/// Bands of one orientation, for windows parallel (vertical) and perpendicular (horizontal) to the ground.
#[derive(Debug, Clone, Copy)]
pub struct RegimeBands {
    pub parallel: &'static [Band],
    pub perpendicular: &'static [Band],
}

#[derive(Debug, Clone, Copy)]
pub struct CoefficientTable {
    pub form: CorrelationForm,
    pub south: RegimeBands,
    pub east_west: RegimeBands,
    pub north: RegimeBands,
}

impl CoefficientTable {
    pub fn bands(&self, orientation: Orientation, regime: Regime) -> &'static [Band] {
        let by_regime = match orientation {
            Orientation::South => self.south,
            Orientation::EastWest => self.east_west,
            Orientation::North => self.north,
        };
        match regime {
            Regime::Parallel => by_regime.parallel,
            Regime::Perpendicular => by_regime.perpendicular,
        }
    }

    /// Returns `(r, a)` for the given latitude.
    ///
    /// The first band whose `upto` is not below the latitude is used, the last
    /// band otherwise. An empty band list yields `(0, 0)`, i.e. no reduction.
    pub fn coefficients(&self, orientation: Orientation, regime: Regime, latitude: f64) -> (f64, f64) {
        let bands = self.bands(orientation, regime);
        match bands.iter().find(|b| latitude <= b.upto).or(bands.last()) {
            Some(band) => band.coefficients(latitude),
            None => (0., 0.),
        }
    }

    /// Evaluates the correlation for the obstruction ratio `x`.
    pub fn evaluate(&self, orientation: Orientation, regime: Regime, latitude: f64, x: f64) -> f64 {
        let (r, a) = self.coefficients(orientation, regime, latitude);
        self.form.eval(r, a, x)
    }
}

/// Evaluates a polynomial with coefficients in ascending order of power.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0., |acc, c| acc * x + c)
}

pub fn table(mechanism: Mechanism, season: Season) -> &'static CoefficientTable {
    match (mechanism, season) {
        (Mechanism::Horizon, Season::Winter) => &WINTER_HORIZON,
        (Mechanism::Horizon, Season::Summer) => &SUMMER_HORIZON,
        (Mechanism::Reveal, Season::Winter) => &WINTER_REVEAL,
        (Mechanism::Reveal, Season::Summer) => &SUMMER_REVEAL,
        (Mechanism::Overhang, Season::Winter) => &WINTER_OVERHANG,
        (Mechanism::Overhang, Season::Summer) => &SUMMER_OVERHANG,
    }
}

pub(crate) static WINTER_HORIZON: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Power,
    south: RegimeBands {
        parallel: &[
            Band { upto: 15.0, r: &[0.34], a: &[1.6, 0.04] },
            Band { upto: 30.0, r: &[0.4, -0.004], a: &[0.7, 0.1] },
            Band {
                upto: f64::INFINITY,
                r: &[0.52, -0.01, 0.00005],
                a: &[2.15, 0.032, 0.00061, -0.0000042, 0.0000000385],
            },
        ],
        perpendicular: &[
            Band { upto: 15.0, r: &[0.55], a: &[0.9] },
            Band { upto: 30.0, r: &[0.61, -0.004], a: &[0.6, 0.02] },
            Band { upto: f64::INFINITY, r: &[0.64, -0.005], a: &[0.3, 0.03] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.42, -0.002], a: &[1.4, 0.03] },
            Band { upto: f64::INFINITY, r: &[0.45, -0.003], a: &[0.8, 0.05] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.6, -0.0035], a: &[0.5, 0.015] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: f64::INFINITY, r: &[0.82, -0.002], a: &[0.45, 0.004] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.78, -0.0025], a: &[0.35, 0.006] },
        ],
    },
};

pub(crate) static SUMMER_HORIZON: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Power,
    south: RegimeBands {
        parallel: &[
            Band { upto: 15.0, r: &[0.62], a: &[0.7] },
            Band { upto: 30.0, r: &[0.68, -0.004], a: &[0.4, 0.02] },
            Band { upto: f64::INFINITY, r: &[0.65, -0.003], a: &[0.1, 0.03] },
        ],
        perpendicular: &[
            Band { upto: 30.0, r: &[0.7, -0.003], a: &[0.4, 0.01] },
            Band { upto: f64::INFINITY, r: &[0.72, -0.0037], a: &[0.25, 0.015] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 15.0, r: &[0.46], a: &[1.5] },
            Band { upto: 30.0, r: &[0.49, -0.002], a: &[1.2, 0.02] },
            Band { upto: f64::INFINITY, r: &[0.52, -0.003], a: &[0.9, 0.03] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.62, -0.002], a: &[0.55, 0.01] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.58, 0.001], a: &[1.1, -0.01] },
            Band { upto: f64::INFINITY, r: &[0.55, 0.003], a: &[1.0, -0.0067] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.7], a: &[0.6, -0.002] },
        ],
    },
};

pub(crate) static WINTER_REVEAL: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Exponential,
    south: RegimeBands {
        parallel: &[
            Band { upto: 40.0, r: &[0.22, 0.002], a: &[-2.4, -0.01] },
            Band { upto: f64::INFINITY, r: &[0.26, 0.003], a: &[-2.0, -0.02] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.12, 0.0015], a: &[-1.6, -0.008] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 40.0, r: &[0.38, 0.0015], a: &[-3.1, -0.012] },
            Band { upto: f64::INFINITY, r: &[0.4, 0.001], a: &[-3.3, -0.008] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.18, 0.001], a: &[-1.9, -0.01] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: f64::INFINITY, r: &[0.1, 0.0005], a: &[-1.2, -0.004] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.08, 0.0004], a: &[-1.0, -0.003] },
        ],
    },
};

pub(crate) static SUMMER_REVEAL: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Exponential,
    south: RegimeBands {
        parallel: &[
            Band { upto: 40.0, r: &[0.3, -0.001], a: &[-2.6, 0.005] },
            Band { upto: f64::INFINITY, r: &[0.28, -0.0005], a: &[-2.5, 0.004] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.15], a: &[-1.8] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 40.0, r: &[0.45, 0.001], a: &[-3.4, -0.005] },
            Band { upto: f64::INFINITY, r: &[0.47, 0.0005], a: &[-3.5, -0.003] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.2, 0.0008], a: &[-2.0, -0.006] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: 40.0, r: &[0.22, -0.002], a: &[-2.2, 0.01] },
            Band { upto: f64::INFINITY, r: &[0.16, -0.0005], a: &[-1.9, 0.003] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.1], a: &[-1.3] },
        ],
    },
};

pub(crate) static WINTER_OVERHANG: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Exponential,
    south: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.18, 0.003], a: &[-1.5, -0.01] },
            Band { upto: f64::INFINITY, r: &[0.21, 0.002], a: &[-1.6, -0.008] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.35, 0.002], a: &[-2.2, -0.01] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.28, 0.001], a: &[-2.0, -0.005] },
            Band { upto: f64::INFINITY, r: &[0.3, 0.0005], a: &[-2.1, -0.002] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.32, 0.001], a: &[-2.3, -0.006] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: f64::INFINITY, r: &[0.12, 0.001], a: &[-1.2, -0.004] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.2, 0.0015], a: &[-1.6, -0.006] },
        ],
    },
};

pub(crate) static SUMMER_OVERHANG: CoefficientTable = CoefficientTable {
    form: CorrelationForm::Power,
    south: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.35, 0.002], a: &[0.9, 0.02] },
            Band { upto: f64::INFINITY, r: &[0.44, 0.001], a: &[1.1, 0.012] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.3, 0.004, -0.00002], a: &[1.4, 0.01] },
        ],
    },
    east_west: RegimeBands {
        parallel: &[
            Band { upto: 30.0, r: &[0.48], a: &[0.8, 0.01] },
            Band { upto: f64::INFINITY, r: &[0.5, 0.0005], a: &[0.85, 0.008] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.4, 0.002], a: &[1.1, 0.008] },
        ],
    },
    north: RegimeBands {
        parallel: &[
            Band { upto: f64::INFINITY, r: &[0.7, 0.001], a: &[0.5, 0.004] },
        ],
        perpendicular: &[
            Band { upto: f64::INFINITY, r: &[0.55, 0.002], a: &[0.8, 0.005] },
        ],
    },
};
