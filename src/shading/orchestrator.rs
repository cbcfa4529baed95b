//! Per-window shading factors.

use crate::Solid;
use crate::geom::query::GeometryQuery;
use crate::shading::config::{DEFAULT_SHADING_FACTOR, ProbeConfig, ShadingConfig};
use crate::shading::correlation::ShadingCorrelation;
use crate::shading::probe::{GeometryProbe, Measurements};
use crate::shading::window::Window;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Winter and summer multipliers on the unobstructed solar gain (1 = unshaded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadingFactors {
    pub winter: f64,
    pub summer: f64,
}

impl ShadingFactors {
    pub fn new(winter: f64, summer: f64) -> Self {
        Self { winter, summer }
    }

    pub fn is_within_unit_range(&self) -> bool {
        (0. ..=1.).contains(&self.winter) && (0. ..=1.).contains(&self.summer)
    }
}

impl Default for ShadingFactors {
    fn default() -> Self {
        Self::new(DEFAULT_SHADING_FACTOR, DEFAULT_SHADING_FACTOR)
    }
}

/// Factors of the three mechanisms in one season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonBreakdown {
    pub horizon: f64,
    pub reveal: f64,
    pub overhang: f64,
}

impl SeasonBreakdown {
    pub fn product(&self) -> f64 {
        self.horizon * self.reveal * self.overhang
    }
}

/// Everything computed for one window: measurements, component factors and products.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingReport {
    pub measurements: Measurements,
    pub winter: SeasonBreakdown,
    pub summer: SeasonBreakdown,
}

impl ShadingReport {
    pub fn factors(&self) -> ShadingFactors {
        ShadingFactors::new(self.winter.product(), self.summer.product())
    }
}

/// A window together with its cached shading factors.
///
/// The factors start at the configured defaults and are replaced by
/// [`WindowShading::compute`] or [`WindowShading::set_factors`], whichever runs last.
#[derive(Debug, Clone)]
pub struct WindowShading {
    window: Window,
    factors: ShadingFactors,
    /// Probe settings used by [`WindowShading::compute`].
    probe_config: ProbeConfig,
}

impl WindowShading {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            factors: ShadingFactors::default(),
            probe_config: ProbeConfig::default(),
        }
    }

    /// Creates the window with the default factors and probe settings from `config`.
    pub fn with_config(window: Window, config: &ShadingConfig) -> Self {
        Self {
            window,
            factors: ShadingFactors::new(config.default_winter_factor, config.default_summer_factor),
            probe_config: config.probe,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn factors(&self) -> ShadingFactors {
        self.factors
    }

    pub fn winter(&self) -> f64 {
        self.factors.winter
    }

    pub fn summer(&self) -> f64 {
        self.factors.summer
    }

    /// Replaces the cached factors with manually entered values.
    pub fn set_factors(&mut self, winter: f64, summer: f64) {
        debug!(
            "Window {}: factors set manually to winter {winter}, summer {summer}",
            self.window.name
        );
        self.factors = ShadingFactors::new(winter, summer);
    }

    /// Measures the obstructions and evaluates all six correlations.
    ///
    /// The cached factors are left untouched.
    pub fn report<Q: GeometryQuery>(
        &self,
        probe: &GeometryProbe<Q>,
        obstructions: &[Solid],
        latitude: f64,
    ) -> ShadingReport {
        let w = &self.window;
        let m = probe.measure(w, obstructions);
        let model = ShadingCorrelation::new(latitude);
        let (tilt, azimuth) = (w.tilt(), w.azimuth());
        let (h, d) = (m.horizon.height, m.horizon.distance);
        let (o_rev, d_rev) = (m.reveal.offset, m.reveal.depth);
        let (d_over, o_over) = (m.overhang.drop, m.overhang.offset);

        let winter = SeasonBreakdown {
            horizon: model.winter_horizon(h, d, tilt, azimuth, w.height()),
            reveal: model.winter_reveal(o_rev, d_rev, tilt, azimuth, w.width()),
            overhang: model.winter_overhang(d_over, o_over, tilt, azimuth, w.height()),
        };
        let summer = SeasonBreakdown {
            horizon: model.summer_horizon(h, d, tilt, azimuth, w.height()),
            reveal: model.summer_reveal(o_rev, d_rev, tilt, azimuth, w.width()),
            overhang: model.summer_overhang(d_over, o_over, tilt, azimuth, w.height()),
        };

        ShadingReport {
            measurements: m,
            winter,
            summer,
        }
    }

    /// Computes and caches the factors with the planar probe and this window's probe settings.
    pub fn compute(&mut self, obstructions: &[Solid], latitude: f64) -> ShadingFactors {
        self.compute_with(&GeometryProbe::new(self.probe_config), obstructions, latitude)
    }

    /// Computes and caches the factors using the given probe.
    pub fn compute_with<Q: GeometryQuery>(
        &mut self,
        probe: &GeometryProbe<Q>,
        obstructions: &[Solid],
        latitude: f64,
    ) -> ShadingFactors {
        let report = self.report(probe, obstructions, latitude);
        let factors = report.factors();
        if !factors.is_within_unit_range() {
            warn!(
                "Window {}: shading factors outside [0, 1] (winter {}, summer {}), check the obstruction geometry",
                self.window.name, factors.winter, factors.summer
            );
        }
        debug!(
            "Window {}: winter {:.4} ({:?}), summer {:.4} ({:?})",
            self.window.name, factors.winter, report.winter, factors.summer, report.summer
        );
        self.factors = factors;
        factors
    }
}

/// Computes the factors of many windows in parallel.
///
/// Every window is computed independently against the same obstructions.
pub fn compute_all<Q: GeometryQuery + Sync>(
    windows: &mut [WindowShading],
    probe: &GeometryProbe<Q>,
    obstructions: &[Solid],
    latitude: f64,
) -> Vec<ShadingFactors> {
    windows
        .par_iter_mut()
        .map(|w| w.compute_with(probe, obstructions, latitude))
        .collect()
}
