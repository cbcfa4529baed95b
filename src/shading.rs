pub mod config;
pub mod correlation;
pub mod orchestrator;
pub mod probe;
pub mod tables;
pub mod window;

pub use config::{ProbeConfig, ShadingConfig};
pub use correlation::{Mechanism, Orientation, Regime, Season, ShadingCorrelation};
pub use orchestrator::{SeasonBreakdown, ShadingFactors, ShadingReport, WindowShading, compute_all};
pub use probe::{GeometryProbe, HorizonMeasurement, Measurements, OverhangMeasurement, RevealMeasurement};
pub use window::Window;
