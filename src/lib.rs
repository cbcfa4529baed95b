pub mod geom;
pub mod shading;

// Prelude
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::solid::Solid;
pub use geom::vector::Vector;
pub use shading::{GeometryProbe, ShadingConfig, ShadingCorrelation, ShadingFactors, Window, WindowShading};
