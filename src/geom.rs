pub mod plane;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod query;
pub mod ray;
pub mod segment;
pub mod solid;
pub mod vector;

/// Geometric precision
pub const EPS: f64 = 1e-10;
