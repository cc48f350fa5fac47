//! Globe geometry: projection of geographic positions and flight arcs.

pub mod arc;
mod builder;
mod projection;

pub use arc::{
    build_arc, ArcPath, ArcSegment, ANTIPODAL_SCALE, DEFAULT_ARC_SEGMENTS, LIFTOFF_TRIM_ANGLE,
};
pub use builder::FlightArcBuilder;
pub use projection::{GlobeProjection, Point3, SphericalProjection, GLOBE_RADIUS};
