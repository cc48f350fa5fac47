//! Arc construction from airports and aircraft.

use super::arc::{build_arc, ArcPath, DEFAULT_ARC_SEGMENTS};
use super::projection::{GlobeProjection, SphericalProjection};
use crate::airport::{Airport, AirportIndex};
use crate::state::{DetailedStateVector, StateVector};

/// Builds departure-to-aircraft arcs on a projected globe.
#[derive(Debug, Clone)]
pub struct FlightArcBuilder<P: GlobeProjection = SphericalProjection> {
    projection: P,
    segments: usize,
}

impl Default for FlightArcBuilder {
    fn default() -> Self {
        Self::new(SphericalProjection::default(), DEFAULT_ARC_SEGMENTS)
    }
}

impl<P: GlobeProjection> FlightArcBuilder<P> {
    pub fn new(projection: P, segments: usize) -> Self {
        Self {
            projection,
            segments,
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Arc from a ground position to an airborne position.
    ///
    /// The source sits on the surface; `to_alt` is a fraction of the radius.
    pub fn between(&self, from: (f64, f64), to: (f64, f64, f64)) -> ArcPath {
        let source = self.projection.to_cartesian(from.0, from.1, 0.0);
        let target = self.projection.to_cartesian(to.0, to.1, to.2);
        build_arc(source, target, self.projection.center(), self.segments)
    }

    /// Arc from `airport` to the aircraft at its display altitude.
    ///
    /// `None` if the aircraft has no position.
    pub fn from_airport(&self, airport: &Airport, aircraft: &StateVector) -> Option<ArcPath> {
        let (lat, lon) = aircraft.position()?;
        Some(self.between(
            (airport.lat, airport.lon),
            (lat, lon, aircraft.display_altitude),
        ))
    }

    /// Arc for a selected aircraft, from its estimated departure airport.
    ///
    /// `None` while the departure is unknown or not in `airports`.
    pub fn for_selection(
        &self,
        detailed: &DetailedStateVector,
        airports: &AirportIndex,
    ) -> Option<ArcPath> {
        let code = detailed.departure_airport()?;
        let Some(airport) = airports.get(code) else {
            tracing::debug!(departure = code, "Departure airport not in dataset, no arc");
            return None;
        };
        self.from_airport(airport, &detailed.state)
    }
}
