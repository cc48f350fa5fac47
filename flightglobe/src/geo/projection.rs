//! Geographic to globe-space conversion.

use nalgebra::Vector3;

/// A point or direction in globe space.
pub type Point3 = Vector3<f64>;

/// Radius of the rendered globe in scene units.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Converts geographic coordinates to 3D points on a rendered globe.
pub trait GlobeProjection {
    /// Project a position.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees
    /// * `lon` - Longitude in degrees
    /// * `alt` - Altitude as a fraction of the globe radius
    fn to_cartesian(&self, lat: f64, lon: f64, alt: f64) -> Point3;

    /// Center of the globe.
    fn center(&self) -> Point3 {
        Point3::zeros()
    }
}

/// Sphere centered at the origin, Y axis through the north pole.
///
/// Longitude 0 lies on +Z and longitude 90 on +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalProjection {
    pub radius: f64,
}

impl Default for SphericalProjection {
    fn default() -> Self {
        Self {
            radius: GLOBE_RADIUS,
        }
    }
}

impl GlobeProjection for SphericalProjection {
    #[inline]
    fn to_cartesian(&self, lat: f64, lon: f64, alt: f64) -> Point3 {
        let phi = (90.0 - lat).to_radians();
        let theta = (90.0 - lon).to_radians();
        let r = self.radius * (1.0 + alt);

        Point3::new(
            r * phi.sin() * theta.cos(),
            r * phi.cos(),
            r * phi.sin() * theta.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: Point3, b: Point3) {
        assert!((a - b).norm() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_axes() {
        let globe = SphericalProjection::default();
        assert_close(globe.to_cartesian(90.0, 0.0, 0.0), Point3::new(0.0, 100.0, 0.0));
        assert_close(globe.to_cartesian(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 100.0));
        assert_close(globe.to_cartesian(0.0, 90.0, 0.0), Point3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_altitude_scales_radius() {
        let globe = SphericalProjection::default();
        let p = globe.to_cartesian(48.0, 11.0, 0.1);
        assert!((p.norm() - 110.0).abs() < EPS);
    }
}
