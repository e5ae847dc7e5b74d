//! Geodetic conversions between Cartesian and Cartographic positions.

use crate::point::{Cartesian3, Cartographic3};
use serde::{Deserialize, Serialize};

/// Convergence threshold for the latitude iteration, in radians.
const LATITUDE_EPSILON: f64 = 1e-12;

/// Upper bound on latitude refinement steps.
const MAX_ITERATIONS: usize = 10;

/// A reference ellipsoid of revolution.
///
/// # Examples
///
/// ```
/// use spatio_types::ellipsoid::Ellipsoid;
/// use spatio_types::point::Cartographic3;
///
/// let wgs84 = Ellipsoid::WGS84;
/// let nyc = Cartographic3::new(-74.0060, 40.7128, 10.0);
/// let ecef = wgs84.cartographic_to_cartesian(&nyc);
/// let back = wgs84.cartesian_to_cartographic(&ecef).unwrap();
/// assert!((back.height() - 10.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub semi_major_axis: f64,
    /// Semi-minor axis in meters
    pub semi_minor_axis: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        semi_minor_axis: 6_356_752.314_245_179,
    };

    fn eccentricity_squared(&self) -> f64 {
        let a2 = self.semi_major_axis * self.semi_major_axis;
        let b2 = self.semi_minor_axis * self.semi_minor_axis;
        (a2 - b2) / a2
    }

    /// Prime vertical radius of curvature at a geodetic latitude (radians).
    fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        let sin_lat = latitude.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    pub fn cartographic_to_cartesian(&self, position: &Cartographic3) -> Cartesian3 {
        let lon = position.longitude_radians();
        let lat = position.latitude_radians();
        let h = position.height();
        let n = self.prime_vertical_radius(lat);
        let e2 = self.eccentricity_squared();

        Cartesian3::new(
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + h) * lat.sin(),
        )
    }

    /// Convert an ECEF position to geodetic coordinates.
    ///
    /// Returns `None` for the Earth's center and for non-finite input, where
    /// latitude and longitude are undefined.
    pub fn cartesian_to_cartographic(&self, position: &Cartesian3) -> Option<Cartographic3> {
        if !position.is_finite() || position.magnitude() == 0.0 {
            return None;
        }

        let e2 = self.eccentricity_squared();
        let p = (position.x * position.x + position.y * position.y).sqrt();
        let lon = position.y.atan2(position.x);

        if p == 0.0 {
            // On the polar axis
            let lat = std::f64::consts::FRAC_PI_2.copysign(position.z);
            let h = position.z.abs() - self.semi_minor_axis;
            return Some(Cartographic3::from_radians(lon, lat, h));
        }

        let mut lat = position.z.atan2(p * (1.0 - e2));
        for _ in 0..MAX_ITERATIONS {
            let n = self.prime_vertical_radius(lat);
            let h = p / lat.cos() - n;
            let next = position.z.atan2(p * (1.0 - e2 * n / (n + h)));
            let converged = (next - lat).abs() < LATITUDE_EPSILON;
            lat = next;
            if converged {
                break;
            }
        }
        let h = p / lat.cos() - self.prime_vertical_radius(lat);

        Some(Cartographic3::from_radians(lon, lat, h))
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
