use geo::Point;
use serde::{Deserialize, Serialize};

/// An Earth-centered, Earth-fixed Cartesian position in meters.
///
/// # Examples
///
/// ```
/// use spatio_types::point::Cartesian3;
///
/// let p = Cartesian3::new(3.0, 4.0, 12.0);
/// assert_eq!(p.magnitude(), 13.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    pub const ZERO: Cartesian3 = Cartesian3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(components: [f64; 3]) -> Self {
        Self::new(components[0], components[1], components[2])
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean length of the vector from the origin.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Straight-line distance to another position.
    pub fn distance(&self, other: &Cartesian3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A geodetic position: longitude/latitude in degrees and height in meters
/// above the ellipsoid.
///
/// Longitude and latitude live in a `geo::Point` (x = longitude,
/// y = latitude) so the horizontal component can be handed straight to `geo`
/// algorithms.
///
/// # Examples
///
/// ```
/// use spatio_types::point::Cartographic3;
///
/// let summit = Cartographic3::new(-74.0060, 40.7128, 541.0);
/// assert_eq!(summit.longitude(), -74.0060);
/// assert_eq!(summit.height(), 541.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartographic3 {
    /// Longitude (x) and latitude (y) in degrees
    pub point: Point<f64>,
    /// Height above the ellipsoid in meters
    pub height: f64,
}

impl Cartographic3 {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            point: Point::new(longitude, latitude),
            height,
        }
    }

    /// Build from longitude/latitude given in radians.
    pub fn from_radians(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::new(longitude.to_degrees(), latitude.to_degrees(), height)
    }

    pub fn from_point_and_height(point: Point<f64>, height: f64) -> Self {
        Self { point, height }
    }

    pub fn from_array(components: [f64; 3]) -> Self {
        Self::new(components[0], components[1], components[2])
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.longitude(), self.latitude(), self.height]
    }

    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude().to_radians()
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude().to_radians()
    }

    /// The horizontal component, discarding height.
    pub fn to_2d(&self) -> Point<f64> {
        self.point
    }
}
