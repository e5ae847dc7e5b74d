//! # spatio-types
//!
//! Core spatial and temporal value types shared by the dynamic position
//! resolver.
//!
//! - **Time**: `Instant`, a microsecond UTC timestamp with beginning/end of time sentinels
//! - **Positions**: `Cartesian3` (ECEF meters) and `Cartographic3` (degrees + height)
//! - **Geodesy**: `Ellipsoid`, conversions between the two position forms
//!
//! Positions are serializable with Serde and the horizontal part of
//! `Cartographic3` is a `geo::Point`.
//!
//! ## Examples
//!
//! ```rust
//! use spatio_types::ellipsoid::Ellipsoid;
//! use spatio_types::point::Cartographic3;
//! use spatio_types::time::Instant;
//!
//! let when: Instant = "2012-03-15T10:00:00Z".parse().unwrap();
//! let nyc = Cartographic3::new(-74.0060, 40.7128, 0.0);
//! let ecef = Ellipsoid::WGS84.cartographic_to_cartesian(&nyc);
//! assert!(ecef.magnitude() > 6_000_000.0);
//! assert!(when > Instant::EPOCH);
//! ```

pub use chrono;

pub mod ellipsoid;
pub mod point;
pub mod time;
