//! Time-dynamic position resolution over heterogeneously encoded samples.
//!
//! Samples arrive as Cartesian or Cartographic triples, optionally bound to
//! an ISO 8601 interval. The resolver partitions the timeline into spans,
//! routes each span to a per-kind store, and answers point queries in either
//! representation with a one-slot memo for frame-by-frame access.
//!
//! ```rust
//! use spatio_dynamic::{Instant, PositionResolver, SampleContext};
//! use serde_json::json;
//!
//! let mut resolver = PositionResolver::new();
//! resolver.process_packet(
//!     &json!([
//!         {
//!             "interval": "2012-03-15T10:00:00Z/2012-03-15T11:00:00Z",
//!             "epoch": "2012-03-15T10:00:00Z",
//!             "cartesian": [0, 1000.0, 0.0, 0.0, 3600, 2000.0, 0.0, 0.0]
//!         }
//!     ]),
//!     SampleContext::default(),
//! );
//!
//! let noon: Instant = "2012-03-15T10:30:00Z".parse()?;
//! let position = resolver.cartesian_at(noon).unwrap();
//! assert_eq!(position.x, 1500.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod kind;
pub mod resolver;
pub mod sample;
pub mod stats;
pub mod store;

pub use builder::ResolverBuilder;
pub use config::{ExtrapolationPolicy, RebindPolicy, ResolverConfig};
pub use error::{DynamicError, Result};
pub use index::{IntervalIndex, TimeSpan};
pub use kind::{Resolution, TypeResolver, ValueKind};
pub use resolver::cache::{QueryCache, Representation};
pub use resolver::{PositionResolver, RejectReason, RejectedSample};
pub use sample::{RawSample, SampleContext, SampleValue};
pub use stats::{IngestSummary, ResolverStats};
pub use store::{CanonicalStore, StoreId, StoreRegistry};

#[cfg(feature = "sync")]
pub use resolver::sync::SyncPositionResolver;

pub use geo::Point;
pub use spatio_types::ellipsoid::Ellipsoid;
pub use spatio_types::point::{Cartesian3, Cartographic3};
pub use spatio_types::time::Instant;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Cartesian3, Cartographic3, Instant, PositionResolver, RawSample, ResolverBuilder,
        ResolverConfig, SampleContext,
    };

    #[cfg(feature = "sync")]
    pub use crate::SyncPositionResolver;
}
