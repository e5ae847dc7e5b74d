//! Thread-safe wrapper for shared resolver access.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! spatio-dynamic = { version = "0.1", features = ["sync"] }
//! ```
//!
//! Queries update the memo, so every call takes the lock exclusively. That
//! keeps ingestion and queries mutually exclusive and serializes access to
//! the single memo slot.
//!
//! ```rust
//! use spatio_dynamic::{Instant, RawSample, SampleContext, SyncPositionResolver};
//! use serde_json::json;
//! use std::thread;
//!
//! let resolver = SyncPositionResolver::new();
//! let writer = resolver.clone();
//! thread::spawn(move || {
//!     writer.add_sample(
//!         &RawSample::new(json!({ "cartesian": [1.0, 2.0, 3.0] })),
//!         SampleContext::default(),
//!     );
//! })
//! .join()
//! .unwrap();
//!
//! assert!(resolver.cartesian_at(Instant::EPOCH).is_some());
//! ```

use super::{PositionResolver, RejectedSample};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::sample::{RawSample, SampleContext};
use crate::stats::{IngestSummary, ResolverStats};
use parking_lot::Mutex;
use serde_json::Value;
use spatio_types::point::{Cartesian3, Cartographic3};
use spatio_types::time::Instant;
use std::sync::Arc;

/// Thread-safe wrapper around `PositionResolver` using `Arc<Mutex<_>>`.
#[derive(Clone, Default)]
pub struct SyncPositionResolver {
    inner: Arc<Mutex<PositionResolver>>,
}

impl SyncPositionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        Ok(Self::from(PositionResolver::with_config(config)?))
    }

    pub fn process_packet(&self, packet: &Value, ctx: SampleContext<'_>) -> IngestSummary {
        self.inner.lock().process_packet(packet, ctx)
    }

    pub fn add_sample(&self, sample: &RawSample<'_>, ctx: SampleContext<'_>) -> IngestSummary {
        self.inner.lock().add_sample(sample, ctx)
    }

    pub fn add_samples(&self, samples: &[RawSample<'_>], ctx: SampleContext<'_>) -> IngestSummary {
        self.inner.lock().add_samples(samples, ctx)
    }

    pub fn cartesian_at(&self, instant: Instant) -> Option<Cartesian3> {
        self.inner.lock().cartesian_at(instant)
    }

    pub fn cartographic_at(&self, instant: Instant) -> Option<Cartographic3> {
        self.inner.lock().cartographic_at(instant)
    }

    pub fn set_rejection_hook(&self, hook: impl FnMut(&RejectedSample<'_>) + Send + 'static) {
        self.inner.lock().set_rejection_hook(hook);
    }

    pub fn stats(&self) -> ResolverStats {
        *self.inner.lock().stats()
    }

    /// Run `f` with exclusive access to the wrapped resolver.
    pub fn with<T>(&self, f: impl FnOnce(&mut PositionResolver) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl From<PositionResolver> for SyncPositionResolver {
    fn from(resolver: PositionResolver) -> Self {
        Self {
            inner: Arc::new(Mutex::new(resolver)),
        }
    }
}
