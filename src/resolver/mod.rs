//! Time-dynamic position resolver.
//!
//! [`PositionResolver`] ingests raw samples into an interval index backed by
//! one store per value kind and answers point queries in Cartesian or
//! Cartographic form.
//!
//! ```rust
//! use spatio_dynamic::{Instant, PositionResolver, RawSample, SampleContext};
//! use serde_json::json;
//!
//! let mut resolver = PositionResolver::new();
//! resolver.add_sample(
//!     &RawSample::new(json!({ "cartographicDegrees": [-74.0060, 40.7128, 100.0] })),
//!     SampleContext::default(),
//! );
//!
//! let position = resolver.cartographic_at(Instant::now()).unwrap();
//! assert_eq!(position.height(), 100.0);
//! ```

pub mod cache;
#[cfg(feature = "sync")]
pub mod sync;

use crate::builder::ResolverBuilder;
use crate::config::{RebindPolicy, ResolverConfig};
use crate::error::{DynamicError, Result};
use crate::index::IntervalIndex;
use crate::kind::TypeResolver;
use crate::sample::{RawSample, SampleContext, SampleValue};
use crate::stats::{IngestSummary, ResolverStats};
use crate::store::{StoreId, StoreRegistry};
use cache::{QueryCache, Representation};
use serde_json::Value;
use spatio_types::point::{Cartesian3, Cartographic3};
use spatio_types::time::Instant;
use std::fmt;

/// Why a sample was skipped during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The `interval` field could not be parsed
    InvalidInterval,
    /// The interval overlaps an existing span without matching it
    OverlappingSpan,
    /// No value kind could decode the sample
    UnrecognizedEncoding,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterval => write!(f, "invalid interval"),
            Self::OverlappingSpan => write!(f, "overlapping span"),
            Self::UnrecognizedEncoding => write!(f, "unrecognized encoding"),
        }
    }
}

/// A sample skipped during ingestion, handed to the rejection hook.
#[derive(Debug)]
pub struct RejectedSample<'a> {
    pub sample: &'a RawSample<'a>,
    pub reason: RejectReason,
    pub detail: String,
}

pub type RejectionHook = Box<dyn FnMut(&RejectedSample<'_>) + Send>;

/// Resolves a position as a function of time from heterogeneous samples.
///
/// Single-threaded: ingestion and queries both take `&mut self` because
/// queries update the memo. See `SyncPositionResolver` (feature `sync`) for
/// shared access.
pub struct PositionResolver {
    index: IntervalIndex,
    stores: StoreRegistry,
    type_resolver: TypeResolver,
    cache: QueryCache,
    config: ResolverConfig,
    stats: ResolverStats,
    on_rejected: Option<RejectionHook>,
}

impl PositionResolver {
    pub fn new() -> Self {
        Self::from_parts(ResolverConfig::default(), TypeResolver::new(), None)
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, TypeResolver::new(), None))
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ResolverConfig,
        type_resolver: TypeResolver,
        on_rejected: Option<RejectionHook>,
    ) -> Self {
        Self {
            index: IntervalIndex::new(),
            stores: StoreRegistry::with_policies(config.extrapolation, config.sample_warn_threshold),
            type_resolver,
            cache: QueryCache::new(),
            config,
            stats: ResolverStats::new(),
            on_rejected,
        }
    }

    /// Feed a packet's position property into `existing`, creating a
    /// resolver when there is data and none exists yet.
    ///
    /// A missing property leaves `existing` untouched.
    pub fn process_czml_packet(
        packet: Option<&Value>,
        existing: Option<PositionResolver>,
        ctx: SampleContext<'_>,
    ) -> Option<PositionResolver> {
        let Some(packet) = packet else {
            return existing;
        };
        let mut resolver = existing.unwrap_or_default();
        resolver.process_packet(packet, ctx);
        Some(resolver)
    }

    /// Ingest a JSON value holding either one sample object or an array of
    /// them.
    pub fn process_packet(&mut self, packet: &Value, ctx: SampleContext<'_>) -> IngestSummary {
        match packet {
            Value::Array(items) => {
                let samples: Vec<RawSample<'_>> = items.iter().map(RawSample::borrowed).collect();
                self.add_samples(&samples, ctx)
            }
            single => self.add_sample(&RawSample::borrowed(single), ctx),
        }
    }

    pub fn add_sample(&mut self, sample: &RawSample<'_>, ctx: SampleContext<'_>) -> IngestSummary {
        self.add_samples(std::slice::from_ref(sample), ctx)
    }

    /// Ingest samples in order.
    ///
    /// Never fails: samples that cannot be placed or decoded are skipped and
    /// reported through the summary, the stats, and the rejection hook.
    pub fn add_samples(&mut self, samples: &[RawSample<'_>], ctx: SampleContext<'_>) -> IngestSummary {
        self.cache.clear();

        let mut summary = IngestSummary::default();
        for sample in samples {
            match self.ingest_one(sample, &ctx) {
                Ok(()) => {
                    summary.accepted += 1;
                    self.stats.record_accepted();
                }
                Err((reason, detail)) => {
                    summary.rejected += 1;
                    self.reject(sample, reason, detail);
                }
            }
        }
        summary
    }

    fn ingest_one(
        &mut self,
        sample: &RawSample<'_>,
        ctx: &SampleContext<'_>,
    ) -> std::result::Result<(), (RejectReason, String)> {
        let interval = sample
            .interval()
            .map_err(|e| (RejectReason::InvalidInterval, e.to_string()))?;
        let (start, stop) = (interval.start(), interval.stop());

        let (pos, inserted) = match self.index.position_exact(start, stop) {
            Some(pos) => (pos, false),
            None => {
                let pos = self.index.insert_or_merge(interval).map_err(|e| match e {
                    DynamicError::OverlappingSpan { .. } => {
                        (RejectReason::OverlappingSpan, e.to_string())
                    }
                    other => (RejectReason::InvalidInterval, other.to_string()),
                })?;
                (pos, true)
            }
        };
        let bound = self.index.get(pos).and_then(|span| span.payload);

        // Same-kind continuation
        let fast = bound.and_then(|id| {
            let kind = self.stores.get(id)?.kind();
            kind.decode(sample, ctx).map(|value| (id, value))
        });

        let (id, value) = match fast {
            Some(hit) => hit,
            None => {
                let Some(resolution) = self.type_resolver.resolve(sample, ctx, &self.stores)
                else {
                    // An unbound span answers nothing and would only block later samples
                    if inserted {
                        self.index.remove(pos);
                    }
                    return Err((
                        RejectReason::UnrecognizedEncoding,
                        format!("no value kind decodes the sample for {}", interval),
                    ));
                };
                let id = match resolution.store {
                    Some(id) => id,
                    None => {
                        let (id, created) = self.stores.get_or_create(resolution.kind);
                        if created {
                            self.stats.stores_created += 1;
                        }
                        id
                    }
                };
                self.bind(pos, bound, id);
                (id, resolution.value)
            }
        };

        self.accumulate(id, start, stop, value, ctx);
        Ok(())
    }

    fn bind(&mut self, pos: usize, previous: Option<StoreId>, id: StoreId) {
        let Some(span) = self.index.get_mut(pos) else {
            return;
        };
        span.payload = Some(id);
        let (start, stop) = (span.start(), span.stop());

        if let Some(old) = previous
            && old != id
        {
            self.stats.rebinds += 1;
            log::debug!("Span [{}, {}] rebound from store {} to {}", start, stop, old.index(), id.index());
            if self.config.rebind_policy == RebindPolicy::Purge
                && let Some(store) = self.stores.get_mut(old)
            {
                store.purge_range(start, stop);
            }
            // Data retained from an earlier binding to `id` is stale
            if let Some(store) = self.stores.get_mut(id)
                && store.purge_range(start, stop)
            {
                log::debug!("Dropped stale {} range [{}, {}]", store.kind(), start, stop);
            }
        }
    }

    fn accumulate(
        &mut self,
        id: StoreId,
        start: Instant,
        stop: Instant,
        value: SampleValue,
        ctx: &SampleContext<'_>,
    ) {
        if let Some(store) = self.stores.get_mut(id) {
            store.accumulate(start, stop, value, ctx);
        }
    }

    fn reject(&mut self, sample: &RawSample<'_>, reason: RejectReason, detail: String) {
        self.stats.record_rejected();
        if self.config.log_rejections {
            log::warn!("Skipping sample ({}): {}", reason, detail);
        }
        if let Some(hook) = self.on_rejected.as_mut() {
            hook(&RejectedSample {
                sample,
                reason,
                detail,
            });
        }
    }

    /// Position at `instant` in the requested representation.
    pub fn value_at<R: Representation>(&mut self, instant: Instant) -> Option<R> {
        if self.cache.is_at(instant) {
            if let Some(value) = R::cached(&self.cache) {
                self.stats.cache_hits += 1;
                return Some(value);
            }
        } else {
            self.cache.advance(instant);
            // A later span may start at the cached span's stop
            let reusable = self
                .cache
                .span()
                .is_some_and(|span| span.contains(instant) && instant < span.stop());
            if !reusable {
                self.stats.index_searches += 1;
                let found = self.index.find_containing(instant).copied();
                self.cache.set_span(found);
            }
        }

        // The cached span now answers for `instant`; none means no coverage
        let store = self.stores.get(self.cache.span()?.payload?)?;
        let native = store.value_at(instant)?;
        let value = R::from_native(store.kind(), native)?;
        value.store_in(&mut self.cache);
        Some(value)
    }

    pub fn cartesian_at(&mut self, instant: Instant) -> Option<Cartesian3> {
        self.value_at(instant)
    }

    pub fn cartographic_at(&mut self, instant: Instant) -> Option<Cartographic3> {
        self.value_at(instant)
    }

    /// Install a callback invoked for every skipped sample.
    pub fn set_rejection_hook(
        &mut self,
        hook: impl FnMut(&RejectedSample<'_>) + Send + 'static,
    ) {
        self.on_rejected = Some(Box::new(hook));
    }

    pub fn clear_rejection_hook(&mut self) {
        self.on_rejected = None;
    }

    /// Drop every span, store, and memo. Stats are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.stores.clear();
        self.cache.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }
}

impl Default for PositionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PositionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionResolver")
            .field("spans", &self.index.len())
            .field("stores", &self.stores.len())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
