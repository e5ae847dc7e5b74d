//! Per-kind sample stores and the registry that owns them.
//!
//! Stores live in an arena inside [`StoreRegistry`]; spans refer to them by
//! [`StoreId`], so several spans can share one store.

use crate::config::ExtrapolationPolicy;
use crate::kind::ValueKind;
use crate::sample::{SampleContext, SampleValue};
use rustc_hash::FxHashMap;
use spatio_types::point::{Cartesian3, Cartographic3};
use spatio_types::time::Instant;

/// Handle to a store in a [`StoreRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(usize);

impl StoreId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A value that is authoritative over `[start, stop]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedRange {
    pub start: Instant,
    pub stop: Instant,
    pub value: SampleValue,
}

impl AccumulatedRange {
    fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant <= self.stop
    }
}

/// Accumulates decoded samples of a single kind and answers point queries.
#[derive(Debug, Clone)]
pub struct CanonicalStore {
    kind: ValueKind,
    /// Sorted by `(start, stop)`
    ranges: Vec<AccumulatedRange>,
    extrapolation: ExtrapolationPolicy,
    sample_warn_threshold: usize,
}

impl CanonicalStore {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            ranges: Vec::new(),
            extrapolation: ExtrapolationPolicy::default(),
            sample_warn_threshold: usize::MAX,
        }
    }

    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    pub fn with_sample_warn_threshold(mut self, threshold: usize) -> Self {
        self.sample_warn_threshold = threshold;
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn ranges(&self) -> &[AccumulatedRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of native values held across all ranges.
    pub fn sample_count(&self) -> usize {
        self.ranges.iter().map(|r| r.value.len()).sum()
    }

    fn search(&self, start: Instant, stop: Instant) -> Result<usize, usize> {
        self.ranges
            .binary_search_by(|r| (r.start, r.stop).cmp(&(start, stop)))
    }

    /// Record `value` as authoritative for `[start, stop]`.
    ///
    /// Accumulating into a range with identical endpoints merges into it, so
    /// repeating the same sample is a no-op.
    pub fn accumulate(
        &mut self,
        start: Instant,
        stop: Instant,
        value: SampleValue,
        _ctx: &SampleContext<'_>,
    ) {
        let pos = match self.search(start, stop) {
            Ok(pos) => {
                self.ranges[pos].value.merge(value);
                pos
            }
            Err(pos) => {
                self.ranges.insert(pos, AccumulatedRange { start, stop, value });
                pos
            }
        };

        let count = self.ranges[pos].value.len();
        if count > self.sample_warn_threshold {
            log::warn!(
                "{} store holds {} samples for range [{}, {}]. \
                 Consider splitting the data into shorter intervals.",
                self.kind,
                count,
                start,
                stop
            );
        }
    }

    /// Drop the range with exactly these endpoints. Returns whether one existed.
    pub fn purge_range(&mut self, start: Instant, stop: Instant) -> bool {
        match self.search(start, stop) {
            Ok(pos) => {
                self.ranges.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Native value at `instant`.
    ///
    /// Among ranges containing the instant, the one that starts latest
    /// answers. Returns `None` outside every accumulated range.
    pub fn value_at(&self, instant: Instant) -> Option<[f64; 3]> {
        let end = self.ranges.partition_point(|r| r.start <= instant);
        let range = self.ranges[..end]
            .iter()
            .rev()
            .find(|r| r.contains(instant))?;
        evaluate(&range.value, instant, self.extrapolation)
    }

    pub fn convert_to_cartesian(&self, native: [f64; 3]) -> Option<Cartesian3> {
        self.kind.to_cartesian(native)
    }

    pub fn convert_to_cartographic(&self, native: [f64; 3]) -> Option<Cartographic3> {
        self.kind.to_cartographic(native)
    }
}

/// Linear interpolation across a sampled value.
fn evaluate(
    value: &SampleValue,
    instant: Instant,
    extrapolation: ExtrapolationPolicy,
) -> Option<[f64; 3]> {
    let samples = match value {
        SampleValue::Constant(v) => return Some(*v),
        SampleValue::Sampled(samples) => samples,
    };
    let (first, last) = (samples.first()?, samples.last()?);

    if instant < first.0 || instant > last.0 {
        return match extrapolation {
            ExtrapolationPolicy::Hold if instant < first.0 => Some(first.1),
            ExtrapolationPolicy::Hold => Some(last.1),
            ExtrapolationPolicy::None => None,
        };
    }

    let upper = samples.partition_point(|(t, _)| *t <= instant);
    let (t0, v0) = samples[upper - 1];
    if t0 == instant || upper == samples.len() {
        return Some(v0);
    }
    let (t1, v1) = samples[upper];
    let f = instant.seconds_since(t0) / t1.seconds_since(t0);
    Some([
        v0[0] + (v1[0] - v0[0]) * f,
        v0[1] + (v1[1] - v0[1]) * f,
        v0[2] + (v1[2] - v0[2]) * f,
    ])
}

/// Arena of stores, at most one per kind.
#[derive(Debug, Clone, Default)]
pub struct StoreRegistry {
    stores: Vec<CanonicalStore>,
    by_kind: FxHashMap<ValueKind, StoreId>,
    extrapolation: ExtrapolationPolicy,
    sample_warn_threshold: Option<usize>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new stores use the given policies.
    pub fn with_policies(extrapolation: ExtrapolationPolicy, sample_warn_threshold: usize) -> Self {
        Self {
            extrapolation,
            sample_warn_threshold: Some(sample_warn_threshold),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn find(&self, kind: ValueKind) -> Option<StoreId> {
        self.by_kind.get(&kind).copied()
    }

    pub fn get(&self, id: StoreId) -> Option<&CanonicalStore> {
        self.stores.get(id.0)
    }

    pub fn get_mut(&mut self, id: StoreId) -> Option<&mut CanonicalStore> {
        self.stores.get_mut(id.0)
    }

    /// Store for `kind`, creating it on first use. The flag reports creation.
    pub fn get_or_create(&mut self, kind: ValueKind) -> (StoreId, bool) {
        if let Some(id) = self.find(kind) {
            return (id, false);
        }
        let id = StoreId(self.stores.len());
        let mut store = CanonicalStore::new(kind).with_extrapolation(self.extrapolation);
        if let Some(threshold) = self.sample_warn_threshold {
            store = store.with_sample_warn_threshold(threshold);
        }
        self.stores.push(store);
        self.by_kind.insert(kind, id);
        log::debug!("Created {} store {}", kind, id.0);
        (id, true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StoreId, &CanonicalStore)> {
        self.stores
            .iter()
            .enumerate()
            .map(|(i, store)| (StoreId(i), store))
    }

    pub fn clear(&mut self) {
        self.stores.clear();
        self.by_kind.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: f64) -> Instant {
        Instant::EPOCH.add_seconds(seconds)
    }

    fn ctx() -> SampleContext<'static> {
        SampleContext::default()
    }

    fn ramp() -> SampleValue {
        SampleValue::sampled(vec![(at(0.0), [0.0, 0.0, 0.0]), (at(10.0), [10.0, 20.0, 30.0])])
    }

    #[test]
    fn test_constant_value() {
        let mut store = CanonicalStore::new(ValueKind::Cartesian3);
        store.accumulate(at(0.0), at(10.0), SampleValue::Constant([1.0, 2.0, 3.0]), &ctx());
        assert_eq!(store.value_at(at(5.0)), Some([1.0, 2.0, 3.0]));
        assert_eq!(store.value_at(at(11.0)), None);
        assert_eq!(store.value_at(at(-1.0)), None);
    }

    #[test]
    fn test_linear_interpolation() {
        let mut store = CanonicalStore::new(ValueKind::Cartesian3);
        store.accumulate(at(0.0), at(10.0), ramp(), &ctx());
        assert_eq!(store.value_at(at(5.0)), Some([5.0, 10.0, 15.0]));
        assert_eq!(store.value_at(at(10.0)), Some([10.0, 20.0, 30.0]));
        assert_eq!(store.value_at(at(0.0)), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_extrapolation_policies() {
        let mut hold = CanonicalStore::new(ValueKind::Cartesian3);
        hold.accumulate(at(-5.0), at(20.0), ramp(), &ctx());
        assert_eq!(hold.value_at(at(-2.0)), Some([0.0, 0.0, 0.0]));
        assert_eq!(hold.value_at(at(15.0)), Some([10.0, 20.0, 30.0]));

        let mut none =
            CanonicalStore::new(ValueKind::Cartesian3).with_extrapolation(ExtrapolationPolicy::None);
        none.accumulate(at(-5.0), at(20.0), ramp(), &ctx());
        assert_eq!(none.value_at(at(-2.0)), None);
        assert_eq!(none.value_at(at(15.0)), None);
        assert_eq!(none.value_at(at(5.0)), Some([5.0, 10.0, 15.0]));
    }

    #[test]
    fn test_duplicate_accumulation_is_idempotent() {
        let mut store = CanonicalStore::new(ValueKind::Cartesian3);
        store.accumulate(at(0.0), at(10.0), ramp(), &ctx());
        store.accumulate(at(0.0), at(10.0), ramp(), &ctx());
        assert_eq!(store.ranges().len(), 1);
        assert_eq!(store.sample_count(), 2);
    }

    #[test]
    fn test_later_start_wins_on_overlap() {
        let mut store = CanonicalStore::new(ValueKind::Cartesian3);
        store.accumulate(Instant::MIN, Instant::MAX, SampleValue::Constant([0.0; 3]), &ctx());
        store.accumulate(at(0.0), at(10.0), SampleValue::Constant([1.0; 3]), &ctx());
        assert_eq!(store.value_at(at(5.0)), Some([1.0; 3]));
        assert_eq!(store.value_at(at(50.0)), Some([0.0; 3]));
    }

    #[test]
    fn test_purge_range() {
        let mut store = CanonicalStore::new(ValueKind::Cartesian3);
        store.accumulate(at(0.0), at(10.0), SampleValue::Constant([1.0; 3]), &ctx());
        assert!(!store.purge_range(at(0.0), at(11.0)));
        assert!(store.purge_range(at(0.0), at(10.0)));
        assert!(store.is_empty());
        assert_eq!(store.value_at(at(5.0)), None);
    }

    #[test]
    fn test_registry_one_store_per_kind() {
        let mut registry = StoreRegistry::new();
        let (a, created_a) = registry.get_or_create(ValueKind::Cartesian3);
        let (b, created_b) = registry.get_or_create(ValueKind::Cartesian3);
        let (c, _) = registry.get_or_create(ValueKind::Cartographic3);
        assert!(created_a && !created_b);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(ValueKind::Cartographic3), Some(c));
        assert_eq!(registry.get(c).unwrap().kind(), ValueKind::Cartographic3);
    }

    #[test]
    fn test_registry_applies_policies() {
        let mut registry = StoreRegistry::with_policies(ExtrapolationPolicy::None, 10);
        let (id, _) = registry.get_or_create(ValueKind::Cartesian3);
        let store = registry.get_mut(id).unwrap();
        store.accumulate(at(-5.0), at(20.0), ramp(), &ctx());
        assert_eq!(store.value_at(at(15.0)), None);
    }
}
