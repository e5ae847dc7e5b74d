//! Single-slot memo for point queries.
//!
//! The cache remembers the last queried instant, the span that answered it,
//! and the value produced for each output representation. It is cleared on
//! every ingestion and filled only by successful queries.

use crate::index::TimeSpan;
use crate::kind::ValueKind;
use spatio_types::point::{Cartesian3, Cartographic3};
use spatio_types::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCache {
    instant: Option<Instant>,
    span: Option<TimeSpan>,
    cartesian: Option<Cartesian3>,
    cartographic: Option<Cartographic3>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, including the remembered span.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn instant(&self) -> Option<Instant> {
        self.instant
    }

    pub fn is_at(&self, instant: Instant) -> bool {
        self.instant == Some(instant)
    }

    /// Move the memo to `instant`, dropping values memoized for another
    /// instant. The remembered span survives so the next lookup can reuse it.
    pub fn advance(&mut self, instant: Instant) {
        if !self.is_at(instant) {
            self.instant = Some(instant);
            self.cartesian = None;
            self.cartographic = None;
        }
    }

    pub fn span(&self) -> Option<&TimeSpan> {
        self.span.as_ref()
    }

    pub fn set_span(&mut self, span: Option<TimeSpan>) {
        self.span = span;
    }

    pub fn cartesian(&self) -> Option<Cartesian3> {
        self.cartesian
    }

    pub fn set_cartesian(&mut self, value: Cartesian3) {
        self.cartesian = Some(value);
    }

    pub fn cartographic(&self) -> Option<Cartographic3> {
        self.cartographic
    }

    pub fn set_cartographic(&mut self, value: Cartographic3) {
        self.cartographic = Some(value);
    }
}

/// An output representation with its own memo slot.
pub trait Representation: Copy {
    /// Convert native components of `kind` into this representation.
    fn from_native(kind: ValueKind, native: [f64; 3]) -> Option<Self>;

    fn cached(cache: &QueryCache) -> Option<Self>;

    fn store_in(self, cache: &mut QueryCache);
}

impl Representation for Cartesian3 {
    fn from_native(kind: ValueKind, native: [f64; 3]) -> Option<Self> {
        kind.to_cartesian(native)
    }

    fn cached(cache: &QueryCache) -> Option<Self> {
        cache.cartesian()
    }

    fn store_in(self, cache: &mut QueryCache) {
        cache.set_cartesian(self);
    }
}

impl Representation for Cartographic3 {
    fn from_native(kind: ValueKind, native: [f64; 3]) -> Option<Self> {
        kind.to_cartographic(native)
    }

    fn cached(cache: &QueryCache) -> Option<Self> {
        cache.cartographic()
    }

    fn store_in(self, cache: &mut QueryCache) {
        cache.set_cartographic(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_keeps_span_drops_values() {
        let mut cache = QueryCache::new();
        cache.advance(Instant::from_unix_seconds(1));
        cache.set_span(Some(TimeSpan::MAXIMUM));
        cache.set_cartesian(Cartesian3::new(1.0, 2.0, 3.0));

        cache.advance(Instant::from_unix_seconds(1));
        assert_eq!(cache.cartesian(), Some(Cartesian3::new(1.0, 2.0, 3.0)));

        cache.advance(Instant::from_unix_seconds(2));
        assert!(cache.is_at(Instant::from_unix_seconds(2)));
        assert_eq!(cache.cartesian(), None);
        assert_eq!(cache.span(), Some(&TimeSpan::MAXIMUM));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut cache = QueryCache::new();
        cache.advance(Instant::EPOCH);
        cache.set_cartographic(Cartographic3::new(1.0, 2.0, 3.0));
        assert_eq!(Cartesian3::cached(&cache), None);
        assert_eq!(
            Cartographic3::cached(&cache),
            Some(Cartographic3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cache = QueryCache::new();
        cache.advance(Instant::EPOCH);
        cache.set_span(Some(TimeSpan::MAXIMUM));
        cache.set_cartesian(Cartesian3::ZERO);
        cache.clear();
        assert_eq!(cache, QueryCache::default());
        assert!(!cache.is_at(Instant::EPOCH));
    }
}
