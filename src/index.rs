//! Interval index partitioning the timeline into non-overlapping spans.
//!
//! Each [`TimeSpan`] carries an optional handle to the store that answers
//! queries inside it. The index keeps spans sorted by `(start, stop)` so both
//! exact lookups and point-containment lookups are binary searches.

use crate::error::{DynamicError, Result};
use crate::store::StoreId;
use spatio_types::time::Instant;
use std::fmt;

/// An interval of time with inclusivity flags and a store handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    start: Instant,
    stop: Instant,
    pub start_included: bool,
    pub stop_included: bool,
    /// Store answering queries inside this span, if bound
    pub payload: Option<StoreId>,
}

impl TimeSpan {
    /// The span covering all of time.
    pub const MAXIMUM: TimeSpan = TimeSpan {
        start: Instant::MIN,
        stop: Instant::MAX,
        start_included: true,
        stop_included: true,
        payload: None,
    };

    /// Create a fully inclusive span `[start, stop]`.
    pub fn new(start: Instant, stop: Instant) -> Result<Self> {
        Self::with_inclusivity(start, stop, true, true)
    }

    pub fn with_inclusivity(
        start: Instant,
        stop: Instant,
        start_included: bool,
        stop_included: bool,
    ) -> Result<Self> {
        if start > stop {
            return Err(DynamicError::InvalidInterval(format!(
                "start {} is after stop {}",
                start, stop
            )));
        }
        Ok(Self {
            start,
            stop,
            start_included,
            stop_included,
            payload: None,
        })
    }

    /// Parse an ISO 8601 `start/stop` interval such as
    /// `2012-03-15T10:00:00Z/2012-03-16T10:00:00Z`.
    ///
    /// ```
    /// use spatio_dynamic::TimeSpan;
    ///
    /// let span = TimeSpan::from_iso8601("2012-03-15T10:00:00Z/2012-03-16T10:00:00Z").unwrap();
    /// assert!(span.stop() > span.start());
    /// ```
    pub fn from_iso8601(text: &str) -> Result<Self> {
        let (start, stop) = text.split_once('/').ok_or_else(|| {
            DynamicError::InvalidInterval(format!("'{}' is not of the form start/stop", text))
        })?;
        let start = start
            .parse::<Instant>()
            .map_err(|e| DynamicError::invalid_timestamp(start, e))?;
        let stop = stop
            .parse::<Instant>()
            .map_err(|e| DynamicError::invalid_timestamp(stop, e))?;
        Self::new(start, stop)
    }

    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> Instant {
        self.stop
    }

    pub fn contains(&self, instant: Instant) -> bool {
        let after_start = if self.start_included {
            instant >= self.start
        } else {
            instant > self.start
        };
        let before_stop = if self.stop_included {
            instant <= self.stop
        } else {
            instant < self.stop
        };
        after_start && before_stop
    }

    fn is_instantaneous(&self) -> bool {
        self.start == self.stop
    }

    /// Whether two spans share more than a single endpoint.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        let lo = self.start.max(other.start);
        let hi = self.stop.min(other.stop);
        if lo < hi {
            return true;
        }
        // An instantaneous span strictly inside the other
        lo == hi
            && ((self.is_instantaneous() && other.start < lo && lo < other.stop)
                || (other.is_instantaneous() && self.start < lo && lo < self.stop))
    }

    fn key(&self) -> (Instant, Instant) {
        (self.start, self.stop)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.start_included { '[' } else { '(' },
            self.start,
            self.stop,
            if self.stop_included { ']' } else { ')' }
        )
    }
}

/// Sorted, non-overlapping collection of spans.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    spans: Vec<TimeSpan>,
}

impl IntervalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSpan> {
        self.spans.iter()
    }

    pub fn get(&self, position: usize) -> Option<&TimeSpan> {
        self.spans.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut TimeSpan> {
        self.spans.get_mut(position)
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Remove and return the span at `position`.
    pub fn remove(&mut self, position: usize) -> Option<TimeSpan> {
        (position < self.spans.len()).then(|| self.spans.remove(position))
    }

    fn search(&self, start: Instant, stop: Instant) -> std::result::Result<usize, usize> {
        self.spans.binary_search_by(|s| s.key().cmp(&(start, stop)))
    }

    /// Position of the span whose endpoints equal `start` and `stop`.
    pub fn position_exact(&self, start: Instant, stop: Instant) -> Option<usize> {
        self.search(start, stop).ok()
    }

    pub fn find_exact(&self, start: Instant, stop: Instant) -> Option<&TimeSpan> {
        self.position_exact(start, stop).map(|pos| &self.spans[pos])
    }

    pub fn find_exact_mut(&mut self, start: Instant, stop: Instant) -> Option<&mut TimeSpan> {
        let pos = self.position_exact(start, stop)?;
        self.spans.get_mut(pos)
    }

    /// The span containing `instant`.
    ///
    /// When two spans share an endpoint that both include, the later span
    /// answers.
    pub fn find_containing(&self, instant: Instant) -> Option<&TimeSpan> {
        let end = self.spans.partition_point(|s| s.start <= instant);
        // Stops are non-decreasing, so earlier spans cannot reach past this point
        self.spans[..end]
            .iter()
            .rev()
            .take_while(|s| s.stop >= instant)
            .find(|s| s.contains(instant))
    }

    /// Return the position of the span with `span`'s endpoints, inserting an
    /// unbound copy of `span` if none exists.
    ///
    /// Overlapping input is not split: a span that overlaps an existing one
    /// is rejected with [`DynamicError::OverlappingSpan`].
    pub fn insert_or_merge(&mut self, span: TimeSpan) -> Result<usize> {
        let pos = match self.search(span.start, span.stop) {
            Ok(pos) => return Ok(pos),
            Err(pos) => pos,
        };

        let before = self.spans[..pos]
            .iter()
            .rev()
            .take_while(|s| s.stop >= span.start);
        let after = self.spans[pos..]
            .iter()
            .take_while(|s| s.start <= span.stop);
        if before.chain(after).any(|s| s.overlaps(&span)) {
            return Err(DynamicError::OverlappingSpan {
                start: span.start,
                stop: span.stop,
            });
        }

        self.spans.insert(pos, TimeSpan { payload: None, ..span });
        log::debug!("Inserted span {} at position {}", span, pos);
        Ok(pos)
    }
}
