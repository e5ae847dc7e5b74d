use serde::{Deserialize, Serialize};

/// Counters describing ingestion and query activity of a resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverStats {
    /// Samples decoded and accumulated
    pub samples_accepted: u64,
    /// Samples skipped because of an unusable interval or encoding
    pub samples_rejected: u64,
    /// Spans whose store changed to a different kind
    pub rebinds: u64,
    /// Stores created for a previously unseen kind
    pub stores_created: u64,
    /// Interval index searches performed by queries
    pub index_searches: u64,
    /// Queries answered straight from the memo
    pub cache_hits: u64,
}

impl ResolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self) {
        self.samples_accepted += 1;
    }

    pub fn record_rejected(&mut self) {
        self.samples_rejected += 1;
    }
}

/// Outcome of one ingestion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}
