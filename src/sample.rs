//! Raw samples as they arrive from a packet stream.
//!
//! A sample is a JSON object. Its optional `interval` field names the span it
//! is authoritative for and one of the encoding fields (`cartesian`,
//! `cartographicDegrees`, `cartographicRadians`) carries the value, either as
//! a constant triple or as a flat `[t, a, b, c, t, a, b, c, ...]` series of
//! offsets in seconds from the sample's `epoch`.

use crate::error::{DynamicError, Result};
use crate::index::TimeSpan;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spatio_types::time::Instant;
use std::borrow::Cow;

/// One raw, undecoded sample.
///
/// Owns its JSON value or borrows it from a larger packet.
///
/// ```
/// use spatio_dynamic::RawSample;
/// use serde_json::json;
///
/// let sample = RawSample::new(json!({ "cartesian": [1.0, 2.0, 3.0] }));
/// assert!(sample.field("cartesian").is_some());
///
/// let packet = json!([{ "cartesian": [1.0, 2.0, 3.0] }]);
/// let borrowed = RawSample::borrowed(&packet[0]);
/// assert_eq!(borrowed, sample);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSample<'a>(Cow<'a, Value>);

impl RawSample<'static> {
    pub fn new(value: Value) -> Self {
        Self(Cow::Owned(value))
    }
}

impl<'a> RawSample<'a> {
    pub fn borrowed(value: &'a Value) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn into_owned(self) -> RawSample<'static> {
        RawSample(Cow::Owned(self.0.into_owned()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The span this sample is authoritative for.
    ///
    /// A sample without an `interval` covers all of time.
    pub fn interval(&self) -> Result<TimeSpan> {
        match self.field("interval") {
            None | Some(Value::Null) => Ok(TimeSpan::MAXIMUM),
            Some(Value::String(text)) => TimeSpan::from_iso8601(text),
            Some(other) => Err(DynamicError::InvalidInterval(format!(
                "expected an ISO 8601 string, got {}",
                other
            ))),
        }
    }

    /// Reference time for series offsets, if present and valid.
    pub fn epoch(&self) -> Option<Instant> {
        self.field("epoch")?.as_str()?.parse().ok()
    }

    /// Decode the numeric array stored under `name`.
    ///
    /// Returns `None` when the field is missing, holds anything other than
    /// numbers, or has a length that is neither a triple nor a whole number
    /// of `[t, a, b, c]` records.
    pub fn components(&self, name: &str) -> Option<SampleValue> {
        let values = self
            .field(name)?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()?;
        SampleValue::from_flat(&values, self.epoch())
    }
}

impl From<Value> for RawSample<'static> {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl<'a> From<&'a Value> for RawSample<'a> {
    fn from(value: &'a Value) -> Self {
        Self::borrowed(value)
    }
}

/// Opaque context handed through ingestion untouched.
///
/// `buffer` is an auxiliary binary payload source and `source_uri` the base
/// path for any external resource a sample refers to. The resolver never
/// reads either.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleContext<'a> {
    pub buffer: Option<&'a Bytes>,
    pub source_uri: Option<&'a str>,
}

impl<'a> SampleContext<'a> {
    pub fn with_buffer(mut self, buffer: &'a Bytes) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn with_source_uri(mut self, source_uri: &'a str) -> Self {
        self.source_uri = Some(source_uri);
        self
    }
}

/// A decoded sample in its kind's native components.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Constant([f64; 3]),
    /// Time-tagged values, sorted by time with unique times
    Sampled(Vec<(Instant, [f64; 3])>),
}

impl SampleValue {
    fn from_flat(values: &[f64], epoch: Option<Instant>) -> Option<Self> {
        if values.len() == 3 {
            return Some(Self::Constant([values[0], values[1], values[2]]));
        }
        if values.is_empty() || values.len() % 4 != 0 {
            return None;
        }
        let epoch = epoch?;
        let samples = values
            .chunks_exact(4)
            .map(|c| (epoch.add_seconds(c[0]), [c[1], c[2], c[3]]))
            .collect();
        Some(Self::sampled(samples))
    }

    /// Build a series, sorting by time and keeping the last value per time.
    pub fn sampled(samples: Vec<(Instant, [f64; 3])>) -> Self {
        Self::Sampled(sort_unique(samples))
    }

    /// Apply `f` to every component triple.
    pub fn map(self, f: impl Fn([f64; 3]) -> [f64; 3]) -> Self {
        match self {
            Self::Constant(v) => Self::Constant(f(v)),
            Self::Sampled(samples) => {
                Self::Sampled(samples.into_iter().map(|(t, v)| (t, f(v))).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Constant(_) => 1,
            Self::Sampled(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold `newer` into this value.
    ///
    /// A constant replaces whatever was there. Two series merge by time,
    /// with `newer` winning at equal times, so merging a value into itself
    /// leaves it unchanged.
    pub fn merge(&mut self, newer: SampleValue) {
        match (self, newer) {
            (Self::Sampled(existing), Self::Sampled(incoming)) => {
                let mut combined = std::mem::take(existing);
                combined.extend(incoming);
                *existing = sort_unique(combined);
            }
            (this, newer) => *this = newer,
        }
    }
}

/// Sort by time, keeping the last value for each repeated time.
///
/// The sort is stable so later entries win.
fn sort_unique(mut samples: Vec<(Instant, [f64; 3])>) -> Vec<(Instant, [f64; 3])> {
    samples.sort_by_key(|(t, _)| *t);
    let mut unique: Vec<(Instant, [f64; 3])> = Vec::with_capacity(samples.len());
    for (t, v) in samples {
        match unique.last_mut() {
            Some(last) if last.0 == t => last.1 = v,
            _ => unique.push((t, v)),
        }
    }
    unique
}
