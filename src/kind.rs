//! Canonical value kinds and type resolution.
//!
//! Every kind has a row in a static capability table: how to decode a raw
//! sample into native components and how to convert those components into
//! each output representation. Resolution walks the kinds in priority order
//! and stops at the first one that decodes.

use crate::sample::{RawSample, SampleContext, SampleValue};
use crate::store::{StoreId, StoreRegistry};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use spatio_types::ellipsoid::Ellipsoid;
use spatio_types::point::{Cartesian3, Cartographic3};
use std::fmt;

/// A canonical representation family for positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Earth-fixed x, y, z in meters
    Cartesian3,
    /// Longitude and latitude in degrees, height in meters
    Cartographic3,
}

struct Capabilities {
    name: &'static str,
    decode: fn(&RawSample<'_>, &SampleContext<'_>) -> Option<SampleValue>,
    to_cartesian: fn([f64; 3]) -> Option<Cartesian3>,
    to_cartographic: fn([f64; 3]) -> Option<Cartographic3>,
}

// Indexed by the enum discriminant.
static CAPABILITIES: [Capabilities; 2] = [
    Capabilities {
        name: "cartesian",
        decode: decode_cartesian,
        to_cartesian: |v| Some(Cartesian3::from_array(v)),
        to_cartographic: |v| Ellipsoid::WGS84.cartesian_to_cartographic(&Cartesian3::from_array(v)),
    },
    Capabilities {
        name: "cartographic",
        decode: decode_cartographic,
        to_cartesian: |v| {
            Some(Ellipsoid::WGS84.cartographic_to_cartesian(&Cartographic3::from_array(v)))
        },
        to_cartographic: |v| Some(Cartographic3::from_array(v)),
    },
];

fn decode_cartesian(sample: &RawSample<'_>, _ctx: &SampleContext<'_>) -> Option<SampleValue> {
    sample.components("cartesian")
}

fn decode_cartographic(sample: &RawSample<'_>, _ctx: &SampleContext<'_>) -> Option<SampleValue> {
    sample.components("cartographicDegrees").or_else(|| {
        sample
            .components("cartographicRadians")
            .map(|value| value.map(|[lon, lat, h]| [lon.to_degrees(), lat.to_degrees(), h]))
    })
}

impl ValueKind {
    /// Resolution order. Earlier kinds win when a sample could decode as
    /// more than one.
    pub const PRIORITY: [ValueKind; 2] = [ValueKind::Cartesian3, ValueKind::Cartographic3];

    fn capabilities(self) -> &'static Capabilities {
        &CAPABILITIES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.capabilities().name
    }

    pub fn decode(self, sample: &RawSample<'_>, ctx: &SampleContext<'_>) -> Option<SampleValue> {
        (self.capabilities().decode)(sample, ctx)
    }

    /// Convert native components of this kind to Cartesian form.
    pub fn to_cartesian(self, native: [f64; 3]) -> Option<Cartesian3> {
        (self.capabilities().to_cartesian)(native)
    }

    /// Convert native components of this kind to Cartographic form.
    pub fn to_cartographic(self, native: [f64; 3]) -> Option<Cartographic3> {
        (self.capabilities().to_cartographic)(native)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of resolving a raw sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub kind: ValueKind,
    pub value: SampleValue,
    /// Existing store for `kind`, or `None` when one must be created
    pub store: Option<StoreId>,
}

/// Picks the canonical kind for a raw sample.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    kinds: SmallVec<[ValueKind; 2]>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self {
            kinds: SmallVec::from_buf(ValueKind::PRIORITY),
        }
    }

    /// Restrict resolution to `kinds`, tried in the given order.
    pub fn with_kinds(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        let mut unique: SmallVec<[ValueKind; 2]> = SmallVec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    pub fn kinds(&self) -> &[ValueKind] {
        &self.kinds
    }

    /// Decode `sample` with the first kind that accepts it.
    ///
    /// Returns `None` when no kind recognizes the encoding.
    pub fn resolve(
        &self,
        sample: &RawSample<'_>,
        ctx: &SampleContext<'_>,
        registry: &StoreRegistry,
    ) -> Option<Resolution> {
        self.kinds.iter().find_map(|&kind| {
            kind.decode(sample, ctx).map(|value| Resolution {
                kind,
                value,
                store: registry.find(kind),
            })
        })
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}
