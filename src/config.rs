//! Resolver configuration
//!
//! Policies that the ingestion and query paths consult. The configuration is
//! plain serde data so it can be loaded from JSON or TOML next to the rest of
//! an application's settings.

use crate::error::{DynamicError, Result};
use serde::{Deserialize, Serialize};

/// What happens to a store's accumulated data when a span is rebound to a
/// store of a different kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RebindPolicy {
    /// Keep the span's range in the old store until the span is rebound to
    /// that kind again, at which point the stale range is replaced.
    #[default]
    Retain,
    /// Drop the rebound span's range from the old store immediately.
    Purge,
}

/// How a sampled range answers instants before its first or after its last
/// sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Hold the nearest sample value.
    #[default]
    Hold,
    /// Report no value.
    None,
}

/// Resolver configuration
///
/// # Example
///
/// ```rust
/// use spatio_dynamic::{RebindPolicy, ResolverConfig};
///
/// let json = r#"{ "rebind_policy": "purge", "log_rejections": false }"#;
/// let config = ResolverConfig::from_json(json).unwrap();
/// assert_eq!(config.rebind_policy, RebindPolicy::Purge);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default)]
    pub rebind_policy: RebindPolicy,

    #[serde(default)]
    pub extrapolation: ExtrapolationPolicy,

    /// Emit a warning for every sample that could not be resolved
    #[serde(default = "ResolverConfig::default_log_rejections")]
    pub log_rejections: bool,

    /// Sample count in a single range above which accumulation logs a warning
    #[serde(default = "ResolverConfig::default_sample_warn_threshold")]
    pub sample_warn_threshold: usize,
}

impl ResolverConfig {
    const fn default_log_rejections() -> bool {
        true
    }

    const fn default_sample_warn_threshold() -> usize {
        100_000
    }

    pub fn with_rebind_policy(mut self, policy: RebindPolicy) -> Self {
        self.rebind_policy = policy;
        self
    }

    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    pub fn with_sample_warn_threshold(mut self, threshold: usize) -> Self {
        self.sample_warn_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_warn_threshold == 0 {
            return Err(DynamicError::InvalidConfig(
                "Sample warn threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ResolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ResolverConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rebind_policy: RebindPolicy::default(),
            extrapolation: ExtrapolationPolicy::default(),
            log_rejections: Self::default_log_rejections(),
            sample_warn_threshold: Self::default_sample_warn_threshold(),
        }
    }
}
