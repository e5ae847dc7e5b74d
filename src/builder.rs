//! Resolver builder for flexible configuration
//!
//! Collects the configuration, the set of value kinds to resolve, and an
//! optional rejection hook before creating a `PositionResolver`.

use crate::config::{ExtrapolationPolicy, RebindPolicy, ResolverConfig};
use crate::error::Result;
use crate::kind::{TypeResolver, ValueKind};
use crate::resolver::{PositionResolver, RejectedSample, RejectionHook};

/// Builder for a `PositionResolver`.
///
/// ```rust
/// use spatio_dynamic::{PositionResolver, RebindPolicy, ValueKind};
///
/// let resolver = PositionResolver::builder()
///     .rebind_policy(RebindPolicy::Purge)
///     .kinds([ValueKind::Cartographic3])
///     .build()
///     .unwrap();
/// assert!(resolver.is_empty());
/// ```
pub struct ResolverBuilder {
    config: ResolverConfig,
    type_resolver: TypeResolver,
    on_rejected: Option<RejectionHook>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            type_resolver: TypeResolver::new(),
            on_rejected: None,
        }
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rebind_policy(mut self, policy: RebindPolicy) -> Self {
        self.config = self.config.with_rebind_policy(policy);
        self
    }

    pub fn extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.config = self.config.with_extrapolation(policy);
        self
    }

    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.config = self.config.with_log_rejections(enabled);
        self
    }

    /// Resolve only these kinds, in this order.
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.type_resolver = TypeResolver::with_kinds(kinds);
        self
    }

    pub fn on_rejected(
        mut self,
        hook: impl FnMut(&RejectedSample<'_>) + Send + 'static,
    ) -> Self {
        self.on_rejected = Some(Box::new(hook));
        self
    }

    /// Validate the configuration and create the resolver.
    pub fn build(self) -> Result<PositionResolver> {
        self.config.validate()?;
        Ok(PositionResolver::from_parts(
            self.config,
            self.type_resolver,
            self.on_rejected,
        ))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
