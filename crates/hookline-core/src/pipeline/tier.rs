//! Subscription tier policy.
//!
//! Pure lookups against an injected limits table. The table ships with
//! defaults but deployments may override it through configuration, so
//! nothing here hardcodes a number outside the table itself.

use hookline_types::tier::{Tier, TierLimits, TierTable};

/// Resolves per-tier limits for webhook creation and dispatch.
#[derive(Debug, Clone, Default)]
pub struct TierPolicy {
    table: TierTable,
}

impl TierPolicy {
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    pub fn limits(&self, tier: Tier) -> &TierLimits {
        self.table.limits(tier)
    }

    /// Effective request timeout in seconds.
    ///
    /// An explicit request is clamped to the tier ceiling; absence of a
    /// request means the full ceiling, not a lower default.
    pub fn resolve_timeout(&self, tier: Tier, requested: Option<u32>) -> u32 {
        let max = self.limits(tier).max_timeout_seconds;
        match requested {
            Some(r) => r.min(max),
            None => max,
        }
    }

    /// Whether a workspace with `current_count` webhooks may create another.
    pub fn can_create_webhook(&self, tier: Tier, current_count: u32) -> bool {
        current_count < self.limits(tier).max_webhooks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
