//! Subscription tiers and per-tier limits.
//!
//! The tier table is an explicit configuration object injected into
//! `TierPolicy` at construction, never a process-wide singleton, so tests
//! and deployments can supply alternate tables.

use serde::{Deserialize, Serialize};

/// Subscription tier of a workspace owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Premium,
}

impl Tier {
    /// Resolve a tier from a subscription plan id.
    ///
    /// Every missing link in the external chain (no owner, no
    /// subscription, unknown plan id) defaults to `Free`.
    pub fn from_plan_id(plan_id: Option<&str>) -> Self {
        match plan_id {
            Some("pro") => Tier::Pro,
            Some("premium") => Tier::Premium,
            _ => Tier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Premium => "premium",
        }
    }
}

/// Limits granted by one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Maximum webhook definitions per workspace.
    pub max_webhooks: u32,
    /// Ceiling on the outbound call timeout in seconds.
    pub max_timeout_seconds: u32,
    /// Maximum concurrent conversations for the team.
    pub max_conversations: u32,
}

/// The full tier → limits table.
///
/// `max_conversations` is 5 for every tier in the shipped table; the
/// value is preserved as configured and a corrected table needs no code
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub free: TierLimits,
    pub pro: TierLimits,
    pub premium: TierLimits,
}

impl TierTable {
    /// Limits for the given tier.
    pub fn limits(&self, tier: Tier) -> &TierLimits {
        match tier {
            Tier::Free => &self.free,
            Tier::Pro => &self.pro,
            Tier::Premium => &self.premium,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            free: TierLimits {
                max_webhooks: 2,
                max_timeout_seconds: 5,
                max_conversations: 5,
            },
            pro: TierLimits {
                max_webhooks: 50,
                max_timeout_seconds: 15,
                max_conversations: 5,
            },
            premium: TierLimits {
                max_webhooks: 200,
                max_timeout_seconds: 60,
                max_conversations: 5,
            },
        }
    }
}
