//! Storage quota configuration.

use serde::{Deserialize, Serialize};

/// Quota tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Quota ceiling assumed until the server reports one.
    #[serde(default = "default_quota_bytes")]
    pub default_quota_bytes: u64,
    /// How long a fetched usage figure stays fresh.
    #[serde(default = "default_usage_ttl")]
    pub usage_ttl_seconds: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_quota_bytes: default_quota_bytes(),
            usage_ttl_seconds: default_usage_ttl(),
        }
    }
}

// 10 GiB, matching the backend's default account quota.
fn default_quota_bytes() -> u64 {
    10 * 1024 * 1024 * 1024
}

fn default_usage_ttl() -> u64 {
    30
}
