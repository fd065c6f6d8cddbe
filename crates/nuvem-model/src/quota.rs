//! Storage usage tracking against the account quota.
//!
//! Online, the server's figure is authoritative and cached with a TTL.
//! Offline, usage is approximated by summing the files already fetched
//! into the current view — an undercount (it misses everything outside
//! the loaded folder) carried over deliberately; see DESIGN.md.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use nuvem_core::{ApiError, ApiResult};
use nuvem_entity::StorageUsage;

use crate::hierarchy::HierarchyModel;
use crate::transport::DriveTransport;

struct CachedUsage {
    usage: StorageUsage,
    fetched_at: Instant,
}

/// Computes and caches storage usage against the quota ceiling.
pub struct UsageTracker {
    transport: Arc<dyn DriveTransport>,
    hierarchy: Arc<HierarchyModel>,
    offline: watch::Receiver<bool>,
    cached: RwLock<Option<CachedUsage>>,
    ttl: Duration,
    default_quota_bytes: u64,
}

impl fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageTracker")
            .field("ttl", &self.ttl)
            .field("default_quota_bytes", &self.default_quota_bytes)
            .finish_non_exhaustive()
    }
}

impl UsageTracker {
    /// Create a tracker with the given freshness TTL and fallback quota.
    pub fn new(
        transport: Arc<dyn DriveTransport>,
        hierarchy: Arc<HierarchyModel>,
        offline: watch::Receiver<bool>,
        ttl: Duration,
        default_quota_bytes: u64,
    ) -> Self {
        Self {
            transport,
            hierarchy,
            offline,
            cached: RwLock::new(None),
            ttl,
            default_quota_bytes,
        }
    }

    /// Current usage, served from cache while fresh.
    pub async fn usage(&self) -> StorageUsage {
        if *self.offline.borrow() {
            return self.local_estimate().await;
        }
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return cached.usage;
            }
        }
        self.refresh().await
    }

    /// Fetch usage from the server, falling back to the last known figure
    /// (then to local aggregation) when the fetch fails.
    pub async fn refresh(&self) -> StorageUsage {
        if *self.offline.borrow() {
            return self.local_estimate().await;
        }

        match self.transport.storage_usage().await {
            Ok(server) => {
                let quota_bytes = if server.quota_bytes > 0 {
                    server.quota_bytes
                } else {
                    self.known_quota().await
                };
                let usage = StorageUsage {
                    used_bytes: server.used_bytes,
                    quota_bytes,
                };
                *self.cached.write().await = Some(CachedUsage {
                    usage,
                    fetched_at: Instant::now(),
                });
                debug!(
                    used = usage.used_bytes,
                    quota = usage.quota_bytes,
                    "Storage usage refreshed"
                );
                usage
            }
            Err(err) => {
                warn!(code = %err.kind, "Storage usage fetch failed");
                match self.cached.read().await.as_ref() {
                    Some(cached) => cached.usage,
                    None => self.local_estimate().await,
                }
            }
        }
    }

    /// Advisory pre-flight check: fails with `QuotaExceeded` carrying the
    /// remaining capacity when `used + additional` would pass the quota.
    /// Zero additional bytes never fails. Authoritative enforcement is
    /// server-side.
    pub async fn check_quota(&self, additional_bytes: u64) -> ApiResult<()> {
        if additional_bytes == 0 {
            return Ok(());
        }
        let usage = self.usage().await;
        if usage.would_exceed(additional_bytes) {
            return Err(ApiError::quota_exceeded(usage.remaining()));
        }
        Ok(())
    }

    /// Drop the cached figure so the next read hits the server.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    /// Offline approximation: sum of the files in the current view only.
    async fn local_estimate(&self) -> StorageUsage {
        let view = self.hierarchy.current_view().await;
        let used_bytes = view.files.iter().map(|f| f.size_bytes).sum();
        StorageUsage {
            used_bytes,
            quota_bytes: self.known_quota().await,
        }
    }

    /// The last quota the server reported, or the configured default.
    async fn known_quota(&self) -> u64 {
        match self.cached.read().await.as_ref() {
            Some(cached) => cached.usage.quota_bytes,
            None => self.default_quota_bytes,
        }
    }
}
