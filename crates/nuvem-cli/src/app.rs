//! Application context wiring.
//!
//! All state is built here once per invocation and passed down explicitly;
//! there are no ambient singletons. Logout tears the vault down without
//! constructing the rest of the stack.

use std::sync::Arc;
use std::time::Duration;

use dialoguer::Password;

use nuvem_client::HttpTransport;
use nuvem_core::config::AppConfig;
use nuvem_core::{ApiError, ApiResult, ErrorKind};
use nuvem_model::{HierarchyModel, MutationCoordinator, SharingIndex, UsageTracker};
use nuvem_session::{OfflineMonitor, SessionVault, StoredSession};

use crate::output;

/// Everything a command needs, constructed once at startup.
pub struct App {
    pub config: AppConfig,
    pub transport: Arc<HttpTransport>,
    pub hierarchy: Arc<HierarchyModel>,
    pub sharing: Arc<SharingIndex>,
    pub usage: Arc<UsageTracker>,
    pub coordinator: MutationCoordinator,
    pub vault: SessionVault,
    pub offline: OfflineMonitor,
    pub session: StoredSession,
}

impl App {
    /// Build the full stack: vault session, authenticated transport, and
    /// the drive model.
    pub async fn init(config: AppConfig) -> ApiResult<Self> {
        let vault = SessionVault::new(&config.session);

        let passphrase = prompt_passphrase()?;
        let session = vault.load(&passphrase)?.ok_or_else(|| {
            ApiError::session("No stored session found; log in from the drive application first")
        })?;

        let transport = Arc::new(HttpTransport::new(&config.api)?);
        transport
            .set_token(Some(session.bearer_token.clone()))
            .await;

        let offline = OfflineMonitor::new();
        let hierarchy = Arc::new(HierarchyModel::new(transport.clone(), offline.subscribe()));
        let sharing = Arc::new(SharingIndex::new());
        let usage = Arc::new(UsageTracker::new(
            transport.clone(),
            hierarchy.clone(),
            offline.subscribe(),
            Duration::from_secs(config.quota.usage_ttl_seconds),
            config.quota.default_quota_bytes,
        ));
        let coordinator = MutationCoordinator::new(
            transport.clone(),
            hierarchy.clone(),
            sharing.clone(),
            usage.clone(),
        );

        Ok(Self {
            config,
            transport,
            hierarchy,
            sharing,
            usage,
            coordinator,
            vault,
            offline,
            session,
        })
    }

    /// Session-expiry handling: a 401 from any call clears the vault so
    /// the next invocation starts from a clean state.
    pub fn handle_session_expiry(&self, err: &ApiError) {
        if err.kind == ErrorKind::Unauthorized {
            if let Err(clear_err) = self.vault.clear() {
                output::print_warning(&format!(
                    "Session expired, but the vault could not be cleared: {}",
                    clear_err.message
                ));
                return;
            }
            output::print_warning("Session expired; stored session cleared. Log in again.");
        }
    }
}

/// Clear the vault without touching the network. Used by `logout`.
pub fn logout(config: &AppConfig) -> ApiResult<()> {
    SessionVault::new(&config.session).clear()?;
    output::print_success("Logged out; stored session cleared.");
    Ok(())
}

fn prompt_passphrase() -> ApiResult<String> {
    Password::new()
        .with_prompt("Vault passphrase")
        .interact()
        .map_err(|e| ApiError::session(format!("Could not read passphrase: {e}")))
}
