//! Pessimistic mutation coordination.
//!
//! Every state-changing intent runs `Idle → Submitting → {Applied |
//! Rejected}`. No local state changes before the server confirms;
//! `Rejected` leaves the prior view untouched and returns the typed
//! error. Mutations serialize through an async mutex — conflicts such as
//! duplicate names are resolved server-side, so there is nothing to roll
//! back locally.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use validator::ValidateEmail;

use nuvem_core::types::{FileId, FolderId};
use nuvem_core::{ApiError, ApiResult};
use nuvem_entity::{
    Download, File, FileLink, Folder, ShareGrant, SharePermission, UploadRequest,
};

use crate::hierarchy::HierarchyModel;
use crate::quota::UsageTracker;
use crate::sharing::SharingIndex;
use crate::transport::DriveTransport;

/// The mutation being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    CreateFolder,
    RenameFolder,
    RenameFile,
    DeleteFolder,
    DeleteFile,
    ShareFolder,
    UnshareFolder,
    SetVisibility,
    Upload,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateFolder => "create_folder",
            Self::RenameFolder => "rename_folder",
            Self::RenameFile => "rename_file",
            Self::DeleteFolder => "delete_folder",
            Self::DeleteFile => "delete_file",
            Self::ShareFolder => "share_folder",
            Self::UnshareFolder => "unshare_folder",
            Self::SetVisibility => "set_visibility",
            Self::Upload => "upload",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle state of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// No mutation in flight.
    Idle,
    /// Request issued, awaiting server confirmation.
    Submitting,
    /// Server confirmed; local state was reconciled.
    Applied,
    /// Server (or a client-side precondition) rejected; state untouched.
    Rejected,
}

/// Orchestrates state-changing intents against the hierarchy.
#[derive(Debug)]
pub struct MutationCoordinator {
    transport: Arc<dyn DriveTransport>,
    hierarchy: Arc<HierarchyModel>,
    sharing: Arc<SharingIndex>,
    usage: Arc<UsageTracker>,
    /// Serializes mutations; one in flight at a time.
    gate: Mutex<()>,
    last_transition: RwLock<(MutationKind, MutationState)>,
}

impl MutationCoordinator {
    /// Create a coordinator over the given collaborators.
    pub fn new(
        transport: Arc<dyn DriveTransport>,
        hierarchy: Arc<HierarchyModel>,
        sharing: Arc<SharingIndex>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            transport,
            hierarchy,
            sharing,
            usage,
            gate: Mutex::new(()),
            last_transition: RwLock::new((MutationKind::CreateFolder, MutationState::Idle)),
        }
    }

    /// The most recent `(kind, state)` transition, for UI display.
    pub async fn last_transition(&self) -> (MutationKind, MutationState) {
        *self.last_transition.read().await
    }

    async fn transition(&self, kind: MutationKind, state: MutationState) {
        debug!(mutation = %kind, state = ?state, "Mutation transition");
        *self.last_transition.write().await = (kind, state);
    }

    async fn reject<T>(&self, kind: MutationKind, err: ApiError) -> ApiResult<T> {
        warn!(mutation = %kind, code = %err.kind, "Mutation rejected");
        self.transition(kind, MutationState::Rejected).await;
        Err(err)
    }

    /// Create a folder under `parent_id` (None = root).
    ///
    /// Empty/whitespace names are rejected client-side before any request.
    /// On success the folder is appended to the current view's subfolder
    /// list when its parent is the displayed folder.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> ApiResult<Folder> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::CreateFolder, MutationState::Submitting)
            .await;

        if name.trim().is_empty() {
            return self
                .reject(
                    MutationKind::CreateFolder,
                    ApiError::invalid_name("Folder name cannot be empty"),
                )
                .await;
        }

        match self.transport.create_folder(name, parent_id).await {
            Ok(folder) => {
                self.hierarchy.append_subfolder(folder.clone()).await;
                self.hierarchy.invalidate_listing(parent_id).await;
                self.transition(MutationKind::CreateFolder, MutationState::Applied)
                    .await;
                info!(
                    folder_id = %folder.id,
                    parent_id = ?parent_id,
                    name = %folder.name,
                    "Folder created"
                );
                Ok(folder)
            }
            Err(err) => self.reject(MutationKind::CreateFolder, err).await,
        }
    }

    /// Rename a folder. The view is patched with the server's canonical
    /// name, never the locally typed one.
    pub async fn rename_folder(&self, id: FolderId, new_name: &str) -> ApiResult<Folder> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::RenameFolder, MutationState::Submitting)
            .await;

        if new_name.trim().is_empty() {
            return self
                .reject(
                    MutationKind::RenameFolder,
                    ApiError::invalid_name("Folder name cannot be empty"),
                )
                .await;
        }

        match self.transport.rename_folder(id, new_name).await {
            Ok(folder) => {
                self.hierarchy.patch_folder_name(id, &folder.name).await;
                self.hierarchy
                    .invalidate_listing(self.hierarchy.current_folder_id().await)
                    .await;
                self.transition(MutationKind::RenameFolder, MutationState::Applied)
                    .await;
                info!(folder_id = %id, new_name = %folder.name, "Folder renamed");
                Ok(folder)
            }
            Err(err) => self.reject(MutationKind::RenameFolder, err).await,
        }
    }

    /// Rename a file. When `keep_extension` is set, the transmitted name
    /// is truncated to its stem so the extension can never change
    /// client-side; the server reattaches it and returns the canonical
    /// name.
    pub async fn rename_file(
        &self,
        id: FileId,
        new_name: &str,
        keep_extension: bool,
    ) -> ApiResult<File> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::RenameFile, MutationState::Submitting)
            .await;

        let transmitted = if keep_extension {
            nuvem_entity::file::split_name(new_name).0
        } else {
            new_name
        };

        if transmitted.trim().is_empty() {
            return self
                .reject(
                    MutationKind::RenameFile,
                    ApiError::invalid_name("File name cannot be empty"),
                )
                .await;
        }

        match self
            .transport
            .rename_file(id, transmitted, keep_extension)
            .await
        {
            Ok(file) => {
                self.hierarchy.patch_file(file.clone()).await;
                self.hierarchy
                    .invalidate_listing(self.hierarchy.current_folder_id().await)
                    .await;
                self.transition(MutationKind::RenameFile, MutationState::Applied)
                    .await;
                info!(file_id = %id, new_name = %file.name, "File renamed");
                Ok(file)
            }
            Err(err) => self.reject(MutationKind::RenameFile, err).await,
        }
    }

    /// Soft-delete a folder. On success the current view is reloaded in
    /// full rather than patched.
    pub async fn delete_folder(&self, id: FolderId) -> ApiResult<()> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::DeleteFolder, MutationState::Submitting)
            .await;

        match self.transport.delete_folder(id).await {
            Ok(()) => {
                let current = self.hierarchy.current_folder_id().await;
                self.hierarchy.invalidate_listing(current).await;
                if let Err(err) = self.hierarchy.load_folder_content(current).await {
                    warn!(code = %err.kind, "View reload after folder delete failed");
                }
                self.usage.invalidate().await;
                self.transition(MutationKind::DeleteFolder, MutationState::Applied)
                    .await;
                info!(folder_id = %id, "Folder deleted");
                Ok(())
            }
            Err(err) => self.reject(MutationKind::DeleteFolder, err).await,
        }
    }

    /// Delete a file and drop it from the view in place.
    pub async fn delete_file(&self, id: FileId) -> ApiResult<()> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::DeleteFile, MutationState::Submitting)
            .await;

        match self.transport.delete_file(id).await {
            Ok(()) => {
                self.hierarchy.remove_file(id).await;
                self.hierarchy
                    .invalidate_listing(self.hierarchy.current_folder_id().await)
                    .await;
                self.usage.invalidate().await;
                self.transition(MutationKind::DeleteFile, MutationState::Applied)
                    .await;
                info!(file_id = %id, "File deleted");
                Ok(())
            }
            Err(err) => self.reject(MutationKind::DeleteFile, err).await,
        }
    }

    /// Attach a share grant to a folder. Grantee e-mail syntax is checked
    /// client-side; a duplicate grant for the same address is rejected
    /// server-side as a conflict, never merged.
    pub async fn share_folder(
        &self,
        id: FolderId,
        grantee_email: &str,
        permission: SharePermission,
    ) -> ApiResult<ShareGrant> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::ShareFolder, MutationState::Submitting)
            .await;

        if !grantee_email.validate_email() {
            return self
                .reject(
                    MutationKind::ShareFolder,
                    ApiError::invalid_email(format!("Invalid e-mail address: {grantee_email}")),
                )
                .await;
        }

        match self
            .transport
            .share_folder(id, grantee_email, permission)
            .await
        {
            Ok(grant) => {
                self.sharing.record(grant.clone());
                self.hierarchy.mark_folder_share_state(id, true).await;
                self.transition(MutationKind::ShareFolder, MutationState::Applied)
                    .await;
                info!(
                    folder_id = %id,
                    grantee = %grantee_email,
                    permission = %permission,
                    "Folder shared"
                );
                Ok(grant)
            }
            Err(err) => self.reject(MutationKind::ShareFolder, err).await,
        }
    }

    /// Remove the grant keyed by `(id, grantee_email)`. A second unshare
    /// for the same grantee surfaces the server's `ShareNotFound`, never
    /// a silent success.
    pub async fn unshare_folder(&self, id: FolderId, grantee_email: &str) -> ApiResult<()> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::UnshareFolder, MutationState::Submitting)
            .await;

        match self.transport.unshare_folder(id, grantee_email).await {
            Ok(()) => {
                self.sharing.remove(id, grantee_email);
                self.hierarchy
                    .mark_folder_share_state(id, self.sharing.is_shared_direct(id))
                    .await;
                self.transition(MutationKind::UnshareFolder, MutationState::Applied)
                    .await;
                info!(folder_id = %id, grantee = %grantee_email, "Folder unshared");
                Ok(())
            }
            Err(err) => self.reject(MutationKind::UnshareFolder, err).await,
        }
    }

    /// Toggle a file's public flag; the view is patched from the server's
    /// returned file.
    pub async fn set_file_visibility(&self, id: FileId, is_public: bool) -> ApiResult<File> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::SetVisibility, MutationState::Submitting)
            .await;

        match self.transport.set_file_visibility(id, is_public).await {
            Ok(file) => {
                self.hierarchy.patch_file(file.clone()).await;
                self.transition(MutationKind::SetVisibility, MutationState::Applied)
                    .await;
                info!(file_id = %id, is_public, "File visibility changed");
                Ok(file)
            }
            Err(err) => self.reject(MutationKind::SetVisibility, err).await,
        }
    }

    /// Upload a file. The quota pre-flight runs before any network call;
    /// it is advisory — the server still enforces authoritatively.
    pub async fn upload(&self, request: UploadRequest) -> ApiResult<File> {
        let _guard = self.gate.lock().await;
        self.transition(MutationKind::Upload, MutationState::Submitting)
            .await;

        if let Err(err) = self.usage.check_quota(request.size_bytes()).await {
            return self.reject(MutationKind::Upload, err).await;
        }

        let size = request.size_bytes();
        let target = request.folder_id;
        match self.transport.upload_file(request).await {
            Ok(file) => {
                self.hierarchy.append_file(file.clone()).await;
                self.hierarchy.invalidate_listing(target).await;
                self.usage.invalidate().await;
                self.transition(MutationKind::Upload, MutationState::Applied)
                    .await;
                info!(
                    file_id = %file.id,
                    folder_id = ?target,
                    size_bytes = size,
                    is_public = file.is_public,
                    "File uploaded"
                );
                Ok(file)
            }
            Err(err) => self.reject(MutationKind::Upload, err).await,
        }
    }

    /// Download a file's content. Read-only; bypasses the mutation gate.
    pub async fn download(&self, id: FileId) -> ApiResult<Download> {
        let download = self.transport.download_file(id).await?;
        info!(file_id = %id, bytes = download.bytes.len(), "File downloaded");
        Ok(download)
    }

    /// Create an expiring public link for a file.
    pub async fn create_file_link(
        &self,
        id: FileId,
        expires_in_seconds: Option<u64>,
        max_access: Option<u32>,
    ) -> ApiResult<FileLink> {
        let link = self
            .transport
            .create_file_link(id, expires_in_seconds, max_access)
            .await?;
        info!(file_id = %id, expires_at = ?link.expires_at, "File link created");
        Ok(link)
    }

    /// Fetch and index the grants attached to a folder, refreshing the
    /// folder's direct-share flag in the view.
    pub async fn refresh_shares(&self, id: FolderId) -> ApiResult<Vec<ShareGrant>> {
        let grants = self.transport.list_shares(id).await?;
        self.sharing.replace(id, grants.clone());
        self.hierarchy
            .mark_folder_share_state(id, !grants.is_empty())
            .await;
        Ok(grants)
    }
}
