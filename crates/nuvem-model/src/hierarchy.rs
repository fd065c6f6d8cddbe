//! The hierarchy model: holds the currently-materialized folder view and
//! applies server listings to it.
//!
//! Loads are guarded by a generation counter: a response that completes
//! after a newer navigation has started is discarded rather than applied,
//! so a stale listing can never overwrite a newer view. Recently applied
//! listings are cached for offline fallback.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use nuvem_core::types::{FileId, FolderId};
use nuvem_core::{ApiError, ApiResult, ErrorKind};
use nuvem_entity::{File, Folder, FolderContent};

use crate::sharing::propagate_inherited;
use crate::transport::DriveTransport;
use crate::view::CurrentFolderView;

/// Number of folder listings retained for offline fallback.
const LISTING_CACHE_CAPACITY: u64 = 64;

/// Result of a folder load.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The listing was applied and is now the current view.
    Applied(CurrentFolderView),
    /// A newer navigation started while this load was in flight; the
    /// response was discarded and the current view left untouched.
    Superseded,
}

/// Client-side representation of the folder hierarchy.
///
/// Only this model and the mutation coordinator write to the view; the
/// execution model assumes no concurrent writers.
pub struct HierarchyModel {
    transport: Arc<dyn DriveTransport>,
    view: RwLock<CurrentFolderView>,
    last_error: RwLock<Option<ApiError>>,
    generation: AtomicU64,
    listing_cache: Cache<Option<FolderId>, FolderContent>,
    offline: watch::Receiver<bool>,
}

impl fmt::Debug for HierarchyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyModel")
            .field("transport", &self.transport)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl HierarchyModel {
    /// Create a model starting at an empty root view.
    pub fn new(transport: Arc<dyn DriveTransport>, offline: watch::Receiver<bool>) -> Self {
        Self {
            transport,
            view: RwLock::new(CurrentFolderView::empty_root()),
            last_error: RwLock::new(None),
            generation: AtomicU64::new(0),
            listing_cache: Cache::new(LISTING_CACHE_CAPACITY),
            offline,
        }
    }

    /// A snapshot of the current view.
    pub async fn current_view(&self) -> CurrentFolderView {
        self.view.read().await.clone()
    }

    /// ID of the currently displayed folder (None at root).
    pub async fn current_folder_id(&self) -> Option<FolderId> {
        self.view.read().await.folder_id()
    }

    /// The most recent load failure, kept for display until the next
    /// successful load.
    pub async fn last_error(&self) -> Option<ApiError> {
        self.last_error.read().await.clone()
    }

    /// Load the contents of a folder (None = root) and replace the view
    /// atomically on success.
    ///
    /// On failure the previous view is preserved untouched and the error
    /// recorded; while offline, a cached listing for the folder is served
    /// instead when available.
    pub async fn load_folder_content(
        &self,
        folder_id: Option<FolderId>,
    ) -> ApiResult<LoadOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(folder_id = ?folder_id, "Loading folder content");

        match self.transport.fetch_folder(folder_id).await {
            Ok(content) => {
                if content.folder_id() != folder_id || !content.path_is_consistent() {
                    let err = ApiError::new(
                        ErrorKind::UnknownApi,
                        "Server returned a listing with an inconsistent breadcrumb path",
                    );
                    warn!(folder_id = ?folder_id, "Rejected inconsistent folder listing");
                    *self.last_error.write().await = Some(err.clone());
                    return Err(err);
                }

                if self.generation.load(Ordering::SeqCst) != ticket {
                    debug!(folder_id = ?folder_id, "Discarding stale folder listing");
                    return Ok(LoadOutcome::Superseded);
                }

                self.listing_cache.insert(folder_id, content.clone()).await;
                let view = self.apply_listing(content).await;
                info!(
                    folder_id = ?folder_id,
                    subfolders = view.subfolders.len(),
                    files = view.files.len(),
                    "Folder content loaded"
                );
                Ok(LoadOutcome::Applied(view))
            }
            Err(err) => {
                warn!(folder_id = ?folder_id, code = %err.kind, "Folder load failed");
                *self.last_error.write().await = Some(err.clone());

                if *self.offline.borrow() {
                    if let Some(cached) = self.listing_cache.get(&folder_id).await {
                        if self.generation.load(Ordering::SeqCst) != ticket {
                            return Ok(LoadOutcome::Superseded);
                        }
                        info!(folder_id = ?folder_id, "Serving cached listing while offline");
                        let view = self.apply_listing(cached).await;
                        return Ok(LoadOutcome::Applied(view));
                    }
                }

                Err(err)
            }
        }
    }

    /// Replace the view with a validated listing, deriving inherited-share
    /// flags for the subfolders of a shared folder.
    async fn apply_listing(&self, mut content: FolderContent) -> CurrentFolderView {
        propagate_inherited(content.folder.as_ref(), &mut content.subfolders);
        let view = CurrentFolderView::from_content(content);
        *self.view.write().await = view.clone();
        *self.last_error.write().await = None;
        view
    }

    /// Drop the cached listing for a folder after a mutation touched it.
    pub(crate) async fn invalidate_listing(&self, folder_id: Option<FolderId>) {
        self.listing_cache.invalidate(&folder_id).await;
    }

    /// Append a freshly created subfolder, but only when its parent is the
    /// folder currently displayed.
    pub(crate) async fn append_subfolder(&self, folder: Folder) {
        let mut guard = self.view.write().await;
        if folder.parent_id == guard.folder_id() {
            guard.subfolders.push(folder);
        }
    }

    /// Patch a folder's name in place with the server's canonical name.
    pub(crate) async fn patch_folder_name(&self, id: FolderId, name: &str) {
        let mut guard = self.view.write().await;
        if let Some(sub) = guard.subfolders.iter_mut().find(|f| f.id == id) {
            sub.name = name.to_string();
        }
        if let Some(current) = guard.folder.as_mut().filter(|f| f.id == id) {
            current.name = name.to_string();
            if let Some(last) = guard.path.last_mut() {
                last.name = name.to_string();
            }
        }
    }

    /// Append an uploaded file, but only when its folder is displayed.
    pub(crate) async fn append_file(&self, file: File) {
        let mut guard = self.view.write().await;
        if file.folder_id == guard.folder_id() {
            guard.files.push(file);
        }
    }

    /// Replace a file entry in place (rename, visibility toggle).
    pub(crate) async fn patch_file(&self, file: File) {
        let mut guard = self.view.write().await;
        if let Some(slot) = guard.files.iter_mut().find(|f| f.id == file.id) {
            *slot = file;
        }
    }

    /// Remove a deleted file from the view.
    pub(crate) async fn remove_file(&self, id: FileId) {
        let mut guard = self.view.write().await;
        guard.files.retain(|f| f.id != id);
    }

    /// Update the direct-share flag of a folder visible in the view and
    /// re-derive the inherited flags of its children when it is the
    /// displayed folder.
    pub(crate) async fn mark_folder_share_state(&self, id: FolderId, direct: bool) {
        let mut guard = self.view.write().await;
        if let Some(sub) = guard.subfolders.iter_mut().find(|f| f.id == id) {
            sub.is_shared_direct = direct;
        }
        let is_current = guard.folder.as_ref().is_some_and(|f| f.id == id);
        if is_current {
            if let Some(current) = guard.folder.as_mut() {
                current.is_shared_direct = direct;
            }
            // A child inherits exactly when its parent is reachable through
            // any share, so recompute rather than only setting.
            let parent_shared = guard.folder.as_ref().is_some_and(Folder::is_shared);
            for child in &mut guard.subfolders {
                child.is_shared_inherited = parent_shared;
            }
        }
    }
}
