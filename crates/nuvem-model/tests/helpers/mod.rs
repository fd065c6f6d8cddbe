//! Shared test helpers: a scripted in-memory backend and builders.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{watch, Notify};

use nuvem_core::types::{FileId, FolderId, ShareId, UserId};
use nuvem_core::{ApiError, ApiResult, ErrorKind};
use nuvem_entity::{
    Download, File, FileLink, Folder, FolderContent, PathSegment, ShareGrant, SharePermission,
    StorageUsage, UploadRequest,
};
use nuvem_model::{
    HierarchyModel, MutationCoordinator, SharingIndex, UsageTracker,
};

/// Default quota used by the fake backend: 10 GiB.
pub const TEST_QUOTA: u64 = 10 * 1024 * 1024 * 1024;

/// Scripted in-memory implementation of the transport seam.
#[derive(Debug)]
pub struct FakeBackend {
    listings: Mutex<HashMap<Option<FolderId>, FolderContent>>,
    files: Mutex<HashMap<FileId, File>>,
    contents: Mutex<HashMap<FileId, Bytes>>,
    shares: Mutex<HashMap<FolderId, Vec<ShareGrant>>>,
    usage: Mutex<StorageUsage>,
    fetch_error: Mutex<Option<ApiError>>,
    delete_folder_error: Mutex<Option<ApiError>>,
    hold_fetch: Mutex<HashMap<Option<FolderId>, Arc<Notify>>>,
    pub fetch_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub usage_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listings: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            contents: Mutex::new(HashMap::new()),
            shares: Mutex::new(HashMap::new()),
            usage: Mutex::new(StorageUsage {
                used_bytes: 0,
                quota_bytes: TEST_QUOTA,
            }),
            fetch_error: Mutex::new(None),
            delete_folder_error: Mutex::new(None),
            hold_fetch: Mutex::new(HashMap::new()),
            fetch_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            usage_calls: AtomicUsize::new(0),
        })
    }

    /// Script the listing returned for a folder.
    pub fn seed_listing(&self, folder_id: Option<FolderId>, content: FolderContent) {
        self.listings.lock().unwrap().insert(folder_id, content);
    }

    /// Register a file so file-level operations can find it.
    pub fn seed_file(&self, file: File) {
        self.files.lock().unwrap().insert(file.id, file);
    }

    pub fn seed_file_content(&self, id: FileId, bytes: Bytes) {
        self.contents.lock().unwrap().insert(id, bytes);
    }

    pub fn set_usage(&self, used_bytes: u64, quota_bytes: u64) {
        *self.usage.lock().unwrap() = StorageUsage {
            used_bytes,
            quota_bytes,
        };
    }

    /// Make every subsequent fetch fail with the given error.
    pub fn fail_fetches(&self, err: ApiError) {
        *self.fetch_error.lock().unwrap() = Some(err);
    }

    pub fn clear_fetch_error(&self) {
        *self.fetch_error.lock().unwrap() = None;
    }

    /// Make the next folder delete fail with the given error.
    pub fn fail_delete_folder(&self, err: ApiError) {
        *self.delete_folder_error.lock().unwrap() = Some(err);
    }

    /// Hold the next fetch of `folder_id` until the returned handle is
    /// notified, so tests can interleave a second navigation.
    pub fn hold_next_fetch(&self, folder_id: Option<FolderId>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.hold_fetch
            .lock()
            .unwrap()
            .insert(folder_id, gate.clone());
        gate
    }

    pub fn grants_on_server(&self, folder_id: FolderId) -> Vec<ShareGrant> {
        self.shares
            .lock()
            .unwrap()
            .get(&folder_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl nuvem_model::DriveTransport for FakeBackend {
    async fn fetch_folder(&self, folder_id: Option<FolderId>) -> ApiResult<FolderContent> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.hold_fetch.lock().unwrap().remove(&folder_id);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(err) = self.fetch_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.listings
            .lock()
            .unwrap()
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| ApiError::from_kind(ErrorKind::FolderNotFound))
    }

    async fn create_folder(&self, name: &str, parent_id: Option<FolderId>) -> ApiResult<Folder> {
        // The server canonicalizes by trimming surrounding whitespace.
        Ok(folder_under(name.trim(), parent_id))
    }

    async fn rename_folder(&self, id: FolderId, new_name: &str) -> ApiResult<Folder> {
        let mut folder = folder_under(new_name.trim(), None);
        folder.id = id;
        Ok(folder)
    }

    async fn delete_folder(&self, _id: FolderId) -> ApiResult<()> {
        match self.delete_folder_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn share_folder(
        &self,
        id: FolderId,
        grantee_email: &str,
        permission: SharePermission,
    ) -> ApiResult<ShareGrant> {
        let mut shares = self.shares.lock().unwrap();
        let grants = shares.entry(id).or_default();
        if grants.iter().any(|g| g.grantee_email == grantee_email) {
            return Err(ApiError::conflict("Folder is already shared with this user"));
        }
        let grant = ShareGrant {
            id: ShareId::new(),
            folder_id: id,
            grantee_email: grantee_email.to_string(),
            permission,
        };
        grants.push(grant.clone());
        Ok(grant)
    }

    async fn unshare_folder(&self, id: FolderId, grantee_email: &str) -> ApiResult<()> {
        let mut shares = self.shares.lock().unwrap();
        let Some(grants) = shares.get_mut(&id) else {
            return Err(ApiError::from_kind(ErrorKind::ShareNotFound));
        };
        let before = grants.len();
        grants.retain(|g| g.grantee_email != grantee_email);
        if grants.len() == before {
            return Err(ApiError::from_kind(ErrorKind::ShareNotFound));
        }
        Ok(())
    }

    async fn list_shares(&self, id: FolderId) -> ApiResult<Vec<ShareGrant>> {
        Ok(self.grants_on_server(id))
    }

    async fn upload_file(&self, request: UploadRequest) -> ApiResult<File> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let file = File {
            id: FileId::new(),
            name: request.file_name.clone(),
            folder_id: request.folder_id,
            owner_id: UserId::new(),
            owner_email: None,
            size_bytes: request.size_bytes(),
            mime_type: request.mime_type.clone(),
            is_public: request.is_public,
            is_shared_transitively: false,
            created_at: Utc::now(),
        };
        self.contents
            .lock()
            .unwrap()
            .insert(file.id, request.bytes.clone());
        self.files.lock().unwrap().insert(file.id, file.clone());
        Ok(file)
    }

    async fn download_file(&self, id: FileId) -> ApiResult<Download> {
        let bytes = self
            .contents
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::from_kind(ErrorKind::FileNotFound))?;
        let file_name = self.files.lock().unwrap().get(&id).map(|f| f.name.clone());
        Ok(Download { file_name, bytes })
    }

    async fn delete_file(&self, id: FileId) -> ApiResult<()> {
        match self.files.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::from_kind(ErrorKind::FileNotFound)),
        }
    }

    async fn rename_file(
        &self,
        id: FileId,
        new_name: &str,
        keep_extension: bool,
    ) -> ApiResult<File> {
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(&id)
            .ok_or_else(|| ApiError::from_kind(ErrorKind::FileNotFound))?;
        file.name = if keep_extension {
            match nuvem_entity::file::split_name(&file.name).1 {
                Some(ext) => format!("{new_name}.{ext}"),
                None => new_name.to_string(),
            }
        } else {
            new_name.to_string()
        };
        Ok(file.clone())
    }

    async fn set_file_visibility(&self, id: FileId, is_public: bool) -> ApiResult<File> {
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(&id)
            .ok_or_else(|| ApiError::from_kind(ErrorKind::FileNotFound))?;
        file.is_public = is_public;
        Ok(file.clone())
    }

    async fn create_file_link(
        &self,
        id: FileId,
        expires_in_seconds: Option<u64>,
        max_access: Option<u32>,
    ) -> ApiResult<FileLink> {
        if !self.files.lock().unwrap().contains_key(&id) {
            return Err(ApiError::from_kind(ErrorKind::FileNotFound));
        }
        let expires_at =
            expires_in_seconds.map(|s| Utc::now() + chrono::Duration::seconds(s as i64));
        Ok(FileLink {
            share_url: format!("https://drive.test/s/{id}"),
            expires_at,
            max_access,
        })
    }

    async fn file_preview(&self, id: FileId) -> ApiResult<File> {
        self.files
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::from_kind(ErrorKind::FileNotFound))
    }

    async fn storage_usage(&self) -> ApiResult<StorageUsage> {
        self.usage_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.usage.lock().unwrap())
    }
}

/// A fully wired model stack over a [`FakeBackend`].
pub struct TestStack {
    pub backend: Arc<FakeBackend>,
    pub hierarchy: Arc<HierarchyModel>,
    pub sharing: Arc<SharingIndex>,
    pub usage: Arc<UsageTracker>,
    pub coordinator: MutationCoordinator,
    pub offline: watch::Sender<bool>,
}

impl TestStack {
    pub fn new() -> Self {
        let backend = FakeBackend::new();
        let (offline, offline_rx) = watch::channel(false);
        let hierarchy = Arc::new(HierarchyModel::new(backend.clone(), offline_rx.clone()));
        let sharing = Arc::new(SharingIndex::new());
        let usage = Arc::new(UsageTracker::new(
            backend.clone(),
            hierarchy.clone(),
            offline_rx,
            Duration::from_secs(30),
            TEST_QUOTA,
        ));
        let coordinator = MutationCoordinator::new(
            backend.clone(),
            hierarchy.clone(),
            sharing.clone(),
            usage.clone(),
        );
        Self {
            backend,
            hierarchy,
            sharing,
            usage,
            coordinator,
            offline,
        }
    }
}

pub fn folder_under(name: &str, parent_id: Option<FolderId>) -> Folder {
    Folder {
        id: FolderId::new(),
        name: name.to_string(),
        parent_id,
        owner_id: UserId::new(),
        owner_email: None,
        is_shared_direct: false,
        is_shared_inherited: false,
        deleted_at: None,
        created_at: Utc::now(),
    }
}

pub fn file_in(name: &str, folder_id: Option<FolderId>, size_bytes: u64) -> File {
    File {
        id: FileId::new(),
        name: name.to_string(),
        folder_id,
        owner_id: UserId::new(),
        owner_email: None,
        size_bytes,
        mime_type: None,
        is_public: false,
        is_shared_transitively: false,
        created_at: Utc::now(),
    }
}

/// A root listing with the given children.
pub fn root_listing(subfolders: Vec<Folder>, files: Vec<File>) -> FolderContent {
    FolderContent {
        folder: None,
        subfolders,
        files,
        path: vec![PathSegment::root("Raiz")],
    }
}

/// A listing for a non-root folder, with a consistent two-segment path.
pub fn folder_listing(folder: Folder, subfolders: Vec<Folder>, files: Vec<File>) -> FolderContent {
    let path = vec![
        PathSegment::root("Raiz"),
        PathSegment {
            id: Some(folder.id),
            name: folder.name.clone(),
        },
    ];
    FolderContent {
        folder: Some(folder),
        subfolders,
        files,
        path,
    }
}
