//! Transport seam consumed by the model.
//!
//! The trait is defined here, next to its consumer; `nuvem-client`
//! implements it over HTTP and integration tests implement it with a
//! scripted in-memory backend. Every method returns [`ApiResult`] — the
//! transport normalizes failures, it never panics or throws.

use std::fmt;

use async_trait::async_trait;

use nuvem_core::types::{FileId, FolderId};
use nuvem_core::ApiResult;
use nuvem_entity::{
    Download, File, FileLink, Folder, FolderContent, ShareGrant, SharePermission, StorageUsage,
    UploadRequest,
};

/// Trait for the REST backend the drive model talks to.
#[async_trait]
pub trait DriveTransport: Send + Sync + fmt::Debug + 'static {
    /// Fetch folder metadata, subfolders, and files (None = root).
    async fn fetch_folder(&self, folder_id: Option<FolderId>) -> ApiResult<FolderContent>;

    /// Create a folder under the given parent (None = root).
    async fn create_folder(&self, name: &str, parent_id: Option<FolderId>) -> ApiResult<Folder>;

    /// Rename a folder. The returned folder carries the canonical name.
    async fn rename_folder(&self, id: FolderId, new_name: &str) -> ApiResult<Folder>;

    /// Soft-delete a folder.
    async fn delete_folder(&self, id: FolderId) -> ApiResult<()>;

    /// Attach a share grant to a folder.
    async fn share_folder(
        &self,
        id: FolderId,
        grantee_email: &str,
        permission: SharePermission,
    ) -> ApiResult<ShareGrant>;

    /// Remove the grant keyed by `(id, grantee_email)`.
    async fn unshare_folder(&self, id: FolderId, grantee_email: &str) -> ApiResult<()>;

    /// List the grants attached to a folder.
    async fn list_shares(&self, id: FolderId) -> ApiResult<Vec<ShareGrant>>;

    /// Upload a file (multipart).
    async fn upload_file(&self, request: UploadRequest) -> ApiResult<File>;

    /// Download a file's content.
    async fn download_file(&self, id: FileId) -> ApiResult<Download>;

    /// Delete a file. Soft or hard is server-defined and opaque here.
    async fn delete_file(&self, id: FileId) -> ApiResult<()>;

    /// Rename a file. When `keep_extension` is set the server reattaches
    /// the original extension; the returned file carries the canonical name.
    async fn rename_file(&self, id: FileId, new_name: &str, keep_extension: bool)
    -> ApiResult<File>;

    /// Toggle the per-file public flag.
    async fn set_file_visibility(&self, id: FileId, is_public: bool) -> ApiResult<File>;

    /// Create an expiring public link for a file.
    async fn create_file_link(
        &self,
        id: FileId,
        expires_in_seconds: Option<u64>,
        max_access: Option<u32>,
    ) -> ApiResult<FileLink>;

    /// Fetch a file's metadata without its content.
    async fn file_preview(&self, id: FileId) -> ApiResult<File>;

    /// Fetch account storage usage.
    async fn storage_usage(&self) -> ApiResult<StorageUsage>;
}
