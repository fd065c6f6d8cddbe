//! File entity model, upload/download value objects, and expiring links.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nuvem_core::types::{FileId, FolderId, UserId};

/// A file stored in the drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Full display name, including extension.
    pub name: String,
    /// Containing folder (None when directly under the root).
    pub folder_id: Option<FolderId>,
    /// The identity that uploaded the file.
    pub owner_id: UserId,
    /// Owner's display label (e-mail or name) for badge rendering.
    pub owner_email: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type as reported by the server (absent for unknown types).
    pub mime_type: Option<String>,
    /// Per-file public/private toggle, independent of folder sharing.
    pub is_public: bool,
    /// True if reachable via a shared ancestor folder or a direct file
    /// share. Derived server-side; read-only on the client.
    pub is_shared_transitively: bool,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// The name without its extension.
    pub fn stem(&self) -> &str {
        split_name(&self.name).0
    }

    /// The extension after the final dot, if any. A leading-dot name like
    /// `.bashrc` has no extension.
    pub fn extension(&self) -> Option<&str> {
        split_name(&self.name).1
    }
}

/// Split a file name into `(stem, extension)`.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Everything needed to issue an upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name of the file being uploaded.
    pub file_name: String,
    /// Raw content.
    pub bytes: Bytes,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Whether the file starts out public.
    pub is_public: bool,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Target folder (None for the root).
    pub folder_id: Option<FolderId>,
}

impl UploadRequest {
    /// Size of the payload in bytes, used for the pre-flight quota check.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A downloaded file body.
#[derive(Debug, Clone)]
pub struct Download {
    /// File name parsed from `Content-Disposition`, when present.
    pub file_name: Option<String>,
    /// Raw content.
    pub bytes: Bytes,
}

/// An expiring public link to a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLink {
    /// The shareable URL.
    pub share_url: String,
    /// When the link stops working (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of accesses (None = unlimited).
    pub max_access: Option<u32>,
}
