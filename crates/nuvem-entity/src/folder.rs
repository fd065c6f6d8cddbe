//! Folder entity model and server-authoritative folder listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nuvem_core::types::{FolderId, UserId};

/// A folder in the drive hierarchy.
///
/// The root is never materialized as a `Folder`; use `Option<FolderId>`
/// with `None` at call sites that may refer to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name, unique among siblings under the same parent.
    pub name: String,
    /// Parent folder ID (None for folders directly under the root).
    pub parent_id: Option<FolderId>,
    /// The identity that created the folder. Never changes.
    pub owner_id: UserId,
    /// Owner's display label (e-mail or name) for badge rendering.
    pub owner_email: Option<String>,
    /// True if this folder carries an explicit share grant of its own.
    pub is_shared_direct: bool,
    /// True if a share grant exists on an ancestor.
    pub is_shared_inherited: bool,
    /// Soft-delete marker; set means the folder is logically removed.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Whether the folder is reachable through any share, direct or inherited.
    pub fn is_shared(&self) -> bool {
        self.is_shared_direct || self.is_shared_inherited
    }

    /// Whether the folder has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One breadcrumb segment of a folder path.
///
/// `id == None` is the root sentinel. A segment is navigable iff it is not
/// the terminal segment of its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Folder ID, or None for the root.
    pub id: Option<FolderId>,
    /// Display name of the segment.
    pub name: String,
}

impl PathSegment {
    /// The root sentinel segment with the server's root label.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            id: None,
            name: label.into(),
        }
    }
}

/// The contents of one folder as returned by the server.
///
/// Ordering of `subfolders` and `files` is the server's returned order and
/// must be preserved. The `path` is server-supplied; the client never
/// reconstructs multi-level ancestry itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContent {
    /// The folder being listed (None at root).
    pub folder: Option<Folder>,
    /// Direct child folders.
    pub subfolders: Vec<Folder>,
    /// Files directly contained.
    pub files: Vec<super::file::File>,
    /// Breadcrumb path from root to the listed folder, inclusive.
    pub path: Vec<PathSegment>,
}

impl FolderContent {
    /// ID of the listed folder (None at root).
    pub fn folder_id(&self) -> Option<FolderId> {
        self.folder.as_ref().map(|f| f.id)
    }

    /// Whether the path terminates at the listed folder (or is the single
    /// root sentinel when at root). Listings violating this are rejected
    /// before being applied to the view.
    pub fn path_is_consistent(&self) -> bool {
        match self.path.last() {
            None => false,
            Some(last) => last.id == self.folder_id(),
        }
    }
}
