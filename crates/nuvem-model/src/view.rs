//! The materialized view of the currently displayed folder.

use nuvem_core::types::{FolderId, UserId};
use nuvem_entity::{File, Folder, FolderContent, PathSegment};

/// Breadcrumb label for the drive root, used before the first server
/// listing arrives. Server-supplied listings carry their own root label.
pub const ROOT_LABEL: &str = "Raiz";

/// Maximum owner-label length before truncation in the ownership badge.
const BADGE_MAX_CHARS: usize = 35;

/// Client-side snapshot of one folder's contents.
///
/// Replaced atomically on every successful load; partial updates are never
/// applied. Targeted patches (create-append, rename/visibility in-place)
/// go through [`crate::hierarchy::HierarchyModel`].
#[derive(Debug, Clone)]
pub struct CurrentFolderView {
    /// The folder being displayed (None at root).
    pub folder: Option<Folder>,
    /// Child folders, in server-returned order.
    pub subfolders: Vec<Folder>,
    /// Files directly contained, in server-returned order.
    pub files: Vec<File>,
    /// Breadcrumb path from root to the current folder.
    pub path: Vec<PathSegment>,
}

impl CurrentFolderView {
    /// The initial view shown before any listing has loaded.
    pub fn empty_root() -> Self {
        Self {
            folder: None,
            subfolders: Vec::new(),
            files: Vec::new(),
            path: vec![PathSegment::root(ROOT_LABEL)],
        }
    }

    /// Build a view from a validated server listing.
    pub fn from_content(content: FolderContent) -> Self {
        Self {
            folder: content.folder,
            subfolders: content.subfolders,
            files: content.files,
            path: content.path,
        }
    }

    /// ID of the displayed folder (None at root).
    pub fn folder_id(&self) -> Option<FolderId> {
        self.folder.as_ref().map(|f| f.id)
    }

    /// Breadcrumb segments that navigate on click: every segment except
    /// the terminal one.
    pub fn navigable_segments(&self) -> &[PathSegment] {
        match self.path.len() {
            0 => &[],
            n => &self.path[..n - 1],
        }
    }

    /// The terminal, non-navigable breadcrumb segment.
    pub fn terminal_segment(&self) -> Option<&PathSegment> {
        self.path.last()
    }
}

/// Ownership badge for a shared file or folder: `"mine"` when owned by the
/// current user, otherwise the owner's label truncated to 35 characters
/// with an ellipsis. Callers gate on the item's shared flags.
pub fn owner_badge(owner_id: UserId, owner_label: &str, current_user: UserId) -> String {
    if owner_id == current_user {
        return "mine".to_string();
    }
    if owner_label.chars().count() <= BADGE_MAX_CHARS {
        owner_label.to_string()
    } else {
        let truncated: String = owner_label.chars().take(BADGE_MAX_CHARS).collect();
        format!("{truncated}…")
    }
}
