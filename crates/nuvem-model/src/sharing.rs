//! Client-side index of share grants, keyed by folder id.
//!
//! The grant lists are owned here; the hierarchy only carries the derived
//! boolean flags. Direct shares are grants attached to the folder itself;
//! inherited shares are derived from an ancestor's direct share.

use dashmap::DashMap;

use nuvem_core::types::FolderId;
use nuvem_entity::{Folder, ShareGrant};

/// In-memory share grant index.
#[derive(Debug, Default)]
pub struct SharingIndex {
    /// Grants per folder. Absent key means no known grants.
    grants: DashMap<FolderId, Vec<ShareGrant>>,
}

impl SharingIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grant list for a folder with a server-returned list.
    pub fn replace(&self, folder_id: FolderId, grants: Vec<ShareGrant>) {
        if grants.is_empty() {
            self.grants.remove(&folder_id);
        } else {
            self.grants.insert(folder_id, grants);
        }
    }

    /// Record a newly created grant.
    pub fn record(&self, grant: ShareGrant) {
        self.grants.entry(grant.folder_id).or_default().push(grant);
    }

    /// Remove the grant keyed by `(folder_id, grantee_email)`. Returns
    /// whether a grant was actually removed.
    pub fn remove(&self, folder_id: FolderId, grantee_email: &str) -> bool {
        let mut removed = false;
        if let Some(mut entry) = self.grants.get_mut(&folder_id) {
            let before = entry.len();
            entry.retain(|g| g.grantee_email != grantee_email);
            removed = entry.len() < before;
        }
        // Drop empty lists so is_shared_direct goes back to false.
        self.grants
            .remove_if(&folder_id, |_, grants| grants.is_empty());
        removed
    }

    /// The grants currently known for a folder.
    pub fn grants_for(&self, folder_id: FolderId) -> Vec<ShareGrant> {
        self.grants
            .get(&folder_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Whether the folder has an explicit grant of its own.
    pub fn is_shared_direct(&self, folder_id: FolderId) -> bool {
        self.grants
            .get(&folder_id)
            .map(|entry| !entry.is_empty())
            .unwrap_or(false)
    }

    /// Whether a grant exists for the given grantee on the folder.
    pub fn has_grant(&self, folder_id: FolderId, grantee_email: &str) -> bool {
        self.grants
            .get(&folder_id)
            .map(|entry| entry.iter().any(|g| g.grantee_email == grantee_email))
            .unwrap_or(false)
    }
}

/// Mark every subfolder of a shared parent as inherited-shared. The parent
/// being `None` means the root, which can never be shared.
pub fn propagate_inherited(parent: Option<&Folder>, subfolders: &mut [Folder]) {
    let parent_shared = parent.map(Folder::is_shared).unwrap_or(false);
    if !parent_shared {
        return;
    }
    for child in subfolders {
        child.is_shared_inherited = true;
    }
}
