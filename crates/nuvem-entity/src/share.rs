//! Share grant entities and the permission model.
//!
//! The backend carries three mirrored permission booleans per grant, but
//! they were never independently settable: granting edit implied delete
//! and share. The model therefore uses a single ordered enum and maps to
//! the three legacy wire fields only at the serialization boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nuvem_core::types::{FolderId, ShareId};
use nuvem_core::ApiError;

/// Permission level carried by a share grant.
///
/// Ordered by privilege: Editor > ReadOnly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharePermission {
    /// Read-only access.
    ReadOnly,
    /// Full control: edit, delete, and re-share.
    Editor,
}

impl SharePermission {
    /// Check if this permission allows write operations.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Editor)
    }

    /// Check if this permission allows delete operations.
    pub fn can_delete(&self) -> bool {
        matches!(self, Self::Editor)
    }

    /// Check if this permission allows re-sharing.
    pub fn can_share(&self) -> bool {
        matches!(self, Self::Editor)
    }

    /// Expand into the legacy wire triple `(editar, excluir, compartilhar)`.
    pub fn to_wire_flags(&self) -> (bool, bool, bool) {
        match self {
            Self::Editor => (true, true, true),
            Self::ReadOnly => (false, false, false),
        }
    }

    /// Collapse the legacy wire triple. The edit flag alone decides the
    /// level; the other two always mirrored it in practice.
    pub fn from_wire_flags(can_edit: bool, _can_delete: bool, _can_share: bool) -> Self {
        if can_edit { Self::Editor } else { Self::ReadOnly }
    }

    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SharePermission {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read_only" | "readonly" | "viewer" => Ok(Self::ReadOnly),
            "editor" | "edit" => Ok(Self::Editor),
            _ => Err(ApiError::invalid_name(format!(
                "Invalid share permission: '{s}'"
            ))),
        }
    }
}

/// An explicit share grant attached to a folder.
///
/// Grants are keyed by `(folder_id, grantee_email)`: re-sharing with the
/// same address is rejected server-side, not merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareGrant {
    /// Unique grant identifier.
    pub id: ShareId,
    /// The folder this grant is attached to.
    pub folder_id: FolderId,
    /// The e-mail address of the grantee.
    pub grantee_email: String,
    /// Permission level granted.
    pub permission: SharePermission,
}
