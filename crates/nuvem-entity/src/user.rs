//! User profile entity.

use serde::{Deserialize, Serialize};

use nuvem_core::types::UserId;

/// The authenticated user's profile, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: UserId,
    /// E-mail address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL, when set.
    pub avatar_url: Option<String>,
}
