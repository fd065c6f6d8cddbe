//! Session vault configuration.

use serde::{Deserialize, Serialize};

/// Encrypted session storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the encrypted session vault file.
    #[serde(default = "default_vault_path")]
    pub vault_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
        }
    }
}

fn default_vault_path() -> String {
    "data/session.vault".to_string()
}
