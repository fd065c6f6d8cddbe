//! Gesture and input configuration.

use serde::{Deserialize, Serialize};

/// Input handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Double-click window in milliseconds. Two clicks on the same item
    /// within this window count as an open gesture; otherwise a select.
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            double_click_ms: default_double_click_ms(),
        }
    }
}

fn default_double_click_ms() -> u64 {
    300
}
