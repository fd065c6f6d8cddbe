//! Single-click-to-select vs double-click-to-open disambiguation.
//!
//! The drive UI does its own debouncing instead of relying on framework
//! double-click detection; the threshold is injectable so embedders can
//! match platform conventions.

use std::time::{Duration, Instant};

use nuvem_core::types::{FileId, FolderId};

/// Default double-click window.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(300);

/// What the click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Highlight the item.
    Select,
    /// Open/navigate into the item.
    Open,
}

/// What was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A folder tile (None = the root breadcrumb).
    Folder(Option<FolderId>),
    /// A file tile.
    File(FileId),
}

/// Arbitrates click gestures against the double-click window.
#[derive(Debug)]
pub struct ClickArbiter {
    threshold: Duration,
    last: Option<(ClickTarget, Instant)>,
}

impl Default for ClickArbiter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ClickArbiter {
    /// Create an arbiter with an explicit double-click window.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    /// Observe a click at the given instant. A second click on the same
    /// target within the window resolves to [`Gesture::Open`]; anything
    /// else re-arms and resolves to [`Gesture::Select`].
    pub fn observe(&mut self, target: ClickTarget, at: Instant) -> Gesture {
        match self.last {
            Some((prev, prev_at))
                if prev == target && at.duration_since(prev_at) <= self.threshold =>
            {
                self.last = None;
                Gesture::Open
            }
            _ => {
                self.last = Some((target, at));
                Gesture::Select
            }
        }
    }
}
