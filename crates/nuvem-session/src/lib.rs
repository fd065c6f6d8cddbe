//! # nuvem-session
//!
//! Session persistence and connectivity state: the passphrase-encrypted
//! session vault and the offline flag other components subscribe to.

pub mod offline;
pub mod vault;

pub use offline::OfflineMonitor;
pub use vault::{SessionVault, StoredSession};
