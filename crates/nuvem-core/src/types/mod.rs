//! Shared type definitions.

pub mod id;
pub mod response;

pub use id::{FileId, FolderId, ShareId, UserId};
pub use response::{ErrorBody, Outcome};
