//! # nuvem-entity
//!
//! Domain entity models for Nuvem Drive: folders, files, share grants,
//! user profiles, and storage usage. Pure data — no I/O.

pub mod file;
pub mod folder;
pub mod quota;
pub mod share;
pub mod user;

pub use file::{Download, File, FileLink, UploadRequest};
pub use folder::{Folder, FolderContent, PathSegment};
pub use quota::StorageUsage;
pub use share::{ShareGrant, SharePermission};
pub use user::UserProfile;
