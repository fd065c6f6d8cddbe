//! # nuvem-model
//!
//! The client-side drive model: the materialized view of one folder's
//! contents, the sharing permission model, the pessimistic mutation
//! coordinator, and the quota tracker.
//!
//! All network I/O goes through the [`transport::DriveTransport`] seam;
//! `nuvem-client` provides the HTTP implementation, tests provide scripted
//! fakes.

pub mod classify;
pub mod gesture;
pub mod hierarchy;
pub mod mutation;
pub mod quota;
pub mod sharing;
pub mod transport;
pub mod view;

pub use classify::{classify_files_by_kind, classify_mime, FileBuckets, FileKind};
pub use gesture::{ClickArbiter, ClickTarget, Gesture};
pub use hierarchy::{HierarchyModel, LoadOutcome};
pub use mutation::{MutationCoordinator, MutationKind, MutationState};
pub use quota::UsageTracker;
pub use sharing::SharingIndex;
pub use transport::DriveTransport;
pub use view::{owner_badge, CurrentFolderView};
