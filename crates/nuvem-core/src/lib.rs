//! # nuvem-core
//!
//! Core crate for Nuvem Drive. Contains configuration schemas, typed
//! identifiers, shared response types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Nuvem crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{ApiError, ErrorKind};
pub use result::ApiResult;
