//! # nuvem-client
//!
//! HTTP implementation of the [`nuvem_model::DriveTransport`] seam over
//! the drive REST API, plus the wire DTOs and the status-to-error
//! normalization rules.

pub mod http;
pub mod normalize;
pub mod wire;

pub use http::HttpTransport;
