//! HTTP time source backed by a public user directory.
//!
//! Each upstream user becomes one placeholder time record for the import
//! day. See [`HttpTimeSource::mapping_description`] for the exact mapping.

pub mod client;
pub mod types;

pub use client::HttpTimeSource;
pub use types::{UpstreamCompany, UpstreamUser, UserListResponse};
