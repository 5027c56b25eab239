//! Integration pipeline: ports and the orchestration service

pub mod ports;
pub mod service;

pub use ports::*;
pub use service::*;
