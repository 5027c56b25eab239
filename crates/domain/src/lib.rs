//! # Payline Domain
//!
//! Business domain types and models for Payline.
//!
//! This crate contains:
//! - Time records, run log entries and the failed-export queue model
//! - Derived payroll values (summaries, metrics, health reports)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Payline crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
