//! # Payline application
//!
//! Wires the hexagonal layers together:
//! - [`AppContext`] builds every adapter from a [`payline_domain::Config`]
//! - `main.rs` runs the background scheduler until interrupted

pub mod context;

pub use context::*;
