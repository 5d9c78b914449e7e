//! Shared test utilities for the lwt-classifier workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Coordinate axis and time label helpers
//! - Synthetic pressure field generators
//! - Grid fixtures for typical dataset layouts
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, meridional_gradient};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
