//! # Opwar Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Sample weapon profiles, unit templates and leaders
//! - Ready-built units for scenario tests
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
