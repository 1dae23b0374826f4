//! # Opwar Development Tools
//!
//! Command-line tools for content authors:
//! - Data validators for weapon profiles and unit templates
//! - Unit inspection (spawn a template and dump its save record)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod data;
pub mod error;
pub mod inspect;
pub mod validate;
