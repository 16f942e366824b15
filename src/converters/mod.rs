//! Format converters
//!
//! Converters between figured bass and external notation formats.

pub mod musicxml;

pub use musicxml::{read_figured_bass, write_figured_bass};
