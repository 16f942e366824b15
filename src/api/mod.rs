//! Figured bass WASM API
//!
//! JavaScript-facing functions. Values cross the boundary as JSON-shaped
//! objects through `serde-wasm-bindgen`.
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion
//! - `figured_bass`: parse, normalize, display, layout and MusicXML operations

pub mod figured_bass;
pub mod helpers;

pub use figured_bass::*;
