//! Data models for figured bass annotation
//!
//! Value types shared by the parser, renderers and layout.

pub mod elements;
pub mod figured_bass;
pub mod style;

pub use elements::*;
pub use figured_bass::{FiguredBass, FiguredBassItem, FiguredBassRecord, ItemProperty, Tick, TICKS_PER_QUARTER};
pub use style::FiguredBassStyle;
