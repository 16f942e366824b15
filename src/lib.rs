//! Figured bass annotation engine
//!
//! Parses entered figured bass text into structured items, normalizes it,
//! builds font-specific display text and lays out figure stacks with their
//! continuation lines. Builds as a WASM module; see `api` for the
//! JavaScript-facing functions.

pub mod error;
pub mod models;
pub mod parse;
pub mod fontgen;
pub mod renderers;
pub mod timeline;
pub mod converters;
pub mod undo;
pub mod api;

// Re-export commonly used types
pub use error::{
    AnnotationError, EditError, FontConfigError, FontError, InterchangeError, LayoutError,
    MusicXmlError, ParseError,
};
pub use fontgen::{FiguredBassFont, FontRegistry};
pub use models::elements::*;
pub use models::figured_bass::{
    FiguredBass, FiguredBassItem, FiguredBassRecord, ItemProperty, Tick, TICKS_PER_QUARTER,
};
pub use models::style::FiguredBassStyle;
pub use parse::{parse_annotation, parse_item, TokenSet};
pub use renderers::{DisplayText, LayoutContext, MonospaceMeasure, StackLayout, TextMeasure};
pub use timeline::{ScoreTimeline, Timeline, TimelineEvent};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Figured bass WASM module initialized");
}

