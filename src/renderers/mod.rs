//! Renderers for figured bass
//!
//! Text, display and layout output derived from parsed items.

pub mod display_text;
pub mod layout;
pub mod normalized;

pub use display_text::{closing_glyph, display_text, display_text_for, DisplayText};
pub use layout::{
    align_offsets, compute_stack_layout, continuation_end, continuation_length, ItemLayout,
    LayoutContext, MonospaceMeasure, StackLayout, TextMeasure,
};
pub use normalized::normalized_text;
