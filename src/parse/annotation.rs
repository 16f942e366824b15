//! Multi-line figured bass annotation parsing
//!
//! Each non-blank line becomes one item. Parsing is all-or-nothing: the
//! first failing line aborts the whole annotation.

use crate::error::AnnotationError;
use crate::models::figured_bass::{FiguredBass, FiguredBassItem};
use crate::parse::item::parse_item_with;
use crate::parse::tokens::{TokenSet, DEFAULT_TOKENS};

/// Split entered text on line breaks (`\n`, `\r\n`, `\r`), keeping the
/// original line index of every non-blank line
pub fn split_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .flat_map(|line| line.split('\r'))
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect()
}

/// Parse every line of `text` into items, numbered in stacking order
pub fn parse_annotation(text: &str) -> Result<Vec<FiguredBassItem>, AnnotationError> {
    parse_annotation_with(text, &DEFAULT_TOKENS)
}

pub fn parse_annotation_with(
    text: &str,
    tokens: &TokenSet,
) -> Result<Vec<FiguredBassItem>, AnnotationError> {
    let mut items = Vec::new();
    for (line, raw) in split_lines(text) {
        let mut item =
            parse_item_with(raw, tokens).map_err(|source| AnnotationError { line, source })?;
        item.order = items.len();
        items.push(item);
    }
    Ok(items)
}

/// Parse entered text into a detached figured bass, falling back to
/// literal text when any line is invalid
pub fn parse_figured_bass(text: &str) -> FiguredBass {
    FiguredBass::from_text(0, 0, 0, text)
}
