//! Display text of a figured bass item
//!
//! Built from the glyph table of the active font. A combining suffix
//! (+, \, /) is drawn through the digit when the font has the combined glyph
//! and no parenthesis separates them. Missing glyphs fall back to plain
//! text, so display text generation never fails.

use serde::Serialize;
use std::ops::Range;

use crate::fontgen::{FiguredBassFont, FontRegistry};
use crate::models::elements::{DigitStyle, DigitVariant, Modifier, Parenthesis};
use crate::models::figured_bass::FiguredBassItem;
use crate::parse::tokens::{canonical_modifier, canonical_parenthesis};

/// Display string plus the byte range of its body glyph
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DisplayText {
    pub text: String,
    /// The digit glyph, or the prefix glyph when there is no digit.
    /// Text before it hangs left of the note, text after it hangs right.
    pub body: Range<usize>,
}

impl DisplayText {
    /// Text before the body (leading parenthesis, prefix)
    pub fn prefix_segment(&self) -> &str {
        &self.text[..self.body.start]
    }

    pub fn body_text(&self) -> &str {
        &self.text[self.body.clone()]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Display text using a font looked up by name (default font if unknown)
pub fn display_text_for(
    item: &FiguredBassItem,
    fonts: &FontRegistry,
    font_name: &str,
    style: DigitStyle,
) -> DisplayText {
    display_text(item, fonts.font_or_default(font_name), style)
}

pub fn display_text(item: &FiguredBassItem, font: &FiguredBassFont, style: DigitStyle) -> DisplayText {
    let mut text = String::new();
    let mut body = 0..0;

    push_parenthesis(&mut text, font, item.parenthesis(0));

    if item.prefix() != Modifier::None {
        let start = text.len();
        push_modifier(&mut text, font, item.prefix());
        if item.digit().is_none() {
            body = start..text.len();
        }
    }

    push_parenthesis(&mut text, font, item.parenthesis(1));

    let mut suffix_combined = false;
    if let Some(digit) = item.digit() {
        let start = text.len();
        let combined = DigitVariant::for_suffix(item.suffix())
            .filter(|_| item.parenthesis(2).is_none())
            .and_then(|variant| font.digit_glyph(style, digit, variant));
        match combined {
            Some(glyph) => {
                text.push(glyph);
                suffix_combined = true;
            }
            None => {
                let glyph = font
                    .digit_glyph(style, digit, DigitVariant::Plain)
                    .unwrap_or(char::from(b'0' + digit));
                text.push(glyph);
            }
        }
        body = start..text.len();
    }

    push_parenthesis(&mut text, font, item.parenthesis(2));

    if item.suffix() != Modifier::None && !suffix_combined {
        push_modifier(&mut text, font, item.suffix());
    }

    push_parenthesis(&mut text, font, item.parenthesis(3));

    DisplayText { text, body }
}

/// Glyph of the parenthesis drawn after the continuation line, if any
pub fn closing_glyph(item: &FiguredBassItem, font: &FiguredBassFont) -> Option<String> {
    let mut text = String::new();
    push_parenthesis(&mut text, font, item.parenthesis(4));
    (!text.is_empty()).then_some(text)
}

fn push_modifier(text: &mut String, font: &FiguredBassFont, modifier: Modifier) {
    match font.modifier_glyph(modifier) {
        Some(glyph) => text.push(glyph),
        None => {
            log::debug!("font '{}' has no glyph for {:?}", font.family, modifier);
            text.push_str(canonical_modifier(modifier));
        }
    }
}

fn push_parenthesis(text: &mut String, font: &FiguredBassFont, parenthesis: Parenthesis) {
    if parenthesis.is_none() {
        return;
    }
    if let Some(glyph) = font
        .parenthesis_glyph(parenthesis)
        .or_else(|| canonical_parenthesis(parenthesis))
    {
        text.push(glyph);
    }
}
