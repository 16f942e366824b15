//! Figured bass glyph tables
//!
//! A `FontRegistry` holds one `FiguredBassFont` per configured font family.
//! It is built once (from YAML, see `parser`) and then only read; components
//! take it by shared reference. The compiled-in registry from
//! `assets/figured_bass_fonts.yaml` is available through `FontRegistry::builtin`.

pub mod parser;

use once_cell::sync::Lazy;

use crate::error::{FontConfigError, FontError};
use crate::models::elements::{DigitStyle, DigitVariant, Modifier, Parenthesis};

const BUILTIN_FONTS_YAML: &str = include_str!("../../assets/figured_bass_fonts.yaml");

static BUILTIN: Lazy<FontRegistry> = Lazy::new(|| {
    FontRegistry::from_yaml_str(BUILTIN_FONTS_YAML).unwrap_or_else(|e| {
        log::error!("built-in figured bass font config rejected: {}", e);
        FontRegistry {
            fonts: vec![FiguredBassFont::ascii()],
        }
    })
});

type DigitTable = [[[Option<char>; DigitVariant::COUNT]; 10]; DigitStyle::COUNT];

/// Glyph table and metrics of one figured bass font
#[derive(Clone, Debug, PartialEq)]
pub struct FiguredBassFont {
    pub family: String,
    pub display_name: String,
    /// Default glyph size in points
    pub default_pitch: f64,
    /// Line height as a multiple of the glyph size
    pub default_line_height: f64,
    modifiers: [Option<char>; Modifier::COUNT],
    parentheses: [Option<char>; Parenthesis::COUNT],
    digits: DigitTable,
}

impl FiguredBassFont {
    /// A font with metrics and no glyphs
    pub fn new(family: &str, display_name: &str, default_pitch: f64, default_line_height: f64) -> Self {
        Self {
            family: family.to_string(),
            display_name: display_name.to_string(),
            default_pitch,
            default_line_height,
            modifiers: [None; Modifier::COUNT],
            parentheses: [None; Parenthesis::COUNT],
            digits: [[[None; DigitVariant::COUNT]; 10]; DigitStyle::COUNT],
        }
    }

    /// Plain ASCII table, used when nothing else is available
    pub fn ascii() -> Self {
        let mut font = Self::new("ASCII", "ASCII", 8.0, 1.0);
        for m in Modifier::ALL {
            let token = crate::parse::tokens::canonical_modifier(m);
            if token.chars().count() == 1 {
                font = font.with_modifier(m, token.chars().next().unwrap_or(' '));
            }
        }
        for p in Parenthesis::ALL {
            if let Some(c) = crate::parse::tokens::canonical_parenthesis(p) {
                font = font.with_parenthesis(p, c);
            }
        }
        for digit in 0..10u8 {
            let c = char::from(b'0' + digit);
            font = font
                .with_digit(DigitStyle::Modern, digit, DigitVariant::Plain, c)
                .with_digit(DigitStyle::Historic, digit, DigitVariant::Plain, c);
        }
        font
    }

    pub fn with_modifier(mut self, modifier: Modifier, glyph: char) -> Self {
        if modifier != Modifier::None {
            self.modifiers[modifier.index()] = Some(glyph);
        }
        self
    }

    pub fn with_parenthesis(mut self, parenthesis: Parenthesis, glyph: char) -> Self {
        if !parenthesis.is_none() {
            self.parentheses[parenthesis.index()] = Some(glyph);
        }
        self
    }

    /// Digits above 9 are ignored
    pub fn with_digit(mut self, style: DigitStyle, digit: u8, variant: DigitVariant, glyph: char) -> Self {
        if let Some(slot) = self.digits[style.index()].get_mut(digit as usize) {
            slot[variant.index()] = Some(glyph);
        }
        self
    }

    pub fn modifier_glyph(&self, modifier: Modifier) -> Option<char> {
        self.modifiers[modifier.index()]
    }

    pub fn parenthesis_glyph(&self, parenthesis: Parenthesis) -> Option<char> {
        self.parentheses[parenthesis.index()]
    }

    pub fn digit_glyph(&self, style: DigitStyle, digit: u8, variant: DigitVariant) -> Option<char> {
        self.digits[style.index()]
            .get(digit as usize)
            .and_then(|variants| variants[variant.index()])
    }

    /// Whether `name` refers to this font (family or display name)
    pub fn matches(&self, name: &str) -> bool {
        self.family == name || self.display_name == name
    }
}

/// Read-only collection of figured bass fonts, in configuration order.
/// The first font is the default.
#[derive(Clone, Debug, PartialEq)]
pub struct FontRegistry {
    fonts: Vec<FiguredBassFont>,
}

impl FontRegistry {
    /// Build a registry; it must hold at least one font and family names
    /// must be unique
    pub fn new(fonts: Vec<FiguredBassFont>) -> Result<Self, FontConfigError> {
        let mut errors = Vec::new();
        if fonts.is_empty() {
            errors.push("no fonts defined".to_string());
        }
        for (i, font) in fonts.iter().enumerate() {
            if fonts[..i].iter().any(|f| f.family == font.family) {
                errors.push(format!("duplicate font family '{}'", font.family));
            }
        }
        if !errors.is_empty() {
            return Err(FontConfigError::Invalid(errors));
        }
        Ok(Self { fonts })
    }

    /// The compiled-in registry
    pub fn builtin() -> &'static FontRegistry {
        &BUILTIN
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Display names of all fonts, in configuration order
    pub fn font_names(&self) -> Vec<&str> {
        self.fonts.iter().map(|f| f.display_name.as_str()).collect()
    }

    pub fn font_at(&self, idx: usize) -> Option<&FiguredBassFont> {
        self.fonts.get(idx)
    }

    pub fn font(&self, name: &str) -> Result<&FiguredBassFont, FontError> {
        self.fonts
            .iter()
            .find(|f| f.matches(name))
            .ok_or_else(|| FontError::UnknownFont(name.to_string()))
    }

    pub fn default_font(&self) -> &FiguredBassFont {
        &self.fonts[0]
    }

    /// Look up `name`, falling back to the default font
    pub fn font_or_default(&self, name: &str) -> &FiguredBassFont {
        match self.font(name) {
            Ok(font) => font,
            Err(e) => {
                log::warn!("{}; using '{}'", e, self.default_font().family);
                self.default_font()
            }
        }
    }
}
