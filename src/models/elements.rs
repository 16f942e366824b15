//! Element enumerations for figured bass items
//!
//! The integer codes are part of the native interchange format
//! (prefix/suffix modifier, parenthesis, digit style) and must not be
//! renumbered.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Accidental or diacritic placed before or after the digit of an item
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum Modifier {
    /// No modifier
    #[default]
    None = 0,
    /// Double flat (bb)
    DoubleFlat = 1,
    /// Flat (b)
    Flat = 2,
    /// Natural (h)
    Natural = 3,
    /// Sharp (#)
    Sharp = 4,
    /// Double sharp (##)
    DoubleSharp = 5,
    /// Plus (+), suffix only
    Plus = 6,
    /// Backslash (\), suffix only
    Backslash = 7,
    /// Slash (/), suffix only
    Slash = 8,
}

impl Modifier {
    pub const COUNT: usize = 9;

    pub const ALL: [Modifier; Modifier::COUNT] = [
        Modifier::None,
        Modifier::DoubleFlat,
        Modifier::Flat,
        Modifier::Natural,
        Modifier::Sharp,
        Modifier::DoubleSharp,
        Modifier::Plus,
        Modifier::Backslash,
        Modifier::Slash,
    ];

    /// Index into per-modifier tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Plus, backslash and slash can be drawn through the digit
    /// and are never accepted as a prefix
    pub fn is_combining(self) -> bool {
        matches!(self, Modifier::Plus | Modifier::Backslash | Modifier::Slash)
    }

    /// Whether this modifier may appear in the prefix slot
    pub fn allowed_as_prefix(self) -> bool {
        !self.is_combining()
    }

    /// A true accidental (flat family, natural, sharp family)
    pub fn is_accidental(self) -> bool {
        self != Modifier::None && !self.is_combining()
    }

    /// Key used in font configuration files
    pub fn config_name(self) -> &'static str {
        match self {
            Modifier::None => "none",
            Modifier::DoubleFlat => "double_flat",
            Modifier::Flat => "flat",
            Modifier::Natural => "natural",
            Modifier::Sharp => "sharp",
            Modifier::DoubleSharp => "double_sharp",
            Modifier::Plus => "plus",
            Modifier::Backslash => "backslash",
            Modifier::Slash => "slash",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Modifier::ALL.into_iter().find(|m| m.config_name() == name)
    }

    /// MusicXML `<prefix>`/`<suffix>` value; None has no representation
    pub fn musicxml_name(self) -> Option<&'static str> {
        match self {
            Modifier::None => None,
            Modifier::DoubleFlat => Some("flat-flat"),
            Modifier::Flat => Some("flat"),
            Modifier::Natural => Some("natural"),
            Modifier::Sharp => Some("sharp"),
            Modifier::DoubleSharp => Some("double-sharp"),
            Modifier::Plus => Some("cross"),
            Modifier::Backslash => Some("backslash"),
            Modifier::Slash => Some("slash"),
        }
    }

    /// Unknown MusicXML values map to None
    pub fn from_musicxml_name(name: &str) -> Self {
        match name.trim() {
            "flat-flat" => Modifier::DoubleFlat,
            "flat" => Modifier::Flat,
            "natural" => Modifier::Natural,
            "sharp" => Modifier::Sharp,
            "double-sharp" => Modifier::DoubleSharp,
            "cross" => Modifier::Plus,
            "backslash" => Modifier::Backslash,
            "slash" => Modifier::Slash,
            _ => Modifier::None,
        }
    }
}

/// Bracket occupying one of the five parenthesis slots of an item
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum Parenthesis {
    #[default]
    None = 0,
    RoundOpen = 1,
    RoundClosed = 2,
    SquaredOpen = 3,
    SquaredClosed = 4,
}

impl Parenthesis {
    pub const COUNT: usize = 5;

    pub const ALL: [Parenthesis; Parenthesis::COUNT] = [
        Parenthesis::None,
        Parenthesis::RoundOpen,
        Parenthesis::RoundClosed,
        Parenthesis::SquaredOpen,
        Parenthesis::SquaredClosed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_none(self) -> bool {
        self == Parenthesis::None
    }

    pub fn config_name(self) -> &'static str {
        match self {
            Parenthesis::None => "none",
            Parenthesis::RoundOpen => "round_open",
            Parenthesis::RoundClosed => "round_closed",
            Parenthesis::SquaredOpen => "squared_open",
            Parenthesis::SquaredClosed => "squared_closed",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Parenthesis::ALL.into_iter().find(|p| p.config_name() == name)
    }
}

/// Number of parenthesis slots of an item: before prefix, prefix/digit,
/// digit/suffix, suffix/continuation line, after continuation line
pub const PARENTHESIS_SLOTS: usize = 5;

/// Digit drawing style selected by the score style
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitStyle {
    #[default]
    Modern = 0,
    Historic = 1,
}

impl DigitStyle {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Glyph variant of a digit: plain, or with a combining suffix drawn through it
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigitVariant {
    Plain = 0,
    Crossed = 1,
    Backslashed = 2,
    Slashed = 3,
}

impl DigitVariant {
    pub const COUNT: usize = 4;

    pub const ALL: [DigitVariant; DigitVariant::COUNT] = [
        DigitVariant::Plain,
        DigitVariant::Crossed,
        DigitVariant::Backslashed,
        DigitVariant::Slashed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The combined variant for a combining suffix, if any
    pub fn for_suffix(suffix: Modifier) -> Option<Self> {
        match suffix {
            Modifier::Plus => Some(DigitVariant::Crossed),
            Modifier::Backslash => Some(DigitVariant::Backslashed),
            Modifier::Slash => Some(DigitVariant::Slashed),
            _ => None,
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            DigitVariant::Plain => "plain",
            DigitVariant::Crossed => "crossed",
            DigitVariant::Backslashed => "backslashed",
            DigitVariant::Slashed => "slashed",
        }
    }
}

/// Vertical stacking direction of the items of one figured bass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackAlignment {
    /// First item on top, stacking down
    #[default]
    Top,
    /// Last item at the bottom, stacking up
    Bottom,
}
