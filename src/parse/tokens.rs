//! Token table for figured bass input
//!
//! The parser never hard-codes characters; it asks a `TokenSet` which
//! modifier, parenthesis or continuation token starts at the cursor.
//! A custom set can only add aliases on top of the canonical tokens, so
//! canonical text is accepted by every set.

use once_cell::sync::Lazy;

use crate::models::elements::{Modifier, Parenthesis};

/// Canonical modifier tokens, also used when writing normalized text
const CANONICAL_MODIFIERS: [(&str, Modifier); 8] = [
    ("bb", Modifier::DoubleFlat),
    ("b", Modifier::Flat),
    ("h", Modifier::Natural),
    ("##", Modifier::DoubleSharp),
    ("#", Modifier::Sharp),
    ("+", Modifier::Plus),
    ("\\", Modifier::Backslash),
    ("/", Modifier::Slash),
];

/// Unicode accidentals accepted on input
const UNICODE_MODIFIERS: [(&str, Modifier); 5] = [
    ("\u{1D12B}", Modifier::DoubleFlat),
    ("\u{266D}", Modifier::Flat),
    ("\u{266E}", Modifier::Natural),
    ("\u{266F}", Modifier::Sharp),
    ("\u{1D12A}", Modifier::DoubleSharp),
];

const CANONICAL_PARENTHESES: [(char, Parenthesis); 4] = [
    ('(', Parenthesis::RoundOpen),
    (')', Parenthesis::RoundClosed),
    ('[', Parenthesis::SquaredOpen),
    (']', Parenthesis::SquaredClosed),
];

/// Canonical continuation line marker
pub const CONTINUATION_TOKEN: char = '_';

/// Shared default token set
pub static DEFAULT_TOKENS: Lazy<TokenSet> = Lazy::new(TokenSet::default);

/// Token set used by the item parser
#[derive(Clone, Debug)]
pub struct TokenSet {
    /// Sorted longest token first so matching is greedy
    modifiers: Vec<(String, Modifier)>,
    parentheses: Vec<(char, Parenthesis)>,
    continuation: Vec<char>,
}

impl Default for TokenSet {
    fn default() -> Self {
        let mut set = Self {
            modifiers: Vec::new(),
            parentheses: CANONICAL_PARENTHESES.to_vec(),
            continuation: vec![CONTINUATION_TOKEN, '-'],
        };
        for (token, modifier) in CANONICAL_MODIFIERS.iter().chain(UNICODE_MODIFIERS.iter()) {
            set.push_modifier(token, *modifier);
        }
        set
    }
}

impl TokenSet {
    /// Add an input alias for a modifier (e.g. "n" for natural)
    pub fn with_modifier_alias(mut self, token: &str, modifier: Modifier) -> Self {
        if token.is_empty() || modifier == Modifier::None {
            log::warn!("ignoring empty modifier alias for {:?}", modifier);
            return self;
        }
        self.push_modifier(token, modifier);
        self
    }

    /// Add an input alias for a parenthesis
    pub fn with_parenthesis_alias(mut self, token: char, parenthesis: Parenthesis) -> Self {
        if !parenthesis.is_none() && !self.parentheses.iter().any(|(c, _)| *c == token) {
            self.parentheses.push((token, parenthesis));
        }
        self
    }

    /// Add an input alias for the continuation line
    pub fn with_continuation_alias(mut self, token: char) -> Self {
        if !self.continuation.contains(&token) {
            self.continuation.push(token);
        }
        self
    }

    fn push_modifier(&mut self, token: &str, modifier: Modifier) {
        if let Some(existing) = self.modifiers.iter_mut().find(|(t, _)| t == token) {
            existing.1 = modifier;
            return;
        }
        self.modifiers.push((token.to_string(), modifier));
        self.modifiers
            .sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    }

    /// Longest modifier token at the start of `input`, with its byte length
    pub fn match_modifier(&self, input: &str) -> Option<(Modifier, usize)> {
        self.modifiers
            .iter()
            .find(|(token, _)| input.starts_with(token.as_str()))
            .map(|(token, modifier)| (*modifier, token.len()))
    }

    /// Parenthesis token at the start of `input`, with its byte length
    pub fn match_parenthesis(&self, input: &str) -> Option<(Parenthesis, usize)> {
        let c = input.chars().next()?;
        self.parentheses
            .iter()
            .find(|(token, _)| *token == c)
            .map(|(_, parenthesis)| (*parenthesis, c.len_utf8()))
    }

    pub fn is_continuation(&self, c: char) -> bool {
        self.continuation.contains(&c)
    }
}

/// Canonical token for a modifier; empty for None
pub fn canonical_modifier(modifier: Modifier) -> &'static str {
    CANONICAL_MODIFIERS
        .iter()
        .find(|(_, m)| *m == modifier)
        .map(|(token, _)| *token)
        .unwrap_or("")
}

/// Canonical character for a parenthesis; None for an empty slot
pub fn canonical_parenthesis(parenthesis: Parenthesis) -> Option<char> {
    CANONICAL_PARENTHESES
        .iter()
        .find(|(_, p)| *p == parenthesis)
        .map(|(c, _)| *c)
}
