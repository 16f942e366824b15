//! Single-line figured bass item parser
//!
//! A line is consumed left to right through fixed slots:
//!
//! ```text
//! [paren] [prefix] [paren] [digit] [paren] [suffix] [paren] [cont. line] [paren]
//! ```
//!
//! Every slot is optional. An unmatched slot keeps its empty value and does not
//! move the cursor. Parentheses are taken verbatim; matching open and closed
//! brackets is left to the user.

use crate::error::ParseError;
use crate::models::elements::{Modifier, Parenthesis};
use crate::models::figured_bass::FiguredBassItem;
use crate::parse::tokens::{TokenSet, DEFAULT_TOKENS};

/// Parse one line with the default token set
pub fn parse_item(line: &str) -> Result<FiguredBassItem, ParseError> {
    parse_item_with(line, &DEFAULT_TOKENS)
}

/// Parse one line with a custom token set
pub fn parse_item_with(line: &str, tokens: &TokenSet) -> Result<FiguredBassItem, ParseError> {
    let mut cursor = Cursor::new(line, tokens);
    let mut item = FiguredBassItem::default();

    item.parentheses[0] = cursor.parenthesis();

    let prefix_column = cursor.column_after_whitespace();
    item.prefix = cursor.modifier()?;
    if !item.prefix.allowed_as_prefix() {
        return Err(ParseError::MalformedToken {
            column: prefix_column,
            found: crate::parse::tokens::canonical_modifier(item.prefix).to_string(),
        });
    }

    item.parentheses[1] = cursor.parenthesis();
    item.digit = cursor.digit()?;
    item.parentheses[2] = cursor.parenthesis();
    item.suffix = cursor.modifier()?;
    item.parentheses[3] = cursor.parenthesis();
    item.continuation_line = cursor.continuation();
    item.parentheses[4] = cursor.parenthesis();

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(ParseError::TrailingGarbage {
            column: cursor.column(),
            rest: cursor.rest().to_string(),
        });
    }

    normalize_parentheses(&mut item);
    item.check_fields()?;

    log::debug!("parsed figured bass item '{}' -> {:?}", line, item);
    Ok(item)
}

/// Move parentheses that border an absent part onto the following slot,
/// so that equivalent inputs produce the same item
fn normalize_parentheses(item: &mut FiguredBassItem) {
    let p = &mut item.parentheses;
    if item.prefix == Modifier::None && p[1].is_none() {
        p[1] = p[0];
        p[0] = Parenthesis::None;
    }
    if item.digit.is_none() && p[2].is_none() {
        p[2] = p[1];
        p[1] = Parenthesis::None;
    }
    if !item.continuation_line && p[4].is_none() {
        p[4] = p[3];
        p[3] = Parenthesis::None;
    }
    if item.suffix == Modifier::None && p[3].is_none() {
        p[3] = p[2];
        p[2] = Parenthesis::None;
    }
}

struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    tokens: &'a TokenSet,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, tokens: &'a TokenSet) -> Self {
        Self { line, pos: 0, tokens }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Column in characters, for error reporting
    fn column(&self) -> usize {
        self.line[..self.pos].chars().count()
    }

    fn column_after_whitespace(&mut self) -> usize {
        self.skip_whitespace();
        self.column()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn parenthesis(&mut self) -> Parenthesis {
        self.skip_whitespace();
        match self.tokens.match_parenthesis(self.rest()) {
            Some((parenthesis, len)) => {
                self.pos += len;
                parenthesis
            }
            None => Parenthesis::None,
        }
    }

    /// One modifier token; a second modifier token right after it is an error
    fn modifier(&mut self) -> Result<Modifier, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let column = self.column();
        let Some((modifier, len)) = self.tokens.match_modifier(self.rest()) else {
            return Ok(Modifier::None);
        };
        self.pos += len;

        if let Some((_, next_len)) = self.tokens.match_modifier(self.rest()) {
            return Err(ParseError::MalformedToken {
                column,
                found: self.line[start..self.pos + next_len].to_string(),
            });
        }
        Ok(modifier)
    }

    fn digit(&mut self) -> Result<Option<u8>, ParseError> {
        self.skip_whitespace();
        let column = self.column();
        let mut chars = self.rest().chars();
        let digit = match chars.next().and_then(|c| c.to_digit(10)) {
            Some(d) => d as u8,
            None => return Ok(None),
        };
        if let Some(next) = chars.next().filter(char::is_ascii_digit) {
            return Err(ParseError::MalformedToken {
                column,
                found: format!("{}{}", digit, next),
            });
        }
        self.pos += 1;
        Ok(Some(digit))
    }

    fn continuation(&mut self) -> bool {
        self.skip_whitespace();
        let mut found = false;
        while let Some(c) = self.rest().chars().next() {
            if !self.tokens.is_continuation(c) {
                break;
            }
            self.pos += c.len_utf8();
            found = true;
        }
        found
    }
}
