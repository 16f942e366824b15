//! Normalized (canonical) text of a figured bass item
//!
//! Fixed token order, one canonical token per modifier and parenthesis.
//! The parser accepts this text back and yields the same item.

use crate::models::figured_bass::FiguredBassItem;
use crate::parse::tokens::{canonical_modifier, canonical_parenthesis, CONTINUATION_TOKEN};

pub fn normalized_text(item: &FiguredBassItem) -> String {
    let mut out = String::new();
    let push_parenthesis = |out: &mut String, slot: usize| {
        if let Some(c) = canonical_parenthesis(item.parenthesis(slot)) {
            out.push(c);
        }
    };

    push_parenthesis(&mut out, 0);
    out.push_str(canonical_modifier(item.prefix()));
    push_parenthesis(&mut out, 1);
    if let Some(digit) = item.digit() {
        out.push(char::from(b'0' + digit));
    }
    push_parenthesis(&mut out, 2);
    out.push_str(canonical_modifier(item.suffix()));
    push_parenthesis(&mut out, 3);
    if item.continuation_line() {
        out.push(CONTINUATION_TOKEN);
    }
    push_parenthesis(&mut out, 4);
    out
}
