//! Parsing of entered figured bass text
//!
//! `tokens` holds the token table, `item` parses one line and `annotation`
//! parses a whole multi-line indication.

pub mod tokens;
pub mod item;
pub mod annotation;

pub use annotation::{parse_annotation, parse_annotation_with, parse_figured_bass, split_lines};
pub use item::{parse_item, parse_item_with};
pub use tokens::{TokenSet, DEFAULT_TOKENS};
