//! Figured bass element and its stacked items
//!
//! A `FiguredBass` owns its items exclusively, in stacking order (top to
//! bottom). Items are replaced wholesale on every re-parse. When any line of
//! the entered text fails to parse, the element keeps the text verbatim and
//! has no items; it is then shown as plain text.

use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, EditError, InterchangeError, ParseError};
use crate::models::elements::{Modifier, Parenthesis, PARENTHESIS_SLOTS};
use crate::parse::annotation::parse_annotation_with;
use crate::parse::item::parse_item;
use crate::parse::tokens::{TokenSet, DEFAULT_TOKENS};
use crate::renderers::normalized::normalized_text;

/// Time position or duration in ticks (480 per quarter note)
pub type Tick = u32;

/// Ticks per quarter note
pub const TICKS_PER_QUARTER: Tick = 480;

/// One line of a figured bass stack
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiguredBassItem {
    /// Line ordinal within the owning stack; assigned by the owner
    #[serde(skip)]
    pub(crate) order: usize,
    pub(crate) prefix: Modifier,
    pub(crate) digit: Option<u8>,
    pub(crate) suffix: Modifier,
    pub(crate) continuation_line: bool,
    pub(crate) parentheses: [Parenthesis; PARENTHESIS_SLOTS],
}

impl FiguredBassItem {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn prefix(&self) -> Modifier {
        self.prefix
    }

    pub fn digit(&self) -> Option<u8> {
        self.digit
    }

    pub fn suffix(&self) -> Modifier {
        self.suffix
    }

    pub fn continuation_line(&self) -> bool {
        self.continuation_line
    }

    pub fn parentheses(&self) -> &[Parenthesis; PARENTHESIS_SLOTS] {
        &self.parentheses
    }

    /// Parenthesis in `slot` (0..5); None outside the range
    pub fn parenthesis(&self, slot: usize) -> Parenthesis {
        self.parentheses.get(slot).copied().unwrap_or_default()
    }

    /// Canonical text of this item, re-accepted by the parser
    pub fn normalized_text(&self) -> String {
        normalized_text(self)
    }

    /// Whether the first present part is preceded by a parenthesis
    pub fn starts_with_parenthesis(&self) -> bool {
        if self.prefix != Modifier::None {
            return !self.parentheses[0].is_none();
        }
        if self.digit.is_some() {
            return !self.parentheses[1].is_none();
        }
        if self.suffix != Modifier::None {
            return !self.parentheses[2].is_none();
        }
        false
    }

    /// Check that the item is one the parser produces for its own normalized
    /// text. Edits and imports must keep `parse(normalized_text) == item`.
    pub fn validate(&self) -> Result<(), ParseError> {
        let reparsed = self.canonicalize()?;
        if reparsed != *self {
            return Err(ParseError::InvalidCombination(
                "a parenthesis or modifier sits in a slot the text form cannot express",
            ));
        }
        Ok(())
    }

    /// The item the parser reads back from this item's normalized text.
    /// Parentheses move onto their canonical slots and a lone suffix
    /// accidental becomes a prefix.
    pub fn canonicalize(&self) -> Result<FiguredBassItem, ParseError> {
        self.check_fields()?;
        let mut item = parse_item(&self.normalized_text())?;
        item.order = self.order;
        Ok(item)
    }

    /// Field invariants checked on every parsed line
    pub(crate) fn check_fields(&self) -> Result<(), ParseError> {
        if let Some(digit) = self.digit {
            if digit > 9 {
                return Err(ParseError::MalformedToken {
                    column: 0,
                    found: digit.to_string(),
                });
            }
        }
        if !self.prefix.allowed_as_prefix() {
            return Err(ParseError::MalformedToken {
                column: 0,
                found: crate::parse::tokens::canonical_modifier(self.prefix).to_string(),
            });
        }
        if self.prefix == Modifier::None
            && self.digit.is_none()
            && self.suffix == Modifier::None
            && !self.continuation_line
        {
            return Err(ParseError::EmptyItem);
        }
        if self.prefix.is_accidental() && self.suffix.is_accidental() {
            return Err(ParseError::InvalidCombination(
                "an item cannot carry both a prefix and a suffix accidental",
            ));
        }
        if self.suffix.is_combining() && self.digit.is_none() {
            return Err(ParseError::InvalidCombination(
                "a +, \\ or / suffix needs a digit",
            ));
        }
        Ok(())
    }
}

/// A single editable field of an item, used by edits and undo
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ItemProperty {
    Prefix(Modifier),
    Digit(Option<u8>),
    Suffix(Modifier),
    ContinuationLine(bool),
    Parenthesis { slot: usize, value: Parenthesis },
}

impl ItemProperty {
    /// Current value of the same field on `item`
    fn read(&self, item: &FiguredBassItem) -> ItemProperty {
        match *self {
            ItemProperty::Prefix(_) => ItemProperty::Prefix(item.prefix),
            ItemProperty::Digit(_) => ItemProperty::Digit(item.digit),
            ItemProperty::Suffix(_) => ItemProperty::Suffix(item.suffix),
            ItemProperty::ContinuationLine(_) => ItemProperty::ContinuationLine(item.continuation_line),
            ItemProperty::Parenthesis { slot, .. } => ItemProperty::Parenthesis {
                slot,
                value: item.parenthesis(slot),
            },
        }
    }

    fn write(&self, item: &mut FiguredBassItem) -> Result<(), EditError> {
        match *self {
            ItemProperty::Prefix(m) => item.prefix = m,
            ItemProperty::Digit(d) => item.digit = d,
            ItemProperty::Suffix(m) => item.suffix = m,
            ItemProperty::ContinuationLine(b) => item.continuation_line = b,
            ItemProperty::Parenthesis { slot, value } => {
                let target = item
                    .parentheses
                    .get_mut(slot)
                    .ok_or(EditError::NoSuchSlot(slot))?;
                *target = value;
            }
        }
        Ok(())
    }
}

/// Logical content exchanged with the native file format
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FiguredBassRecord {
    pub ticks: Tick,
    pub on_note: bool,
    pub items: Vec<FiguredBassItem>,
}

/// One figured bass indication attached to a staff position
#[derive(Clone, Debug, PartialEq)]
pub struct FiguredBass {
    staff: usize,
    tick: Tick,
    ticks: Tick,
    on_note: bool,
    items: Vec<FiguredBassItem>,
    /// Normalized text when parsed, otherwise the text as entered
    text: String,
    /// Continuation line lengths, one per item, filled by layout
    line_lengths: Vec<f64>,
}

impl FiguredBass {
    /// Create an empty element at `tick` on `staff`
    pub fn new(staff: usize, tick: Tick, ticks: Tick) -> Self {
        Self {
            staff,
            tick,
            ticks,
            on_note: true,
            items: Vec::new(),
            text: String::new(),
            line_lengths: Vec::new(),
        }
    }

    /// Create an element and parse `text` into it
    pub fn from_text(staff: usize, tick: Tick, ticks: Tick, text: &str) -> Self {
        let mut fb = Self::new(staff, tick, ticks);
        // A parse failure leaves the literal text in place
        let _ = fb.set_text(text);
        fb
    }

    /// Replace the content from entered text with the default token set
    pub fn set_text(&mut self, text: &str) -> Result<(), AnnotationError> {
        self.set_text_with(text, &DEFAULT_TOKENS)
    }

    /// Replace the content from entered text.
    ///
    /// On success the items are replaced and the text becomes the normalized
    /// text. On failure the items are cleared and the text is kept verbatim;
    /// the error is returned for diagnostics only.
    pub fn set_text_with(&mut self, text: &str, tokens: &TokenSet) -> Result<(), AnnotationError> {
        self.line_lengths.clear();
        match parse_annotation_with(text, tokens) {
            Ok(items) if !items.is_empty() => {
                self.items = items;
                self.refresh_text();
                Ok(())
            }
            Ok(_) => {
                self.items.clear();
                self.text = text.to_string();
                Ok(())
            }
            Err(e) => {
                log::info!("figured bass kept as literal text ({}): {:?}", e, text);
                self.items.clear();
                self.text = text.to_string();
                Err(e)
            }
        }
    }

    fn refresh_text(&mut self) {
        self.text = self
            .items
            .iter()
            .map(normalized_text)
            .collect::<Vec<_>>()
            .join("\n");
    }

    pub fn staff(&self) -> usize {
        self.staff
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    /// Change the duration; previously computed line lengths are dropped
    pub fn set_ticks(&mut self, ticks: Tick) {
        if self.ticks != ticks {
            self.ticks = ticks;
            self.line_lengths.clear();
        }
    }

    pub fn on_note(&self) -> bool {
        self.on_note
    }

    pub fn set_on_note(&mut self, on_note: bool) {
        self.on_note = on_note;
    }

    pub fn items(&self) -> &[FiguredBassItem] {
        &self.items
    }

    pub fn item(&self, order: usize) -> Option<&FiguredBassItem> {
        self.items.get(order)
    }

    /// Whether the text was parsed into structured items
    pub fn is_parsed(&self) -> bool {
        !self.items.is_empty()
    }

    /// Normalized text when parsed, otherwise the literal text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized text; not available for literal content
    pub fn normalized_text(&self) -> Option<&str> {
        self.is_parsed().then_some(self.text.as_str())
    }

    /// Continuation line length of item `idx`; 0 when not laid out
    pub fn line_length(&self, idx: usize) -> f64 {
        self.line_lengths.get(idx).copied().unwrap_or(0.0)
    }

    pub fn line_lengths(&self) -> &[f64] {
        &self.line_lengths
    }

    pub(crate) fn set_line_lengths(&mut self, lengths: Vec<f64>) {
        self.line_lengths = lengths;
    }

    /// Set one field of one item. Returns the previous value of that field.
    pub fn set_item_property(
        &mut self,
        order: usize,
        property: ItemProperty,
    ) -> Result<ItemProperty, EditError> {
        if !self.is_parsed() {
            return Err(EditError::NotParsed);
        }
        let current = self.items.get(order).ok_or(EditError::NoSuchItem(order))?;
        let previous = property.read(current);

        let mut candidate = current.clone();
        property.write(&mut candidate)?;
        candidate.validate()?;

        self.items[order] = candidate;
        self.refresh_text();
        Ok(previous)
    }

    /// Logical content for the native interchange format
    pub fn to_record(&self) -> FiguredBassRecord {
        FiguredBassRecord {
            ticks: self.ticks,
            on_note: self.on_note,
            items: self.items.clone(),
        }
    }

    /// Build an element from interchanged content; every item is re-validated
    pub fn from_record(
        staff: usize,
        tick: Tick,
        record: FiguredBassRecord,
    ) -> Result<Self, InterchangeError> {
        let mut fb = Self::new(staff, tick, record.ticks);
        fb.on_note = record.on_note;
        fb.items = record.items;
        for (order, item) in fb.items.iter_mut().enumerate() {
            item.order = order;
            item.validate()
                .map_err(|source| InterchangeError::InvalidItem { order, source })?;
        }
        fb.refresh_text();
        Ok(fb)
    }

    pub(crate) fn set_items(&mut self, items: Vec<FiguredBassItem>) {
        self.items = items;
        for (order, item) in self.items.iter_mut().enumerate() {
            item.order = order;
        }
        self.line_lengths.clear();
        self.refresh_text();
    }

    pub fn to_json(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(staff: usize, tick: Tick, json: &str) -> Result<Self, InterchangeError> {
        let record: FiguredBassRecord = serde_json::from_str(json)?;
        Self::from_record(staff, tick, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_normalizes() {
        let fb = FiguredBass::from_text(0, 0, 480, "6\n  #4 \n\n2--");
        assert!(fb.is_parsed());
        assert_eq!(fb.items().len(), 3);
        assert_eq!(fb.normalized_text(), Some("6\n#4\n2_"));
        let orders: Vec<usize> = fb.items().iter().map(|i| i.order()).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_failed_line_keeps_literal_text() {
        let raw = "6\nx4\n3";
        let mut fb = FiguredBass::from_text(0, 0, 480, "5");
        let err = fb.set_text(raw).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(!fb.is_parsed());
        assert!(fb.items().is_empty());
        assert_eq!(fb.text(), raw);
        assert_eq!(fb.normalized_text(), None);
    }

    #[test]
    fn test_empty_text() {
        let fb = FiguredBass::from_text(0, 0, 480, "");
        assert!(!fb.is_parsed());
        assert_eq!(fb.text(), "");
    }

    #[test]
    fn test_set_item_property_returns_previous() {
        let mut fb = FiguredBass::from_text(0, 0, 480, "6\n4");
        let old = fb.set_item_property(1, ItemProperty::Prefix(Modifier::Sharp)).unwrap();
        assert_eq!(old, ItemProperty::Prefix(Modifier::None));
        assert_eq!(fb.text(), "6\n#4");

        let old = fb
            .set_item_property(0, ItemProperty::Parenthesis { slot: 1, value: Parenthesis::RoundOpen })
            .unwrap();
        assert_eq!(old, ItemProperty::Parenthesis { slot: 1, value: Parenthesis::None });
        assert_eq!(fb.text(), "(6\n#4");
    }

    #[test]
    fn test_set_item_property_rejects_invalid() {
        let mut fb = FiguredBass::from_text(0, 0, 480, "6");
        assert!(matches!(
            fb.set_item_property(0, ItemProperty::Prefix(Modifier::Slash)),
            Err(EditError::Invalid(ParseError::MalformedToken { .. }))
        ));
        assert!(matches!(
            fb.set_item_property(0, ItemProperty::Digit(None)),
            Err(EditError::Invalid(ParseError::EmptyItem))
        ));
        assert_eq!(
            fb.set_item_property(3, ItemProperty::ContinuationLine(true)),
            Err(EditError::NoSuchItem(3))
        );
        assert_eq!(
            fb.set_item_property(0, ItemProperty::Parenthesis { slot: 5, value: Parenthesis::RoundOpen }),
            Err(EditError::NoSuchSlot(5))
        );
        assert_eq!(fb.text(), "6");
    }

    #[test]
    fn test_set_ticks_invalidates_line_lengths() {
        let mut fb = FiguredBass::from_text(0, 0, 480, "6_");
        fb.set_line_lengths(vec![12.0]);
        assert_eq!(fb.line_length(0), 12.0);
        fb.set_ticks(960);
        assert_eq!(fb.line_length(0), 0.0);
        assert_eq!(fb.line_length(7), 0.0);
    }

    #[test]
    fn test_json_interchange() {
        let fb = FiguredBass::from_text(0, 960, 480, "#6\\\n(4)_");
        let json = fb.to_json().unwrap();
        assert!(json.starts_with("{\"ticks\":480,\"on_note\":true,\"items\":[{\"prefix\":4,\"digit\":6,\"suffix\":7,\"continuation_line\":false,\"parentheses\":[0,0,0,0,0]}"));

        let back = FiguredBass::from_json(0, 960, &json).unwrap();
        assert_eq!(back.items(), fb.items());
        assert_eq!(back.text(), fb.text());
    }

    #[test]
    fn test_json_import_validates_items() {
        let json = r#"{"ticks":480,"on_note":true,"items":[{"prefix":6,"digit":6,"suffix":0,"continuation_line":false,"parentheses":[0,0,0,0,0]}]}"#;
        assert!(matches!(
            FiguredBass::from_json(0, 0, json),
            Err(InterchangeError::InvalidItem { order: 0, .. })
        ));
    }

    #[test]
    fn test_set_item_property_rejects_slots_the_text_cannot_express() {
        let mut fb = FiguredBass::from_text(0, 0, 480, "6#");
        assert!(matches!(
            fb.set_item_property(0, ItemProperty::Digit(None)),
            Err(EditError::Invalid(ParseError::InvalidCombination(_)))
        ));
        assert_eq!(fb.text(), "6#");

        let mut fb = FiguredBass::from_text(0, 0, 480, "6");
        assert!(matches!(
            fb.set_item_property(0, ItemProperty::Parenthesis { slot: 0, value: Parenthesis::RoundOpen }),
            Err(EditError::Invalid(ParseError::InvalidCombination(_)))
        ));
        assert_eq!(fb.text(), "6");
        assert_eq!(fb.item(0).map(|i| i.parenthesis(0)), Some(Parenthesis::None));
    }

    fn all_properties() -> Vec<ItemProperty> {
        let mut properties = Vec::new();
        for modifier in Modifier::ALL {
            properties.push(ItemProperty::Prefix(modifier));
            properties.push(ItemProperty::Suffix(modifier));
        }
        properties.push(ItemProperty::Digit(None));
        properties.extend((0..=9).map(|d| ItemProperty::Digit(Some(d))));
        properties.push(ItemProperty::ContinuationLine(false));
        properties.push(ItemProperty::ContinuationLine(true));
        for slot in 0..PARENTHESIS_SLOTS {
            for value in Parenthesis::ALL {
                properties.push(ItemProperty::Parenthesis { slot, value });
            }
        }
        properties
    }

    #[test]
    fn test_edited_items_reparse_from_their_text() {
        let sources = ["6", "#", "6#", "b7_", "(6)", "[#4+]", "_", "(h)_", "5\\", "##3 _)"];
        for source in sources {
            for property in all_properties() {
                let mut fb = FiguredBass::from_text(0, 0, 480, source);
                assert!(fb.is_parsed(), "{}", source);
                let Ok(previous) = fb.set_item_property(0, property) else {
                    continue;
                };
                let reparsed = parse_annotation_with(fb.text(), &DEFAULT_TOKENS).unwrap();
                assert_eq!(reparsed, fb.items(), "{} after {:?}", source, property);

                // Undo restores the source exactly
                fb.set_item_property(0, previous).unwrap();
                assert_eq!(fb.items(), FiguredBass::from_text(0, 0, 480, source).items());
            }
        }
    }

    #[test]
    fn test_json_import_rejects_slots_the_text_cannot_express() {
        let lone_suffix = r#"{"ticks":480,"on_note":true,"items":[{"prefix":0,"digit":null,"suffix":4,"continuation_line":false,"parentheses":[0,0,0,0,0]}]}"#;
        assert!(matches!(
            FiguredBass::from_json(0, 0, lone_suffix),
            Err(InterchangeError::InvalidItem { order: 0, source: ParseError::InvalidCombination(_) })
        ));

        let leading_slot = r#"{"ticks":480,"on_note":true,"items":[{"prefix":0,"digit":6,"suffix":0,"continuation_line":false,"parentheses":[1,0,0,0,0]}]}"#;
        assert!(matches!(
            FiguredBass::from_json(0, 0, leading_slot),
            Err(InterchangeError::InvalidItem { order: 0, .. })
        ));
    }

    #[test]
    fn test_json_imported_items_reparse_from_their_text() {
        let fb = FiguredBass::from_text(0, 0, 480, "(#6+)\n[b]_\n4\\ _\n(_)");
        assert!(fb.is_parsed());
        let back = FiguredBass::from_json(0, 0, &fb.to_json().unwrap()).unwrap();
        let reparsed = parse_annotation_with(back.text(), &DEFAULT_TOKENS).unwrap();
        assert_eq!(reparsed, back.items());
    }
}
