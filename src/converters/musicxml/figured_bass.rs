//! MusicXML `<figured-bass>` export and import
//!
//! MusicXML carries one parentheses flag per element instead of five
//! parenthesis slots per item. Export sets the flag when any item starts with
//! a parenthesis; import places a round pair around the present parts of
//! every figure when the flag is set.

use roxmltree::{Document as XmlDocument, Node};

use crate::error::MusicXmlError;
use crate::models::elements::{Modifier, Parenthesis};
use crate::models::figured_bass::{FiguredBass, FiguredBassItem, Tick, TICKS_PER_QUARTER};

/// Result type for figured bass MusicXML operations
pub type MusicXmlResult<T> = Result<T, MusicXmlError>;

/// Write `fb` as a `<figured-bass>` element, durations in `divisions` per
/// quarter. Literal (unparsed) content has no MusicXML form.
pub fn write_figured_bass(fb: &FiguredBass, divisions: u32) -> Option<String> {
    if !fb.is_parsed() {
        log::debug!("skipping unparsed figured bass at tick {} on export", fb.tick());
        return None;
    }

    let mut buffer = String::new();
    if fb.items().iter().any(FiguredBassItem::starts_with_parenthesis) {
        buffer.push_str("<figured-bass parentheses=\"yes\">\n");
    } else {
        buffer.push_str("<figured-bass>\n");
    }

    for item in fb.items() {
        write_figure(&mut buffer, item);
    }

    if fb.ticks() > 0 {
        let duration = u64::from(fb.ticks()) * u64::from(divisions) / u64::from(TICKS_PER_QUARTER);
        buffer.push_str(&format!("  <duration>{}</duration>\n", duration));
    }
    buffer.push_str("</figured-bass>\n");
    Some(buffer)
}

fn write_figure(buffer: &mut String, item: &FiguredBassItem) {
    buffer.push_str("  <figure>\n");
    if let Some(name) = item.prefix().musicxml_name() {
        buffer.push_str(&format!("    <prefix>{}</prefix>\n", name));
    }
    if let Some(digit) = item.digit() {
        buffer.push_str(&format!("    <figure-number>{}</figure-number>\n", digit));
    }
    if let Some(name) = item.suffix().musicxml_name() {
        buffer.push_str(&format!("    <suffix>{}</suffix>\n", name));
    }
    if item.continuation_line() {
        buffer.push_str("    <extend/>\n");
    }
    buffer.push_str("  </figure>\n");
}

/// Read the first `<figured-bass>` element of `xml` into a figured bass at
/// `tick` on `staff`. `divisions` is the MusicXML divisions per quarter.
pub fn read_figured_bass(
    xml: &str,
    divisions: u32,
    staff: usize,
    tick: Tick,
) -> MusicXmlResult<FiguredBass> {
    if divisions == 0 {
        return Err(MusicXmlError::InvalidValue {
            element: "divisions".to_string(),
            value: divisions.to_string(),
        });
    }

    let doc = XmlDocument::parse(xml).map_err(|e| MusicXmlError::Xml(e.to_string()))?;
    let node = doc
        .descendants()
        .find(|n| n.has_tag_name("figured-bass"))
        .ok_or_else(|| MusicXmlError::MissingElement("figured-bass".to_string()))?;

    let parentheses = node.attribute("parentheses") == Some("yes");

    let mut items = Vec::new();
    for (index, figure) in node.children().filter(|n| n.has_tag_name("figure")).enumerate() {
        let Some(mut figure_item) = parse_figure(&figure)? else {
            log::warn!("skipping empty <figure> {} in <figured-bass>", index);
            continue;
        };
        if parentheses {
            enclose_in_parentheses(&mut figure_item);
        }
        // Slots are filled by element, not by text position
        let item = figure_item
            .canonicalize()
            .map_err(|source| MusicXmlError::InvalidFigure { index, source })?;
        items.push(item);
    }

    if items.is_empty() {
        return Err(MusicXmlError::MissingElement("figure".to_string()));
    }

    let ticks = match child_text(&node, "duration") {
        Some(text) => {
            let duration: u64 = text.parse().map_err(|_| MusicXmlError::InvalidValue {
                element: "duration".to_string(),
                value: text.to_string(),
            })?;
            let ticks = duration * u64::from(TICKS_PER_QUARTER) / u64::from(divisions);
            Tick::try_from(ticks).map_err(|_| MusicXmlError::InvalidValue {
                element: "duration".to_string(),
                value: text.to_string(),
            })?
        }
        None => 0,
    };

    let mut fb = FiguredBass::new(staff, tick, ticks);
    fb.set_items(items);
    Ok(fb)
}

/// One `<figure>`; `None` when it carries nothing
fn parse_figure(figure: &Node) -> MusicXmlResult<Option<FiguredBassItem>> {
    let mut item = FiguredBassItem::default();

    if let Some(text) = child_text(figure, "prefix") {
        item.prefix = Modifier::from_musicxml_name(text);
    }
    if let Some(text) = child_text(figure, "figure-number") {
        let digit = text
            .parse::<u8>()
            .ok()
            .filter(|d| *d <= 9)
            .ok_or_else(|| MusicXmlError::InvalidValue {
                element: "figure-number".to_string(),
                value: text.to_string(),
            })?;
        item.digit = Some(digit);
    }
    if let Some(text) = child_text(figure, "suffix") {
        item.suffix = Modifier::from_musicxml_name(text);
    }
    item.continuation_line = figure
        .children()
        .any(|n| n.has_tag_name("extend") && n.attribute("type") != Some("stop"));

    let empty = item.prefix == Modifier::None
        && item.digit.is_none()
        && item.suffix == Modifier::None
        && !item.continuation_line;
    Ok((!empty).then_some(item))
}

/// Open before the first present part, close after the suffix slot.
/// `canonicalize` then moves both onto the slots the parser uses.
fn enclose_in_parentheses(item: &mut FiguredBassItem) {
    let open = if item.prefix != Modifier::None {
        0
    } else if item.digit.is_some() {
        1
    } else if item.suffix != Modifier::None {
        2
    } else {
        return;
    };
    item.parentheses[open] = Parenthesis::RoundOpen;
    item.parentheses[3] = Parenthesis::RoundClosed;
}

fn child_text<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_figures() {
        let fb = FiguredBass::from_text(0, 0, 960, "#6\\\n4_");
        let xml = write_figured_bass(&fb, 4).unwrap();
        assert_eq!(
            xml,
            "<figured-bass>\n  <figure>\n    <prefix>sharp</prefix>\n    <figure-number>6</figure-number>\n    <suffix>backslash</suffix>\n  </figure>\n  <figure>\n    <figure-number>4</figure-number>\n    <extend/>\n  </figure>\n  <duration>8</duration>\n</figured-bass>\n"
        );
    }

    #[test]
    fn test_write_parentheses_flag() {
        let fb = FiguredBass::from_text(0, 0, 480, "6\n(4)");
        let xml = write_figured_bass(&fb, 480).unwrap();
        assert!(xml.starts_with("<figured-bass parentheses=\"yes\">"));
        assert!(xml.contains("<duration>480</duration>"));
    }

    #[test]
    fn test_write_literal_is_skipped() {
        let fb = FiguredBass::from_text(0, 0, 480, "Adagio");
        assert_eq!(write_figured_bass(&fb, 480), None);
    }

    #[test]
    fn test_read_figures() {
        let xml = r#"<figured-bass>
            <figure><prefix>flat</prefix><figure-number>7</figure-number></figure>
            <figure><figure-number>5</figure-number><suffix>cross</suffix><extend type="start"/></figure>
            <duration>2</duration>
        </figured-bass>"#;
        let fb = read_figured_bass(xml, 1, 1, 960).unwrap();
        assert_eq!(fb.staff(), 1);
        assert_eq!(fb.tick(), 960);
        assert_eq!(fb.ticks(), 960);
        assert_eq!(fb.normalized_text(), Some("b7\n5+_"));
        assert_eq!(fb.item(1).map(|i| i.order()), Some(1));
    }

    #[test]
    fn test_read_parentheses() {
        let xml = r#"<figured-bass parentheses="yes">
            <figure><prefix>sharp</prefix></figure>
            <figure><figure-number>6</figure-number></figure>
            <figure><prefix>natural</prefix><figure-number>4</figure-number><suffix>slash</suffix></figure>
        </figured-bass>"#;
        let fb = read_figured_bass(xml, 480, 0, 0).unwrap();
        assert_eq!(fb.ticks(), 0);
        assert_eq!(fb.normalized_text(), Some("(#)\n(6)\n(h4/)"));
    }

    #[test]
    fn test_read_parentheses_match_parser() {
        let xml = r#"<figured-bass parentheses="yes"><figure><figure-number>6</figure-number></figure></figured-bass>"#;
        let fb = read_figured_bass(xml, 480, 0, 0).unwrap();
        let parsed = FiguredBass::from_text(0, 0, 0, "(6)");
        assert_eq!(fb.items(), parsed.items());
    }

    #[test]
    fn test_read_skips_empty_figures() {
        let xml = "<figured-bass><figure/><figure><figure-number>3</figure-number></figure></figured-bass>";
        let fb = read_figured_bass(xml, 480, 0, 0).unwrap();
        assert_eq!(fb.items().len(), 1);
        assert_eq!(fb.item(0).map(|i| i.order()), Some(0));
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(read_figured_bass("<figured-bass", 480, 0, 0), Err(MusicXmlError::Xml(_))));
        assert_eq!(
            read_figured_bass("<note/>", 480, 0, 0).unwrap_err(),
            MusicXmlError::MissingElement("figured-bass".to_string())
        );
        assert_eq!(
            read_figured_bass("<figured-bass><figure><figure-number>11</figure-number></figure></figured-bass>", 480, 0, 0)
                .unwrap_err(),
            MusicXmlError::InvalidValue {
                element: "figure-number".to_string(),
                value: "11".to_string()
            }
        );
        assert!(matches!(
            read_figured_bass("<figured-bass><figure><suffix>slash</suffix></figure></figured-bass>", 480, 0, 0),
            Err(MusicXmlError::InvalidFigure { index: 0, .. })
        ));
    }

    #[test]
    fn test_round_trip_keeps_figures() {
        let fb = FiguredBass::from_text(0, 480, 240, "bb7\n#\n6+_");
        let xml = write_figured_bass(&fb, 480).unwrap();
        let back = read_figured_bass(&xml, 480, 0, 480).unwrap();
        assert_eq!(back.items(), fb.items());
        assert_eq!(back.ticks(), 240);
    }

    #[test]
    fn test_read_lone_suffix_accidental_becomes_prefix() {
        let xml = "<figured-bass><figure><suffix>sharp</suffix></figure></figured-bass>";
        let fb = read_figured_bass(xml, 480, 0, 0).unwrap();
        let item = fb.item(0).unwrap();
        assert_eq!(item.prefix(), Modifier::Sharp);
        assert_eq!(item.suffix(), Modifier::None);
        assert_eq!(fb.normalized_text(), Some("#"));
    }

    #[test]
    fn test_read_items_reparse_from_their_text() {
        let xml = r#"<figured-bass parentheses="yes">
            <figure><figure-number>6</figure-number><suffix>cross</suffix></figure>
            <figure><suffix>flat</suffix></figure>
            <figure><figure-number>4</figure-number><extend/></figure>
            <figure><prefix>natural</prefix><extend/></figure>
        </figured-bass>"#;
        let fb = read_figured_bass(xml, 480, 0, 0).unwrap();
        let reparsed = FiguredBass::from_text(0, 0, 0, fb.text());
        assert!(reparsed.is_parsed(), "{}", fb.text());
        assert_eq!(reparsed.items(), fb.items());
    }
}
