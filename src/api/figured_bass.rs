//! Figured bass operations for the WASM API
//!
//! Text in, JSON values out. Every call uses the built-in font registry.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, deserialize_or_default, js_error, serialize};
use crate::converters::musicxml::{read_figured_bass, write_figured_bass};
use crate::fontgen::FontRegistry;
use crate::models::figured_bass::{FiguredBass, FiguredBassItem, Tick};
use crate::models::style::FiguredBassStyle;
use crate::renderers::display_text::{closing_glyph, display_text, DisplayText};
use crate::renderers::layout::MonospaceMeasure;
use crate::timeline::ScoreTimeline;

/// Outcome of parsing entered text
#[derive(Serialize)]
struct ParseOutcome {
    parsed: bool,
    /// Normalized text, or the entered text when not parsed
    text: String,
    items: Vec<FiguredBassItem>,
    error: Option<ParseFailure>,
}

#[derive(Serialize)]
struct ParseFailure {
    line: usize,
    message: String,
}

#[derive(Serialize)]
struct DisplayLine {
    display: DisplayText,
    closing: Option<String>,
}

#[derive(Deserialize)]
struct ChordRestInput {
    tick: Tick,
    duration: Tick,
}

/// Layout input: one figured bass on one staff with its chords/rests
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutRequest {
    text: String,
    #[serde(default)]
    tick: Tick,
    #[serde(default)]
    ticks: Option<Tick>,
    #[serde(default)]
    chord_rests: Vec<ChordRestInput>,
    #[serde(default = "default_units_per_tick")]
    units_per_tick: f64,
    #[serde(default)]
    end_of_piece: Option<Tick>,
    #[serde(default)]
    style: FiguredBassStyle,
}

fn default_units_per_tick() -> f64 {
    0.05
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportedFiguredBass {
    text: String,
    ticks: Tick,
    items: Vec<FiguredBassItem>,
}

/// Parse figured bass text
///
/// # Returns
/// `{ parsed, text, items, error }`; on failure `text` is the entered text
/// and `error` names the first bad line
#[wasm_bindgen(js_name = parseFiguredBass)]
pub fn parse_figured_bass(text: &str) -> Result<JsValue, JsValue> {
    let mut fb = FiguredBass::new(0, 0, 0);
    let error = fb.set_text(text).err().map(|e| ParseFailure {
        line: e.line,
        message: e.source.to_string(),
    });
    let outcome = ParseOutcome {
        parsed: fb.is_parsed(),
        text: fb.text().to_string(),
        items: fb.items().to_vec(),
        error,
    };
    serialize(&outcome, "parseFiguredBass")
}

/// Normalized text, or `undefined` when the text does not parse
#[wasm_bindgen(js_name = normalizeFiguredBass)]
pub fn normalize_figured_bass(text: &str) -> Option<String> {
    let fb = FiguredBass::from_text(0, 0, 0, text);
    fb.normalized_text().map(str::to_string)
}

/// Display text per item with the given style (built-in fonts)
#[wasm_bindgen(js_name = figuredBassDisplayText)]
pub fn figured_bass_display_text(text: &str, style: JsValue) -> Result<JsValue, JsValue> {
    let style: FiguredBassStyle = deserialize_or_default(style, "figuredBassDisplayText style")?;
    let font = FontRegistry::builtin().font_or_default(&style.font_name);
    let fb = FiguredBass::from_text(0, 0, 0, text);
    let lines: Vec<DisplayLine> = fb
        .items()
        .iter()
        .map(|item| DisplayLine {
            display: display_text(item, font, style.digit_style),
            closing: closing_glyph(item, font),
        })
        .collect();
    serialize(&lines, "figuredBassDisplayText")
}

/// Display names of the built-in fonts
#[wasm_bindgen(js_name = figuredBassFontNames)]
pub fn figured_bass_font_names() -> Result<JsValue, JsValue> {
    serialize(&FontRegistry::builtin().font_names(), "figuredBassFontNames")
}

/// Lay out one figured bass against its chords/rests
///
/// # Arguments
/// `{ text, tick, ticks?, chordRests: [{tick, duration}], unitsPerTick?,
/// endOfPiece?, style? }`
#[wasm_bindgen(js_name = layoutFiguredBass)]
pub fn layout_figured_bass(request: JsValue) -> Result<JsValue, JsValue> {
    let request: LayoutRequest = deserialize(request, "layoutFiguredBass request")?;

    let mut timeline = ScoreTimeline::new(request.units_per_tick);
    for cr in &request.chord_rests {
        timeline.add_chord_rest(0, cr.tick, cr.duration);
    }
    if let Some(end) = request.end_of_piece {
        timeline.set_end_of_piece(end);
    }
    let (fb, _) = timeline.add_figured_bass(0, request.tick, request.ticks);
    if let Err(e) = fb.set_text(&request.text) {
        log::debug!("[WASM] layoutFiguredBass: literal text ({})", e);
    }

    let measure = MonospaceMeasure::for_style(&request.style);
    let layout = timeline
        .layout_all(FontRegistry::builtin(), &request.style, &measure)
        .into_iter()
        .next()
        .unwrap_or_default();
    serialize(&layout, "layoutFiguredBass")
}

/// MusicXML `<figured-bass>` element for the text
#[wasm_bindgen(js_name = figuredBassToMusicXml)]
pub fn figured_bass_to_musicxml(text: &str, ticks: Tick, divisions: u32) -> Result<String, JsValue> {
    let fb = FiguredBass::from_text(0, 0, ticks, text);
    write_figured_bass(&fb, divisions)
        .ok_or_else(|| js_error("figuredBassToMusicXml", "text is not a figured bass"))
}

/// Read a MusicXML `<figured-bass>` element
///
/// # Returns
/// `{ text, ticks, items }`
#[wasm_bindgen(js_name = figuredBassFromMusicXml)]
pub fn figured_bass_from_musicxml(xml: &str, divisions: u32) -> Result<JsValue, JsValue> {
    let fb = read_figured_bass(xml, divisions, 0, 0).map_err(|e| js_error("figuredBassFromMusicXml", e))?;
    let imported = ImportedFiguredBass {
        text: fb.text().to_string(),
        ticks: fb.ticks(),
        items: fb.items().to_vec(),
    };
    serialize(&imported, "figuredBassFromMusicXml")
}
