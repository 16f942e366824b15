//! Stack layout for one figured bass
//!
//! Items are stacked vertically in order. Horizontally, the body glyphs
//! (digits) of all items share one column: each item is shifted right by
//! the difference between the widest prefix segment of the stack and its
//! own. Continuation lines run from the element to the point where its
//! harmony is superseded on the timeline.

use serde::Serialize;

use crate::error::LayoutError;
use crate::fontgen::FontRegistry;
use crate::models::elements::StackAlignment;
use crate::models::figured_bass::{FiguredBass, Tick};
use crate::models::style::FiguredBassStyle;
use crate::renderers::display_text::{closing_glyph, display_text, DisplayText};
use crate::timeline::{Timeline, TimelineEvent};

/// Average glyph advance as a fraction of the font size
const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// Width of a display string in layout units
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

/// Every glyph has the same advance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl MonospaceMeasure {
    pub fn new(advance: f64) -> Self {
        Self { advance }
    }

    /// Advance estimated from the style font size
    pub fn for_style(style: &FiguredBassStyle) -> Self {
        Self::new(style.font_size * GLYPH_ADVANCE_RATIO)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

/// Everything a layout pass reads
pub struct LayoutContext<'a> {
    pub fonts: &'a FontRegistry,
    pub style: &'a FiguredBassStyle,
    pub measure: &'a dyn TextMeasure,
    pub timeline: &'a dyn Timeline,
}

/// Position and size of one item, ready for drawing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemLayout {
    pub order: usize,
    pub display: DisplayText,
    /// Parenthesis drawn after the continuation line
    pub closing: Option<String>,
    pub text_width: f64,
    pub prefix_width: f64,
    /// Horizontal shift aligning this item's body with the stack
    pub x_offset: f64,
    pub y: f64,
    pub line_length: f64,
    /// Text width, or the line length when the line is longer
    pub width: f64,
    pub height: f64,
}

/// Layout of all items of one figured bass
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StackLayout {
    pub items: Vec<ItemLayout>,
    pub line_height: f64,
}

impl StackLayout {
    pub fn line_lengths(&self) -> Vec<f64> {
        self.items.iter().map(|item| item.line_length).collect()
    }

    pub fn offsets(&self) -> Vec<f64> {
        self.items.iter().map(|item| item.x_offset).collect()
    }
}

/// Offsets that bring every prefix segment to the width of the widest one
pub fn align_offsets(prefix_widths: &[f64]) -> Vec<f64> {
    let widest = prefix_widths.iter().copied().fold(0.0, f64::max);
    prefix_widths.iter().map(|w| widest - w).collect()
}

/// Tick where the continuation lines of a figured bass at `tick` end.
///
/// That is the next figured bass on the staff or the end of the last
/// chord/rest starting within `[tick, tick + ticks)`, whichever comes first.
/// Without any chord/rest in that window, the next onset after it is used.
pub fn continuation_end(
    timeline: &dyn Timeline,
    staff: usize,
    tick: Tick,
    ticks: Tick,
) -> Result<Tick, LayoutError> {
    let target = tick.saturating_add(ticks);
    let mut end: Option<Tick> = None;

    for event in timeline.events_from(staff, tick) {
        let t = event.tick();
        match event {
            TimelineEvent::FiguredBass { .. } if t > tick => {
                end = Some(end.map_or(t, |e| e.min(t)));
                break;
            }
            TimelineEvent::FiguredBass { .. } => {}
            TimelineEvent::ChordRest { duration, .. } if t < target => {
                let chord_end = t.saturating_add(duration);
                end = Some(end.map_or(chord_end, |e| e.max(chord_end)));
            }
            TimelineEvent::ChordRest { .. } => match end {
                None => {
                    end = Some(t);
                    break;
                }
                Some(e) if t >= e => break,
                Some(_) => {}
            },
        }
    }

    end.ok_or(LayoutError::NoForwardBoundary { staff, tick })
}

/// Continuation line length of `fb`; extends to the end of the piece when
/// nothing closes it
pub fn continuation_length(fb: &FiguredBass, timeline: &dyn Timeline) -> f64 {
    if fb.ticks() == 0 {
        return 0.0;
    }
    let piece_end = timeline.end_of_piece();
    let end = continuation_end(timeline, fb.staff(), fb.tick(), fb.ticks()).unwrap_or_else(|e| {
        log::debug!("{}; extending line to end of piece ({})", e, piece_end);
        piece_end
    });
    let end = end.min(piece_end).max(fb.tick());
    (timeline.x_at(end) - timeline.x_at(fb.tick())).max(0.0)
}

/// Lay out the items of `fb`. Unparsed (literal) content has no items.
pub fn compute_stack_layout(fb: &FiguredBass, ctx: &LayoutContext) -> StackLayout {
    let font = ctx.fonts.font_or_default(&ctx.style.font_name);
    let line_height = ctx.style.font_size * ctx.style.line_height * font.default_line_height;

    if !fb.is_parsed() {
        return StackLayout {
            items: Vec::new(),
            line_height,
        };
    }

    let items = fb.items();
    let line_length = if items.iter().any(|item| item.continuation_line()) {
        continuation_length(fb, ctx.timeline)
    } else {
        0.0
    };

    let displays: Vec<DisplayText> = items
        .iter()
        .map(|item| display_text(item, font, ctx.style.digit_style))
        .collect();
    let prefix_widths: Vec<f64> = displays
        .iter()
        .map(|d| ctx.measure.text_width(d.prefix_segment()))
        .collect();
    let offsets = align_offsets(&prefix_widths);

    let count = items.len();
    let laid_out = items
        .iter()
        .zip(displays)
        .zip(prefix_widths.into_iter().zip(offsets))
        .map(|((item, display), (prefix_width, x_offset))| {
            let order = item.order();
            let y = match ctx.style.alignment {
                StackAlignment::Top => line_height * order as f64,
                StackAlignment::Bottom => -line_height * (count - order) as f64,
            };
            let text_width = ctx.measure.text_width(&display.text);
            let item_line = if item.continuation_line() { line_length } else { 0.0 };
            ItemLayout {
                order,
                closing: closing_glyph(item, font),
                text_width,
                prefix_width,
                x_offset,
                y,
                line_length: item_line,
                width: text_width.max(item_line),
                height: line_height,
                display,
            }
        })
        .collect();

    StackLayout {
        items: laid_out,
        line_height,
    }
}

impl FiguredBass {
    /// Lay out this element and store its continuation line lengths
    pub fn layout(&mut self, ctx: &LayoutContext) -> StackLayout {
        let layout = compute_stack_layout(self, ctx);
        self.set_line_lengths(layout.line_lengths());
        layout
    }
}
