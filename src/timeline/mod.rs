//! Timeline collaborator for figured bass layout
//!
//! Layout only needs to walk forward from a figured bass on its staff and to
//! map ticks to horizontal positions; `Timeline` is that query surface.
//! `ScoreTimeline` is a simple in-memory implementation holding chord/rest
//! spans and the figured bass elements of each staff.

use crate::fontgen::FontRegistry;
use crate::models::figured_bass::{FiguredBass, Tick};
use crate::models::style::FiguredBassStyle;
use crate::renderers::layout::{compute_stack_layout, LayoutContext, StackLayout, TextMeasure};

/// Something starting at a tick on one staff
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineEvent {
    /// A chord or rest onset and its duration
    ChordRest { tick: Tick, duration: Tick },
    /// A figured bass element
    FiguredBass { tick: Tick },
}

impl TimelineEvent {
    pub fn tick(&self) -> Tick {
        match *self {
            TimelineEvent::ChordRest { tick, .. } => tick,
            TimelineEvent::FiguredBass { tick } => tick,
        }
    }
}

pub trait Timeline {
    /// Events on `staff` starting at or after `tick`, in tick order
    fn events_from(&self, staff: usize, tick: Tick) -> Box<dyn Iterator<Item = TimelineEvent> + '_>;

    /// Tick at which the piece ends
    fn end_of_piece(&self) -> Tick;

    /// Horizontal position of `tick`
    fn x_at(&self, tick: Tick) -> f64;

    /// Next figured bass on `staff` strictly after `tick`
    fn next_figured_bass(&self, staff: usize, tick: Tick) -> Option<Tick> {
        self.events_from(staff, tick).find_map(|event| match event {
            TimelineEvent::FiguredBass { tick: t } if t > tick => Some(t),
            _ => None,
        })
    }
}

/// A chord or rest on a staff
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChordRestSpan {
    pub staff: usize,
    pub tick: Tick,
    pub duration: Tick,
}

impl ChordRestSpan {
    pub fn end(&self) -> Tick {
        self.tick.saturating_add(self.duration)
    }
}

/// In-memory timeline with linear horizontal spacing
#[derive(Clone, Debug)]
pub struct ScoreTimeline {
    units_per_tick: f64,
    chord_rests: Vec<ChordRestSpan>,
    figured_basses: Vec<FiguredBass>,
    end: Option<Tick>,
}

impl ScoreTimeline {
    pub fn new(units_per_tick: f64) -> Self {
        Self {
            units_per_tick,
            chord_rests: Vec::new(),
            figured_basses: Vec::new(),
            end: None,
        }
    }

    /// Fix the end of the piece instead of deriving it from the content
    pub fn set_end_of_piece(&mut self, end: Tick) {
        self.end = Some(end);
    }

    /// Add (or replace) the chord/rest at `tick` on `staff`
    pub fn add_chord_rest(&mut self, staff: usize, tick: Tick, duration: Tick) {
        let span = ChordRestSpan { staff, tick, duration };
        match self
            .chord_rests
            .binary_search_by_key(&(staff, tick), |c| (c.staff, c.tick))
        {
            Ok(idx) => self.chord_rests[idx] = span,
            Err(idx) => self.chord_rests.insert(idx, span),
        }
    }

    pub fn chord_rest_at(&self, staff: usize, tick: Tick) -> Option<&ChordRestSpan> {
        self.chord_rests
            .binary_search_by_key(&(staff, tick), |c| (c.staff, c.tick))
            .ok()
            .map(|idx| &self.chord_rests[idx])
    }

    fn next_onset(&self, staff: usize, tick: Tick) -> Option<Tick> {
        self.chord_rests
            .iter()
            .filter(|c| c.staff == staff && c.tick > tick)
            .map(|c| c.tick)
            .min()
    }

    fn figured_bass_index(&self, staff: usize, tick: Tick) -> Result<usize, usize> {
        self.figured_basses
            .binary_search_by_key(&(staff, tick), |fb| (fb.staff(), fb.tick()))
    }

    pub fn figured_bass(&self, staff: usize, tick: Tick) -> Option<&FiguredBass> {
        self.figured_bass_index(staff, tick)
            .ok()
            .map(|idx| &self.figured_basses[idx])
    }

    pub fn figured_bass_mut(&mut self, staff: usize, tick: Tick) -> Option<&mut FiguredBass> {
        match self.figured_bass_index(staff, tick) {
            Ok(idx) => Some(&mut self.figured_basses[idx]),
            Err(_) => None,
        }
    }

    pub fn figured_basses(&self) -> &[FiguredBass] {
        &self.figured_basses
    }

    /// Return the figured bass at `tick` on `staff`, creating it if needed.
    ///
    /// A new element is on-note when a chord/rest starts at `tick`. Its
    /// duration is `ext_ticks` if given, else the chord/rest duration, else
    /// the distance to the next onset. A previous element on the staff that
    /// would overlap the new one is shortened to end at `tick`.
    /// The flag is true when the element was created.
    pub fn add_figured_bass(
        &mut self,
        staff: usize,
        tick: Tick,
        ext_ticks: Option<Tick>,
    ) -> (&mut FiguredBass, bool) {
        let idx = match self.figured_bass_index(staff, tick) {
            Ok(idx) => return (&mut self.figured_basses[idx], false),
            Err(idx) => idx,
        };

        let chord_rest = self.chord_rest_at(staff, tick).copied();
        let ticks = ext_ticks
            .filter(|t| *t > 0)
            .or(chord_rest.map(|c| c.duration))
            .or_else(|| self.next_onset(staff, tick).map(|next| next - tick))
            .unwrap_or(0);

        if idx > 0 {
            let prev = &mut self.figured_basses[idx - 1];
            if prev.staff() == staff && prev.tick().saturating_add(prev.ticks()) > tick {
                log::debug!(
                    "shortening figured bass at tick {} to end at {}",
                    prev.tick(),
                    tick
                );
                let shortened = tick - prev.tick();
                prev.set_ticks(shortened);
            }
        }

        let mut fb = FiguredBass::new(staff, tick, ticks);
        fb.set_on_note(chord_rest.is_some());
        self.figured_basses.insert(idx, fb);
        (&mut self.figured_basses[idx], true)
    }

    /// Lay out every figured bass and store its continuation line lengths
    pub fn layout_all(
        &mut self,
        fonts: &FontRegistry,
        style: &FiguredBassStyle,
        measure: &dyn TextMeasure,
    ) -> Vec<StackLayout> {
        let mut layouts = Vec::with_capacity(self.figured_basses.len());
        for idx in 0..self.figured_basses.len() {
            let layout = {
                let ctx = LayoutContext {
                    fonts,
                    style,
                    measure,
                    timeline: &*self,
                };
                compute_stack_layout(&self.figured_basses[idx], &ctx)
            };
            self.figured_basses[idx].set_line_lengths(layout.line_lengths());
            layouts.push(layout);
        }
        layouts
    }
}

impl Timeline for ScoreTimeline {
    fn events_from(&self, staff: usize, tick: Tick) -> Box<dyn Iterator<Item = TimelineEvent> + '_> {
        let mut events: Vec<TimelineEvent> = self
            .chord_rests
            .iter()
            .filter(|c| c.staff == staff && c.tick >= tick)
            .map(|c| TimelineEvent::ChordRest {
                tick: c.tick,
                duration: c.duration,
            })
            .chain(
                self.figured_basses
                    .iter()
                    .filter(|fb| fb.staff() == staff && fb.tick() >= tick)
                    .map(|fb| TimelineEvent::FiguredBass { tick: fb.tick() }),
            )
            .collect();
        events.sort_by_key(TimelineEvent::tick);
        Box::new(events.into_iter())
    }

    fn end_of_piece(&self) -> Tick {
        if let Some(end) = self.end {
            return end;
        }
        let chords = self.chord_rests.iter().map(ChordRestSpan::end);
        let figures = self.figured_basses.iter().map(|fb| fb.tick().saturating_add(fb.ticks()));
        chords.chain(figures).max().unwrap_or(0)
    }

    fn x_at(&self, tick: Tick) -> f64 {
        tick as f64 * self.units_per_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_figured_bass_on_note() {
        let mut timeline = ScoreTimeline::new(1.0);
        timeline.add_chord_rest(0, 0, 960);
        let (fb, created) = timeline.add_figured_bass(0, 0, None);
        assert!(created);
        assert!(fb.on_note());
        assert_eq!(fb.ticks(), 960);

        let (_, created) = timeline.add_figured_bass(0, 0, Some(240));
        assert!(!created);
        assert_eq!(timeline.figured_bass(0, 0).unwrap().ticks(), 960);
    }

    #[test]
    fn test_add_figured_bass_between_notes_shortens_previous() {
        let mut timeline = ScoreTimeline::new(1.0);
        timeline.add_chord_rest(0, 0, 960);
        timeline.add_chord_rest(0, 960, 480);
        timeline.add_figured_bass(0, 0, None);

        let (fb, created) = timeline.add_figured_bass(0, 480, None);
        assert!(created);
        assert!(!fb.on_note());
        assert_eq!(fb.ticks(), 480);
        assert_eq!(timeline.figured_bass(0, 0).unwrap().ticks(), 480);
    }

    #[test]
    fn test_staves_are_independent() {
        let mut timeline = ScoreTimeline::new(1.0);
        timeline.add_chord_rest(0, 0, 960);
        timeline.add_chord_rest(1, 0, 960);
        timeline.add_figured_bass(0, 0, None);
        timeline.add_figured_bass(1, 480, Some(480));
        assert_eq!(timeline.figured_bass(0, 0).unwrap().ticks(), 960);
        assert_eq!(timeline.next_figured_bass(0, 0), None);
        assert_eq!(timeline.next_figured_bass(1, 0), Some(480));
    }

    #[test]
    fn test_events_in_tick_order() {
        let mut timeline = ScoreTimeline::new(1.0);
        timeline.add_chord_rest(0, 960, 480);
        timeline.add_chord_rest(0, 0, 960);
        timeline.add_figured_bass(0, 480, Some(240));
        let ticks: Vec<Tick> = timeline.events_from(0, 0).map(|e| e.tick()).collect();
        assert_eq!(ticks, vec![0, 480, 960]);
        assert_eq!(timeline.end_of_piece(), 1440);
        timeline.set_end_of_piece(2000);
        assert_eq!(timeline.end_of_piece(), 2000);
    }

    #[test]
    fn test_long_extension_saturates() {
        let mut timeline = ScoreTimeline::new(1.0);
        timeline.add_chord_rest(0, 0, 480);
        timeline.add_figured_bass(0, 480, Some(Tick::MAX - 100));
        assert_eq!(timeline.end_of_piece(), Tick::MAX);

        // The long element overlaps the new one and is cut back to it
        timeline.add_figured_bass(0, 960, Some(240));
        assert_eq!(timeline.figured_bass(0, 480).map(|fb| fb.ticks()), Some(480));
        assert_eq!(timeline.end_of_piece(), 1200);
    }
}
