// Stack layout against a score timeline

use figured_bass::models::elements::{DigitStyle, DigitVariant, Modifier};
use figured_bass::renderers::layout::{align_offsets, compute_stack_layout};
use figured_bass::{
    FiguredBass, FiguredBassFont, FiguredBassStyle, FontRegistry, LayoutContext, MonospaceMeasure,
    ScoreTimeline,
};

fn ascii_registry() -> FontRegistry {
    FontRegistry::new(vec![FiguredBassFont::ascii()]).unwrap()
}

fn ascii_style() -> FiguredBassStyle {
    FiguredBassStyle {
        font_name: "ASCII".to_string(),
        ..FiguredBassStyle::default()
    }
}

#[test]
fn test_widest_prefix_gets_zero_offset() {
    assert_eq!(align_offsets(&[0.0, 3.0, 5.0]), vec![5.0, 2.0, 0.0]);
}

#[test]
fn test_line_spans_to_next_onset_not_ticks() {
    let fonts = ascii_registry();
    let style = ascii_style();
    let measure = MonospaceMeasure::new(1.0);

    let mut timeline = ScoreTimeline::new(1.0);
    timeline.add_chord_rest(0, 0, 960);
    timeline.add_chord_rest(0, 960, 960);
    let (fb, created) = timeline.add_figured_bass(0, 0, Some(480));
    assert!(created);
    fb.set_text("6_").unwrap();

    let layouts = timeline.layout_all(&fonts, &style, &measure);
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].line_lengths(), vec![960.0]);
    assert_eq!(timeline.figured_bass(0, 0).unwrap().line_length(0), 960.0);
}

#[test]
fn test_line_stops_at_next_figured_bass() {
    let fonts = ascii_registry();
    let style = ascii_style();
    let measure = MonospaceMeasure::new(1.0);

    let mut timeline = ScoreTimeline::new(1.0);
    timeline.add_chord_rest(0, 0, 1920);
    timeline.add_figured_bass(0, 0, None).0.set_text("5_\n3_").unwrap();
    timeline.add_figured_bass(0, 960, None).0.set_text("6\n4").unwrap();

    assert_eq!(timeline.figured_bass(0, 0).unwrap().ticks(), 960);
    let layouts = timeline.layout_all(&fonts, &style, &measure);
    assert_eq!(layouts[0].line_lengths(), vec![960.0, 960.0]);
    assert_eq!(layouts[1].line_lengths(), vec![0.0, 0.0]);
}

#[test]
fn test_figured_bass_on_other_staff_does_not_stop_line() {
    let fonts = ascii_registry();
    let style = ascii_style();
    let measure = MonospaceMeasure::new(1.0);

    let mut timeline = ScoreTimeline::new(1.0);
    timeline.add_chord_rest(0, 0, 960);
    timeline.add_chord_rest(1, 0, 960);
    timeline.add_figured_bass(0, 0, None).0.set_text("4_").unwrap();
    timeline.add_figured_bass(1, 480, None).0.set_text("6").unwrap();

    let layouts = timeline.layout_all(&fonts, &style, &measure);
    assert_eq!(layouts[0].line_lengths(), vec![960.0]);
}

#[test]
fn test_line_extends_to_end_of_piece() {
    let fonts = ascii_registry();
    let style = ascii_style();
    let measure = MonospaceMeasure::new(1.0);

    let mut timeline = ScoreTimeline::new(0.25);
    timeline.set_end_of_piece(1920);
    timeline.add_figured_bass(0, 480, Some(480)).0.set_text("7_").unwrap();

    let layouts = timeline.layout_all(&fonts, &style, &measure);
    assert_eq!(layouts[0].line_lengths(), vec![360.0]);
}

#[test]
fn test_digits_share_a_column_with_custom_font() {
    let font = FiguredBassFont::new("Test", "Test", 10.0, 1.5)
        .with_modifier(Modifier::Sharp, 'S')
        .with_modifier(Modifier::DoubleFlat, 'D')
        .with_digit(DigitStyle::Modern, 6, DigitVariant::Plain, '6')
        .with_digit(DigitStyle::Modern, 4, DigitVariant::Plain, '4');
    let fonts = FontRegistry::new(vec![font]).unwrap();
    let style = FiguredBassStyle {
        font_name: "Test".to_string(),
        font_size: 10.0,
        ..FiguredBassStyle::default()
    };
    let measure = MonospaceMeasure::new(2.0);
    let timeline = ScoreTimeline::new(1.0);

    let fb = FiguredBass::from_text(0, 0, 480, "6\n#4\n(bb)");
    let ctx = LayoutContext {
        fonts: &fonts,
        style: &style,
        measure: &measure,
        timeline: &timeline,
    };
    let layout = compute_stack_layout(&fb, &ctx);

    let texts: Vec<&str> = layout.items.iter().map(|i| i.display.text.as_str()).collect();
    assert_eq!(texts, vec!["6", "S4", "(D)"]);
    assert_eq!(layout.offsets(), vec![2.0, 0.0, 0.0]);
    assert_eq!(layout.line_height, 15.0);
    assert_eq!(layout.items[2].y, 30.0);
}

#[test]
fn test_literal_text_lays_out_nothing() {
    let fonts = ascii_registry();
    let style = ascii_style();
    let measure = MonospaceMeasure::new(1.0);
    let mut timeline = ScoreTimeline::new(1.0);
    timeline.add_chord_rest(0, 0, 480);
    timeline.add_figured_bass(0, 0, None).0.set_text("tasto solo").unwrap_err();

    let layouts = timeline.layout_all(&fonts, &style, &measure);
    assert!(layouts[0].items.is_empty());
}
