//! Note heads and duration bars.

use std::f64::consts::SQRT_2;

use crate::model::Note;
use crate::preferences::{AccidentalDisplay, LayoutPreferences, ShapeKind};
use super::constants::*;
use super::pitch::{accidental_of, Accidental};
use super::primitives::{DurationBar, NoteHead, PathCommand, Primitive, Stroke};
use super::signatures::ResolvedSignature;
use super::PassContext;

// ═══════════════════════════════════════════════════════════════════════
// Note heads
// ═══════════════════════════════════════════════════════════════════════

/// Pick the head shape for an accidental class.
///
/// Under `Auto` the accidental (already resolved against the key) decides;
/// a forced spelling uses the same shape for every black key.
pub(super) fn select_shape(
    accidental: Accidental,
    display: AccidentalDisplay,
    prefs: &LayoutPreferences,
) -> ShapeKind {
    match (accidental, display) {
        (Accidental::Natural, _) => prefs.natural_note_shape,
        (Accidental::Sharp, AccidentalDisplay::Auto) => prefs.sharp_note_shape,
        (Accidental::Flat, AccidentalDisplay::Auto) => prefs.flat_note_shape,
        (_, AccidentalDisplay::Sharp) => prefs.sharp_note_shape,
        (_, AccidentalDisplay::Flat) => prefs.flat_note_shape,
    }
}

/// Primitives for a head of `size` centred on (`x`, `y`).
pub(super) fn shape_primitives(shape: ShapeKind, x: f64, y: f64, size: f64, color: &str) -> Vec<Primitive> {
    let half = size / 2.0;
    let tri_height = size * 3f64.sqrt() / 2.0;
    let inset = HEAD_STROKE_WIDTH / 2.0;
    let outline = |width: f64| Stroke {
        color: color.to_string(),
        width,
    };

    match shape {
        ShapeKind::TriangleUp => vec![Primitive::Polygon {
            points: vec![
                (x, y - tri_height / 2.0),
                (x + half, y + tri_height / 2.0),
                (x - half, y + tri_height / 2.0),
            ],
            fill: color.to_string(),
        }],
        ShapeKind::TriangleDown => vec![Primitive::Polygon {
            points: vec![
                (x, y + tri_height / 2.0),
                (x + half, y - tri_height / 2.0),
                (x - half, y - tri_height / 2.0),
            ],
            fill: color.to_string(),
        }],
        ShapeKind::Circle => vec![Primitive::Circle {
            cx: x,
            cy: y,
            r: half,
            fill: Some(color.to_string()),
            stroke: None,
        }],
        ShapeKind::HollowCircle => vec![Primitive::Circle {
            cx: x,
            cy: y,
            r: (size - HEAD_STROKE_WIDTH) / 2.0,
            fill: None,
            stroke: Some(outline(HEAD_STROKE_WIDTH)),
        }],
        ShapeKind::Square => vec![Primitive::Rect {
            x: x - half + inset,
            y: y - half + inset,
            width: size - HEAD_STROKE_WIDTH,
            height: size - HEAD_STROKE_WIDTH,
            fill: Some(color.to_string()),
            stroke: None,
        }],
        ShapeKind::HollowSquare => vec![Primitive::Rect {
            x: x - half + inset,
            y: y - half + inset,
            width: size - HEAD_STROKE_WIDTH,
            height: size - HEAD_STROKE_WIDTH,
            fill: None,
            stroke: Some(outline(HEAD_STROKE_WIDTH)),
        }],
        ShapeKind::CrossCircle => {
            let arm = half / SQRT_2;
            vec![
                Primitive::Circle {
                    cx: x,
                    cy: y,
                    r: (size - CROSS_STROKE_WIDTH) / 2.0,
                    fill: None,
                    stroke: Some(outline(CROSS_STROKE_WIDTH)),
                },
                Primitive::Line {
                    x1: x - arm,
                    y1: y - arm,
                    x2: x + arm,
                    y2: y + arm,
                    stroke: outline(CROSS_STROKE_WIDTH),
                },
                Primitive::Line {
                    x1: x - arm,
                    y1: y + arm,
                    x2: x + arm,
                    y2: y - arm,
                    stroke: outline(CROSS_STROKE_WIDTH),
                },
            ]
        }
    }
}

/// Head for a note, or `None` for a tie continuation (its head was drawn
/// at the note that started the tie).
pub(super) fn note_head(
    ctx: &PassContext,
    track: usize,
    note: &Note,
    sig: ResolvedSignature,
    beat_width: f64,
) -> Option<NoteHead> {
    if note.tie_stop() {
        return None;
    }

    let size = ctx.params.note_size;
    let accidental = accidental_of(note.pitch, sig.key_fifths);
    let shape = select_shape(accidental, ctx.prefs.accidental_display, ctx.prefs);
    let line = ctx.line_offset(note.pitch, sig.key_fifths);

    let cx = beat_width * note.time + size / 2.0;
    let cy = ctx.baseline() - line as f64 * size / 2.0;
    let color = ctx.prefs.note_symbol_color.css();

    Some(NoteHead {
        track,
        pitch: note.pitch,
        accidental,
        shape,
        cx,
        cy,
        size,
        parts: shape_primitives(shape, cx, cy, size, color),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Duration bars
// ═══════════════════════════════════════════════════════════════════════

/// Corner treatment of a duration bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BarCorners {
    pub(super) radius_start: f64,
    pub(super) radius_end: f64,
    pub(super) pointed_end: bool,
}

/// Corner radii from the bar width and tie state.
///
/// A tie continuation gets a square leading edge and a tie start a square
/// trailing edge, so chained bars join seamlessly. A bar that runs off the
/// end of its row ends in a point instead of a cap.
pub(super) fn bar_corners(
    note_size: f64,
    bar_width: f64,
    tie_start: bool,
    tie_stop: bool,
    spans_row: bool,
) -> BarCorners {
    let rounding = note_size.min(bar_width).max(0.0);
    let mut radius_start = rounding / 4.0;
    let mut radius_end = rounding / 2.0;

    if tie_start {
        radius_end = 0.0;
    }
    if tie_stop {
        radius_start = 0.0;
    }

    BarCorners {
        radius_start,
        radius_end,
        pointed_end: spans_row,
    }
}

/// Whether a tied note continues onto the next row.
pub(super) fn note_spans_row(note: &Note, beats: u32, ends_row: bool) -> bool {
    note.tie_start() && ends_row && note.end_time() >= beats as f64
}

/// Closed outline of a bar from `x_start` to `x_end` whose top edge is `top`.
pub(super) fn bar_outline(x_start: f64, x_end: f64, top: f64, height: f64, corners: BarCorners) -> Vec<PathCommand> {
    let rs = corners.radius_start;
    let re = corners.radius_end;
    let half = height / 2.0;

    let mut path = vec![
        PathCommand::MoveTo { x: x_start + rs, y: top },
        PathCommand::HorizontalTo { x: x_end - re },
    ];

    if corners.pointed_end {
        path.extend([
            PathCommand::LineBy { dx: re, dy: re },
            PathCommand::LineBy { dx: half - re, dy: half - re },
            PathCommand::LineBy { dx: -half + re, dy: half - re },
            PathCommand::LineBy { dx: -re, dy: re },
        ]);
    } else {
        path.extend([
            PathCommand::ArcBy { r: re, sweep: true, dx: re, dy: re },
            PathCommand::VerticalBy { dy: height - 2.0 * re },
            PathCommand::ArcBy { r: re, sweep: true, dx: -re, dy: re },
        ]);
    }

    path.extend([
        PathCommand::HorizontalTo { x: x_start + rs },
        PathCommand::ArcBy { r: rs, sweep: true, dx: -rs, dy: -rs },
        PathCommand::VerticalBy { dy: -height + 2.0 * rs },
        PathCommand::ArcBy { r: rs, sweep: true, dx: rs, dy: -rs },
        PathCommand::Close,
    ]);

    path
}

pub(super) fn duration_bar(
    ctx: &PassContext,
    track: usize,
    note: &Note,
    sig: ResolvedSignature,
    beat_width: f64,
    ends_row: bool,
) -> DurationBar {
    let size = ctx.params.note_size;
    let line = ctx.line_offset(note.pitch, sig.key_fifths);

    let x_start = beat_width * note.time;
    let x_end = beat_width * note.end_time();
    let top = ctx.baseline() - (line + 1) as f64 * size / 2.0;

    let spans_row = note_spans_row(note, sig.beats, ends_row);
    let corners = bar_corners(size, x_end - x_start, note.tie_start(), note.tie_stop(), spans_row);

    DurationBar {
        track,
        pitch: note.pitch,
        line,
        x_start,
        x_end,
        top,
        height: size,
        radius_start: corners.radius_start,
        radius_end: corners.radius_end,
        pointed_end: corners.pointed_end,
        spans_row,
        color: ctx.prefs.note_duration_color.css().to_string(),
        opacity: DURATION_OPACITY,
        outline: bar_outline(x_start, x_end, top, size, corners),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tie;

    const SIZE: f64 = 20.0;

    #[test]
    fn corner_table_covers_every_tie_state() {
        // (tie_start, tie_stop, spans_row) -> (radius_start, radius_end, pointed)
        let cases = [
            ((false, false, false), (5.0, 10.0, false)),
            ((false, false, true), (5.0, 10.0, true)),
            ((false, true, false), (0.0, 10.0, false)),
            ((false, true, true), (0.0, 10.0, true)),
            ((true, false, false), (5.0, 0.0, false)),
            ((true, false, true), (5.0, 0.0, true)),
            ((true, true, false), (0.0, 0.0, false)),
            ((true, true, true), (0.0, 0.0, true)),
        ];
        for ((start, stop, spans), (rs, re, pointed)) in cases {
            let c = bar_corners(SIZE, 110.0, start, stop, spans);
            assert_eq!(
                (c.radius_start, c.radius_end, c.pointed_end),
                (rs, re, pointed),
                "start={start} stop={stop} spans={spans}"
            );
        }
    }

    #[test]
    fn short_bars_round_less() {
        let c = bar_corners(SIZE, 8.0, false, false, false);
        assert_eq!(c.radius_start, 2.0);
        assert_eq!(c.radius_end, 4.0);
        let degenerate = bar_corners(SIZE, -3.0, false, false, false);
        assert_eq!(degenerate.radius_start, 0.0);
        assert_eq!(degenerate.radius_end, 0.0);
    }

    #[test]
    fn spanning_requires_tie_start_last_slot_and_full_measure() {
        let tied = Note::new(60, 2.0, 2.0).with_ties(&[Tie::Start]);
        assert!(note_spans_row(&tied, 4, true));
        assert!(!note_spans_row(&tied, 4, false));
        assert!(!note_spans_row(&tied, 5, true));
        let untied = Note::new(60, 2.0, 2.0);
        assert!(!note_spans_row(&untied, 4, true));
        let chained = Note::new(60, 0.0, 4.0).with_ties(&[Tie::Stop, Tie::Start]);
        assert!(note_spans_row(&chained, 4, true));
    }

    #[test]
    fn rounded_outline_closes_vertically() {
        let corners = bar_corners(SIZE, 110.0, false, false, false);
        let path = bar_outline(0.0, 110.0, 50.0, SIZE, corners);
        let dy: f64 = path
            .iter()
            .map(|c| match *c {
                PathCommand::LineBy { dy, .. }
                | PathCommand::VerticalBy { dy }
                | PathCommand::ArcBy { dy, .. } => dy,
                _ => 0.0,
            })
            .sum();
        assert!(dy.abs() < 1e-9);
        assert_eq!(path.first(), Some(&PathCommand::MoveTo { x: 5.0, y: 50.0 }));
        assert_eq!(path[1], PathCommand::HorizontalTo { x: 100.0 });
        assert_eq!(path.last(), Some(&PathCommand::Close));
    }

    #[test]
    fn pointed_outline_reaches_half_a_glyph_past_the_end() {
        let corners = bar_corners(SIZE, 110.0, true, false, true);
        let path = bar_outline(0.0, 110.0, 50.0, SIZE, corners);
        assert_eq!(path[1], PathCommand::HorizontalTo { x: 110.0 });
        assert_eq!(path[2], PathCommand::LineBy { dx: 0.0, dy: 0.0 });
        assert_eq!(path[3], PathCommand::LineBy { dx: 10.0, dy: 10.0 });
        assert_eq!(path[4], PathCommand::LineBy { dx: -10.0, dy: 10.0 });
        assert!(!path.iter().take(6).any(|c| matches!(c, PathCommand::ArcBy { .. })));
    }

    #[test]
    fn shape_selection() {
        let prefs = LayoutPreferences::default();
        use AccidentalDisplay::*;
        assert_eq!(select_shape(Accidental::Natural, Flat, &prefs), prefs.natural_note_shape);
        assert_eq!(select_shape(Accidental::Sharp, Auto, &prefs), prefs.sharp_note_shape);
        assert_eq!(select_shape(Accidental::Flat, Auto, &prefs), prefs.flat_note_shape);
        assert_eq!(select_shape(Accidental::Flat, Sharp, &prefs), prefs.sharp_note_shape);
        assert_eq!(select_shape(Accidental::Sharp, Flat, &prefs), prefs.flat_note_shape);
    }

    #[test]
    fn every_shape_draws_something_centred() {
        for shape in ShapeKind::ALL {
            let parts = shape_primitives(shape, 100.0, 40.0, SIZE, "#000000");
            assert!(!parts.is_empty(), "{shape:?}");
        }
        let cross = shape_primitives(ShapeKind::CrossCircle, 100.0, 40.0, SIZE, "#000000");
        assert_eq!(cross.len(), 3);
        match &shape_primitives(ShapeKind::Square, 100.0, 40.0, SIZE, "#000000")[0] {
            Primitive::Rect { x, y, width, height, .. } => {
                assert_eq!((*x, *y, *width, *height), (91.5, 31.5, 17.0, 17.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
