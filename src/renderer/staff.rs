//! Measure frames, row prefixes and the header caption.

use crate::model::ScoreInfo;
use super::constants::*;
use super::primitives::{Baseline, HeaderLayout, Primitive, TextAnchor};
use super::range::is_reference_line;
use super::signatures::ResolvedSignature;
use super::PassContext;

// ═══════════════════════════════════════════════════════════════════════
// Header rendering
// ═══════════════════════════════════════════════════════════════════════

/// Title centred at the top, tempo bottom-left, author bottom-right.
pub(super) fn header_caption(info: &ScoreInfo, width: f64, padding_bottom: f64) -> HeaderLayout {
    let tempo = info.tempo_bpm.unwrap_or(DEFAULT_TEMPO_BPM);

    let elements = vec![
        Primitive::text(width / 2.0, TITLE_Y, info.title.as_str(), TITLE_SIZE)
            .aligned(TextAnchor::Middle, Baseline::Hanging),
        Primitive::text(CAPTION_INSET, CAPTION_Y, format!("{} bpm", format_bpm(tempo)), CAPTION_SIZE),
        Primitive::text(width - CAPTION_INSET, CAPTION_Y, info.author.as_str(), CAPTION_SIZE)
            .aligned(TextAnchor::End, Baseline::Auto),
    ];

    HeaderLayout {
        width,
        height: HEADER_HEIGHT,
        padding_bottom,
        elements,
    }
}

fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{:.0}", bpm)
    } else {
        format!("{}", bpm)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Row prefix
// ═══════════════════════════════════════════════════════════════════════

/// Staff label and the boundary bar left of the first measure.
pub(super) fn row_prefix(ctx: &PassContext) -> Vec<Primitive> {
    let p = &ctx.params;
    let sw = p.stroke_width;

    vec![
        Primitive::text(
            p.staff_label_space,
            p.measure_label_space + ctx.row_height / 2.0,
            STAFF_LABEL_GLYPH,
            p.staff_label_space * STAFF_LABEL_FONT_SCALE,
        )
        .aligned(TextAnchor::End, Baseline::Middle),
        Primitive::filled_rect(
            p.label_columns() - sw / 2.0,
            p.measure_label_space - sw / 2.0,
            sw,
            ctx.row_height + sw,
            FRAME_COLOR,
        ),
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// Measure frame
// ═══════════════════════════════════════════════════════════════════════

fn reference_color(line: i32) -> &'static str {
    if line.rem_euclid(LINES_PER_OCTAVE) == 0 {
        C_LINE_COLOR
    } else {
        F_LINE_COLOR
    }
}

/// Measure number, right boundary bar, reference lines and beat ticks.
///
/// Coordinates are local to the measure group. Octave numbers hang off the
/// C lines of the first measure in each row, left of the row's boundary.
pub(super) fn build_measure_frame(
    ctx: &PassContext,
    measure: usize,
    sig: ResolvedSignature,
) -> Vec<Primitive> {
    let p = &ctx.params;
    let sw = p.stroke_width;
    let mls = p.measure_label_space;
    let mw = ctx.plan.measure_width;
    let labels_octaves = ctx.plan.starts_row(measure);

    let mut frame = vec![
        Primitive::text(sw, mls - sw, (measure + 1).to_string(), mls),
        Primitive::filled_rect(mw - sw / 2.0, mls - sw / 2.0, sw, ctx.row_height + sw, FRAME_COLOR),
    ];

    for line in ctx.range.lines().filter(|&l| is_reference_line(l)) {
        let line_y = ctx.baseline() - (line - ctx.range.min) as f64 * p.line_height();
        let color = reference_color(line);

        frame.push(Primitive::filled_rect(sw / 2.0, line_y - sw / 2.0, mw - sw, sw, color));

        if labels_octaves && color == C_LINE_COLOR {
            frame.push(
                Primitive::text(-sw, line_y, line.div_euclid(LINES_PER_OCTAVE).to_string(), mls)
                    .aligned(TextAnchor::End, Baseline::Middle),
            );
        }

        // The top line has nothing above it to tick into.
        if line < ctx.range.max {
            for beat in 1..sig.beats {
                let tick_x = mw / sig.beats as f64 * beat as f64;
                frame.push(Primitive::filled_rect(
                    tick_x - sw / 2.0,
                    line_y - p.tick_size,
                    sw,
                    p.tick_size - sw / 2.0,
                    FRAME_COLOR,
                ));
            }
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::LayoutPreferences;
    use crate::renderer::{LayoutParams, LineRange, RowPlan};

    #[test]
    fn header_uses_default_tempo() {
        let info = ScoreInfo {
            title: "Etude".into(),
            author: "Anon".into(),
            tempo_bpm: None,
        };
        let header = header_caption(&info, 1000.0, 30.0);
        assert_eq!(header.height, 180.0);
        assert_eq!(header.elements.len(), 3);
        match &header.elements[1] {
            Primitive::Text { content, x, y, .. } => {
                assert_eq!(content, "60 bpm");
                assert_eq!((*x, *y), (70.0, 170.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &header.elements[2] {
            Primitive::Text { x, anchor, .. } => {
                assert_eq!(*x, 930.0);
                assert_eq!(*anchor, TextAnchor::End);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn row_prefix_places_label_and_boundary() {
        let prefs = LayoutPreferences::default();
        let params = LayoutParams::resolve(&prefs).unwrap();
        let range = LineRange { min: 28, max: 35 };
        let ctx = PassContext {
            params,
            plan: RowPlan::new(1, &params, 1000.0).unwrap(),
            range,
            row_height: range.content_height(params.note_size),
            prefs: &prefs,
        };

        let prefix = row_prefix(&ctx);
        assert_eq!(prefix.len(), 2);
        match &prefix[0] {
            Primitive::Text { x, y, size, anchor, baseline, .. } => {
                // Right-aligned in the staff-label column, centred on the 70 high line area.
                assert_eq!((*x, *y, *size), (25.0, 50.0, 37.5));
                assert_eq!((*anchor, *baseline), (TextAnchor::End, Baseline::Middle));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &prefix[1] {
            Primitive::Rect { x, y, width, height, fill, .. } => {
                assert_eq!((*x, *y, *width, *height), (39.0, 14.0, 2.0, 72.0));
                assert_eq!(fill.as_deref(), Some(FRAME_COLOR));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fractional_tempos_keep_their_fraction() {
        assert_eq!(format_bpm(92.5), "92.5");
        assert_eq!(format_bpm(120.0), "120");
    }

    #[test]
    fn c_lines_are_red() {
        assert_eq!(reference_color(28), C_LINE_COLOR);
        assert_eq!(reference_color(31), F_LINE_COLOR);
        assert_eq!(reference_color(-7), C_LINE_COLOR);
    }
}
