//! Layout engine — converts a Score into the display list of a staff-less
//! notation and renders it as SVG.
//!
//! A layout pass is a pure function of the score, the caption text, the
//! style preferences and the viewport width. It runs in fixed order:
//! preferences are resolved into parameters, signatures are read from the
//! reference track, the line range is scanned over every note, the
//! measures are partitioned into rows, and finally each measure is built.
//! Any failure aborts the pass and no partial layout is returned.

mod constants;
mod layout;
mod notes;
mod params;
mod pitch;
mod primitives;
mod range;
mod signatures;
mod staff;
mod svg_builder;

use log::debug;

use crate::error::LayoutError;
use crate::model::{Score, ScoreInfo};
use crate::preferences::LayoutPreferences;
use notes::{duration_bar, note_head};
use staff::{build_measure_frame, header_caption, row_prefix};
use svg_builder::{empty_svg, header_svg, row_svg, stacked_svg};

pub use layout::RowPlan;
pub use params::LayoutParams;
pub use pitch::{accidental_of, display_line, line_of, Accidental};
pub use primitives::{
    path_data, Baseline, DurationBar, HeaderLayout, MeasureLayout, NoteHead, PathCommand,
    Primitive, RowLayout, ScoreLayout, Stroke, TextAnchor,
};
pub use range::{is_reference_line, LineRange};
pub use signatures::{ResolvedSignature, Signatures};

// ═══════════════════════════════════════════════════════════════════════
// Pass context
// ═══════════════════════════════════════════════════════════════════════

/// Everything the geometry builders read, fixed for the whole pass.
pub(crate) struct PassContext<'a> {
    pub(crate) params: LayoutParams,
    pub(crate) plan: RowPlan,
    pub(crate) range: LineRange,
    /// Height of the line area of a row
    pub(crate) row_height: f64,
    pub(crate) prefs: &'a LayoutPreferences,
}

impl PassContext<'_> {
    /// Y of the lowest visible line within a row canvas.
    pub(crate) fn baseline(&self) -> f64 {
        self.params.measure_label_space + self.row_height
    }

    /// Line of a pitch counted up from the bottom of the row range.
    pub(crate) fn line_offset(&self, pitch: i32, key_fifths: i32) -> i32 {
        display_line(pitch, key_fifths, self.prefs.accidental_display) - self.range.min
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Lay out a score for a viewport `width` units wide.
///
/// Time and key signatures are read from the first track and apply to
/// every track.
pub fn layout_score(
    score: &Score,
    info: &ScoreInfo,
    prefs: &LayoutPreferences,
    width: f64,
) -> Result<ScoreLayout, LayoutError> {
    let params = LayoutParams::resolve(prefs)?;

    let reference = score
        .tracks
        .first()
        .ok_or_else(|| LayoutError::Range("no notes found".to_string()))?;
    let signatures = Signatures::for_track(reference)?;

    let range = LineRange::of_score(score, &signatures, prefs.accidental_display)?;
    let plan = RowPlan::new(score.measure_count(), &params, width)?;

    debug!(
        "layout: {} tracks, {} measures in {} rows, lines {}..={}, measure width {:.1}",
        score.tracks.len(),
        plan.measure_count,
        plan.row_count,
        range.min,
        range.max,
        plan.measure_width
    );

    let ctx = PassContext {
        params,
        plan,
        range,
        row_height: range.content_height(params.note_size),
        prefs,
    };

    let rows = (0..plan.row_count)
        .map(|row| layout_row(score, &ctx, &signatures, row, width))
        .collect();

    Ok(ScoreLayout {
        width,
        vertical_padding: params.vertical_padding,
        min_line: range.min,
        max_line: range.max,
        header: header_caption(info, width, params.row_padding),
        rows,
    })
}

/// Lay out and render into one SVG document with the canvases stacked.
pub fn render_score_to_svg(
    score: &Score,
    info: &ScoreInfo,
    prefs: &LayoutPreferences,
    width: f64,
) -> Result<String, LayoutError> {
    let layout = layout_score(score, info, prefs, width)?;
    Ok(stacked_svg(&layout))
}

/// Render a finished layout into one SVG document.
pub fn layout_to_svg(layout: &ScoreLayout) -> String {
    stacked_svg(layout)
}

/// Render each canvas separately: the header first, then one per row.
pub fn render_rows_to_svg(layout: &ScoreLayout) -> Vec<String> {
    std::iter::once(header_svg(&layout.header).build())
        .chain(layout.rows.iter().map(|row| row_svg(row).build()))
        .collect()
}

/// Placeholder document shown in place of a score that failed to lay out.
pub fn error_notice_svg(err: &LayoutError) -> String {
    empty_svg(&format!("{} ({})", err, err.category()))
}

/// Serialize a layout as JSON for hosts that draw it themselves.
pub fn layout_to_json(layout: &ScoreLayout) -> Result<String, serde_json::Error> {
    serde_json::to_string(layout)
}

// ═══════════════════════════════════════════════════════════════════════
// Rows and measures
// ═══════════════════════════════════════════════════════════════════════

fn layout_row(
    score: &Score,
    ctx: &PassContext,
    signatures: &Signatures,
    row: usize,
    width: f64,
) -> RowLayout {
    let first = ctx.plan.first_measure(row);
    let measures = (0..ctx.plan.measures_in_row(row))
        .map(|slot| {
            let index = first + slot;
            let x = ctx.plan.measure_x(slot, &ctx.params);
            layout_measure(score, ctx, index, signatures.at(index), x)
        })
        .collect();

    RowLayout {
        index: row,
        width,
        height: ctx.row_height + ctx.params.measure_label_space + ctx.params.line_height(),
        padding_bottom: ctx.params.row_padding,
        offset_x: ctx.plan.horizontal_padding,
        prefix: row_prefix(ctx),
        measures,
    }
}

fn layout_measure(
    score: &Score,
    ctx: &PassContext,
    index: usize,
    sig: ResolvedSignature,
    x: f64,
) -> MeasureLayout {
    let beat_width = ctx.plan.beat_width(sig.beats);
    let ends_row = ctx.plan.ends_row(index);

    let mut bars = Vec::new();
    let mut heads = Vec::new();
    for (track_idx, track) in score.tracks.iter().enumerate() {
        // Shorter tracks simply have nothing in the trailing measures.
        let Some(notes) = track.measures.get(index) else {
            continue;
        };
        for note in notes {
            bars.push(duration_bar(ctx, track_idx, note, sig, beat_width, ends_row));
            heads.extend(note_head(ctx, track_idx, note, sig, beat_width));
        }
    }

    MeasureLayout {
        index,
        x,
        y: 0.0,
        width: ctx.plan.measure_width,
        beats: sig.beats,
        key_fifths: sig.key_fifths,
        frame: build_measure_frame(ctx, index, sig),
        bars,
        heads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, Tie, Track};

    fn two_note_score() -> Score {
        let mut track = Track::new("P1");
        track.measures.push(vec![Note::new(60, 0.0, 2.0), Note::new(62, 2.0, 2.0)]);
        Score { tracks: vec![track] }
    }

    #[test]
    fn bars_follow_onsets_and_durations() {
        let layout = layout_score(
            &two_note_score(),
            &ScoreInfo::default(),
            &LayoutPreferences::default(),
            1000.0,
        )
        .unwrap();
        let m = &layout.rows[0].measures[0];
        assert_eq!(m.bars.len(), 2);
        assert_eq!((m.bars[0].x_start, m.bars[0].x_end), (0.0, 110.0));
        assert_eq!((m.bars[1].x_start, m.bars[1].x_end), (110.0, 220.0));
        assert_eq!(m.bars[0].line, 0);
        assert_eq!(m.bars[1].line, 1);
        assert_eq!(m.heads.len(), 2);
        assert_eq!(m.heads[0].cx, 10.0);
    }

    #[test]
    fn tie_continuations_draw_bars_but_no_heads() {
        let mut track = Track::new("P1");
        track.measures.push(vec![Note::new(60, 2.0, 2.0).with_ties(&[Tie::Start])]);
        track.measures.push(vec![Note::new(60, 0.0, 2.0).with_ties(&[Tie::Stop])]);
        let score = Score { tracks: vec![track] };
        let prefs = LayoutPreferences::default();
        let layout = layout_score(&score, &ScoreInfo::default(), &prefs, 1000.0).unwrap();
        let measures: Vec<_> = layout.measures().collect();
        assert_eq!(measures[0].heads.len(), 1);
        assert_eq!(measures[1].heads.len(), 0);
        assert_eq!(measures[1].bars.len(), 1);
        assert_eq!(measures[1].bars[0].radius_start, 0.0);
    }

    #[test]
    fn no_tracks_is_a_range_error() {
        let prefs = LayoutPreferences::default();
        let err = layout_score(&Score::new(), &ScoreInfo::default(), &prefs, 1000.0).unwrap_err();
        assert_eq!(err.category(), "range");
    }

    #[test]
    fn row_canvases_render_header_first() {
        let layout = layout_score(
            &two_note_score(),
            &ScoreInfo::default(),
            &LayoutPreferences::default(),
            1000.0,
        )
        .unwrap();
        let canvases = render_rows_to_svg(&layout);
        assert_eq!(canvases.len(), 2);
        assert!(canvases[0].contains("60 bpm"));
        assert!(canvases[1].contains("<path"));
    }
}
