//! Shared constants for the layout engine (all in canvas user units).

// ── Strokes ─────────────────────────────────────────────────────────
pub(super) const STROKE_WIDTH: f64 = 2.0; // lines, frame bars, ticks
pub(super) const TICK_SIZE: f64 = 7.0; // beat tick length above a line
pub(super) const HEAD_STROKE_WIDTH: f64 = 3.0; // hollow circle / square outlines
pub(super) const CROSS_STROKE_WIDTH: f64 = 2.0; // crossed circle outline and cross

// ── Vertical spacing ────────────────────────────────────────────────
pub(super) const VERTICAL_PADDING: f64 = 30.0; // above the header, below the last row
pub(super) const MEASURE_LABEL_SPACE: f64 = 15.0; // measure numbers above the frame

// Grand staff distance (space between two clefs)
pub(super) const DYNAMICS_SPACE: f64 = 20.0;
pub(super) const LYRICS_SPACE: f64 = 20.0;
pub(super) const STAFF_PADDING: f64 = 5.0;

// ── Pitch geometry ──────────────────────────────────────────────────
pub(super) const LINES_PER_OCTAVE: i32 = 7;

// ── Header caption ──────────────────────────────────────────────────
pub(super) const HEADER_HEIGHT: f64 = 180.0;
pub(super) const TITLE_Y: f64 = 50.0;
pub(super) const TITLE_SIZE: f64 = 40.0;
pub(super) const CAPTION_Y: f64 = 170.0;
pub(super) const CAPTION_INSET: f64 = 70.0;
pub(super) const CAPTION_SIZE: f64 = 25.0;
pub(super) const DEFAULT_TEMPO_BPM: f64 = 60.0;

// ── Glyphs ──────────────────────────────────────────────────────────
pub(super) const STAFF_LABEL_GLYPH: &str = "𝒯";
pub(super) const STAFF_LABEL_FONT_SCALE: f64 = 1.5;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const FRAME_COLOR: &str = "#000000";
pub(super) const TEXT_COLOR: &str = "#000000";
pub(super) const C_LINE_COLOR: &str = "red";
pub(super) const F_LINE_COLOR: &str = "blue";
pub(super) const DURATION_OPACITY: f64 = 0.5;
