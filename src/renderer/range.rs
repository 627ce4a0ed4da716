//! Vertical extent of a row, derived from the pitch range of the piece.

use crate::error::LayoutError;
use crate::model::Score;
use crate::preferences::AccidentalDisplay;
use super::constants::LINES_PER_OCTAVE;
use super::pitch::display_line;
use super::signatures::Signatures;

/// Highest valid MIDI pitch.
const MAX_PITCH: i32 = 127;

/// Inclusive line range shown in every row, bounded by reference lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub min: i32,
    pub max: i32,
}

/// C and F lines are drawn in color and anchor the range.
pub fn is_reference_line(line: i32) -> bool {
    matches!(line.rem_euclid(LINES_PER_OCTAVE), 0 | 3)
}

fn snap_down(mut line: i32) -> i32 {
    while !is_reference_line(line) {
        line -= 1;
    }
    line
}

fn snap_up(mut line: i32) -> i32 {
    while !is_reference_line(line) {
        line += 1;
    }
    line
}

impl LineRange {
    /// Scan every note of every track and derive the visible range.
    ///
    /// The lowest and highest pitches are found first and only then mapped
    /// to lines, using the opening key of the reference track. A later key
    /// change does not move the range, so a flat spelled after the change
    /// may sit one line above it.
    pub fn of_score(
        score: &Score,
        signatures: &Signatures,
        display: AccidentalDisplay,
    ) -> Result<Self, LayoutError> {
        let mut pitches: Option<(i32, i32)> = None;

        for note in score.notes() {
            if !(0..=MAX_PITCH).contains(&note.pitch) {
                return Err(LayoutError::Range(format!(
                    "pitch {} is outside the MIDI range",
                    note.pitch
                )));
            }
            pitches = Some(match pitches {
                Some((lo, hi)) => (lo.min(note.pitch), hi.max(note.pitch)),
                None => (note.pitch, note.pitch),
            });
        }

        let (lowest, highest) =
            pitches.ok_or_else(|| LayoutError::Range("no notes found".to_string()))?;
        let key_fifths = signatures.at(0).key_fifths;
        Ok(Self::snapped(
            display_line(lowest, key_fifths, display),
            display_line(highest, key_fifths, display),
        ))
    }

    /// Snap outward to reference lines and guarantee a usable height.
    ///
    /// A range that collapses onto a single reference line is widened by
    /// three lines on one side and four on the other, depending on whether
    /// each end sits on a C or an F line.
    pub fn snapped(min_line: i32, max_line: i32) -> Self {
        let mut min = snap_down(min_line);
        let mut max = snap_up(max_line);

        if (max - min).abs() <= 1 {
            max += if max.rem_euclid(LINES_PER_OCTAVE) == 0 { 3 } else { 4 };
            min -= if min.rem_euclid(LINES_PER_OCTAVE) == 0 { 4 } else { 3 };
        }

        Self { min, max }
    }

    pub fn span(&self) -> i32 {
        self.max - self.min
    }

    /// Height of the row content area (excluding labels).
    pub fn content_height(&self, note_size: f64) -> f64 {
        self.span() as f64 * note_size / 2.0
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<i32> {
        self.min..=self.max
    }
}
