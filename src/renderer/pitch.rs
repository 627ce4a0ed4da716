//! Pitch → line mapping for the staff-less notation.
//!
//! C0 (MIDI 12) sits on line 0 and each natural step adds one line, so an
//! octave spans seven lines. Black keys share the line of the natural
//! below them unless they are spelled as flats, in which case they move up
//! to the natural above.

use serde::Serialize;

use crate::preferences::AccidentalDisplay;
use super::constants::LINES_PER_OCTAVE;

/// Line offset of each pitch class within its octave (C, C#, D, ... B).
const PITCH_CLASS_LINE: [i32; 12] = [0, 0, 1, 1, 2, 3, 3, 4, 4, 5, 5, 6];

/// Black keys.
const PITCH_CLASS_ACCIDENTAL: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Flat,
    Natural,
    Sharp,
}

fn pitch_class(pitch: i32) -> usize {
    pitch.rem_euclid(12) as usize
}

/// Line of a pitch spelled with its natural or sharp name.
pub fn line_of(pitch: i32) -> i32 {
    let octave = pitch.div_euclid(12) - 1;
    octave * LINES_PER_OCTAVE + PITCH_CLASS_LINE[pitch_class(pitch)]
}

/// Accidental a pitch gets under a key signature: black keys are sharps in
/// sharp (or empty) keys and flats in flat keys.
pub fn accidental_of(pitch: i32, key_fifths: i32) -> Accidental {
    if !PITCH_CLASS_ACCIDENTAL[pitch_class(pitch)] {
        Accidental::Natural
    } else if key_fifths >= 0 {
        Accidental::Sharp
    } else {
        Accidental::Flat
    }
}

/// Line a note is drawn on once the accidental display mode is applied.
pub fn display_line(pitch: i32, key_fifths: i32, display: AccidentalDisplay) -> i32 {
    let line = line_of(pitch);
    let accidental = accidental_of(pitch, key_fifths);
    let raised = match display {
        AccidentalDisplay::Auto => accidental == Accidental::Flat,
        AccidentalDisplay::Flat => accidental != Accidental::Natural,
        AccidentalDisplay::Sharp => false,
    };
    if raised {
        line + 1
    } else {
        line
    }
}
