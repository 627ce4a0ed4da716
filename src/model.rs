//! Data model for a score as the layout engine sees it.
//!
//! The model is small: tracks of measures of notes, plus the
//! time and key signatures that activate at particular measures. Anything
//! the staff-less notation does not draw (clefs, stems, beams, lyrics) is
//! dropped at ingest.

use serde::{Deserialize, Serialize};

/// A complete score: one or more tracks laid out in parallel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub tracks: Vec<Track>,
}

/// One instrument or voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Part name (e.g., "Piano"); may be empty
    pub name: String,
    /// Ordered measures, each an ordered list of notes
    pub measures: Vec<Vec<Note>>,
    /// Time signatures with the measure index at which each becomes active
    pub time_signatures: Vec<TimeSignature>,
    /// Key signatures with the measure index at which each becomes active
    pub key_signatures: Vec<KeySignature>,
}

/// A pitched note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch (middle C = 60). Validated by the layout, not here.
    pub pitch: i32,
    /// Onset in beats from the start of the measure
    pub time: f64,
    /// Duration in beats
    pub duration: f64,
    /// Tie markers; a note in the middle of a tie chain carries both
    #[serde(default)]
    pub ties: Vec<Tie>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tie {
    Start,
    Stop,
}

/// Time signature numerator, active from `measure` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u32,
    pub measure: usize,
}

/// Key signature as a count of fifths, active from `measure` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    /// Number of sharps (positive) or flats (negative)
    pub fifths: i32,
    pub measure: usize,
}

/// Caption text extracted alongside the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInfo {
    pub title: String,
    pub author: String,
    pub tempo_bpm: Option<f64>,
}

impl Score {
    /// Create a new empty score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of measures in the longest track.
    pub fn measure_count(&self) -> usize {
        self.tracks
            .iter()
            .map(|t| t.measures.len())
            .max()
            .unwrap_or(0)
    }

    /// Iterate over every note of every track.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.tracks
            .iter()
            .flat_map(|t| t.measures.iter())
            .flat_map(|m| m.iter())
    }
}

impl Track {
    /// An empty track with 4 beats per measure and no sharps or flats.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measures: Vec::new(),
            time_signatures: vec![TimeSignature { beats: 4, measure: 0 }],
            key_signatures: vec![KeySignature { fifths: 0, measure: 0 }],
        }
    }
}

impl Note {
    pub fn new(pitch: i32, time: f64, duration: f64) -> Self {
        Self {
            pitch,
            time,
            duration,
            ties: Vec::new(),
        }
    }

    pub fn with_ties(mut self, ties: &[Tie]) -> Self {
        for &tie in ties {
            if !self.ties.contains(&tie) {
                self.ties.push(tie);
            }
        }
        self
    }

    pub fn tie_start(&self) -> bool {
        self.ties.contains(&Tie::Start)
    }

    pub fn tie_stop(&self) -> bool {
        self.ties.contains(&Tie::Stop)
    }

    /// Onset plus duration, in beats from the start of the measure.
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }
}
