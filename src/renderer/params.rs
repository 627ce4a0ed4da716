//! Resolves style preferences into the numeric constants of one layout pass.

use crate::error::LayoutError;
use crate::preferences::{LayoutPreferences, Scale, Spacing};
use super::constants::*;

/// Flat record of every dimension the geometry builders read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Width/height of a note glyph; two lines per diameter
    pub note_size: f64,
    pub stroke_width: f64,
    pub tick_size: f64,
    pub vertical_padding: f64,
    /// Gap below each row
    pub row_padding: f64,
    pub measure_label_space: f64,
    /// Distance between two staves of a grand staff
    pub staff_distance: f64,
    /// Left/right padding before centering
    pub horizontal_padding: f64,
    pub staff_label_space: f64,
    pub octave_label_space: f64,
    pub measures_per_row: usize,
}

impl LayoutParams {
    pub fn resolve(prefs: &LayoutPreferences) -> Result<Self, LayoutError> {
        prefs.validate()?;

        Ok(Self {
            note_size: note_scale(prefs.note_scale),
            stroke_width: STROKE_WIDTH,
            tick_size: TICK_SIZE,
            vertical_padding: VERTICAL_PADDING,
            row_padding: vertical_spacing(prefs.vertical_spacing),
            measure_label_space: MEASURE_LABEL_SPACE,
            staff_distance: DYNAMICS_SPACE + LYRICS_SPACE + 2.0 * STAFF_PADDING,
            horizontal_padding: horizontal_spacing(prefs.horizontal_spacing),
            staff_label_space: staff_scale(prefs.staff_scale),
            octave_label_space: MEASURE_LABEL_SPACE,
            measures_per_row: prefs.measures_per_row as usize,
        })
    }

    /// Half a glyph diameter: the height of one line step.
    pub fn line_height(&self) -> f64 {
        self.note_size / 2.0
    }

    /// Horizontal space taken by the label columns left of the first measure.
    pub fn label_columns(&self) -> f64 {
        self.staff_label_space + self.octave_label_space
    }
}

fn note_scale(scale: Scale) -> f64 {
    match scale {
        Scale::Small => 15.0,
        Scale::Medium => 20.0,
        Scale::Large => 25.0,
    }
}

fn staff_scale(scale: Scale) -> f64 {
    match scale {
        Scale::Small => 18.0,
        Scale::Medium => 25.0,
        Scale::Large => 32.0,
    }
}

fn vertical_spacing(spacing: Spacing) -> f64 {
    match spacing {
        Spacing::Narrow => 10.0,
        Spacing::Moderate => 30.0,
        Spacing::Wide => 50.0,
    }
}

fn horizontal_spacing(spacing: Spacing) -> f64 {
    match spacing {
        Spacing::Narrow => 20.0,
        Spacing::Moderate => 40.0,
        Spacing::Wide => 60.0,
    }
}
