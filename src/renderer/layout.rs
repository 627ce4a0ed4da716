//! Row partitioning — how measures are grouped into rows and how wide
//! each one is.
//!
//! Every measure gets the same width regardless of its beat count; only
//! the beat spacing inside it changes with the time signature. The last
//! row may hold fewer measures but keeps that width, so it stays aligned
//! with the rows above.

use crate::error::LayoutError;
use super::params::LayoutParams;

/// Horizontal coordinate system shared by all rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlan {
    pub measure_count: usize,
    pub measures_per_row: usize,
    pub row_count: usize,
    pub measure_width: f64,
    /// Left offset of each row's content, including the centering share
    pub horizontal_padding: f64,
    /// Width left for measures after padding and label columns
    pub available_width: f64,
}

impl RowPlan {
    pub fn new(measure_count: usize, params: &LayoutParams, width: f64) -> Result<Self, LayoutError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(LayoutError::Config(format!("viewport width {width} is not positive")));
        }
        if measure_count == 0 {
            return Err(LayoutError::Structure("failed to identify number of measures".to_string()));
        }

        let available_width = width - params.horizontal_padding * 2.0 - params.label_columns();
        if available_width <= 0.0 {
            return Err(LayoutError::Config(format!(
                "viewport width {width} leaves no room for measures"
            )));
        }

        let measures_per_row = params.measures_per_row;
        let measure_width = available_width / measures_per_row as f64;

        // Center rows that don't fill the available space exactly.
        let horizontal_padding = params.horizontal_padding
            + (available_width - measures_per_row as f64 * measure_width) / 2.0;

        Ok(Self {
            measure_count,
            measures_per_row,
            row_count: measure_count.div_ceil(measures_per_row),
            measure_width,
            horizontal_padding,
            available_width,
        })
    }

    /// Number of measures drawn in `row`.
    pub fn measures_in_row(&self, row: usize) -> usize {
        if row + 1 < self.row_count {
            self.measures_per_row
        } else {
            self.measure_count - (self.row_count - 1) * self.measures_per_row
        }
    }

    /// Index of the first measure of `row`.
    pub fn first_measure(&self, row: usize) -> usize {
        row * self.measures_per_row
    }

    /// Whether a measure opens its row (and so carries octave numbers).
    pub fn starts_row(&self, measure: usize) -> bool {
        measure % self.measures_per_row == 0
    }

    /// Whether a measure occupies the last slot of its row.
    pub fn ends_row(&self, measure: usize) -> bool {
        (measure + 1) % self.measures_per_row == 0
    }

    /// Width of one beat in a measure of `beats` beats.
    pub fn beat_width(&self, beats: u32) -> f64 {
        self.measure_width / beats as f64
    }

    /// Left edge of the measure in `slot`, relative to the row content.
    pub fn measure_x(&self, slot: usize, params: &LayoutParams) -> f64 {
        params.label_columns() + slot as f64 * self.measure_width
    }
}
