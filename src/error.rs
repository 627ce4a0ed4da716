//! Error types for ingest and layout.

use thiserror::Error;

/// Failures while reading a score file into the model.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    #[error("MXL archive error: {0}")]
    Archive(String),

    #[error("Invalid UTF-8 in MusicXML file: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Reasons the layout engine refuses to produce a layout.
///
/// None of these are retryable: the computation has no side effects and
/// the same inputs fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No notes, or a pitch outside the MIDI range.
    #[error("An issue was detected while analyzing this work's note range: {0}")]
    Range(String),

    /// The score has nothing to lay out (no measures, no signatures).
    #[error("Failed to identify the structure of this work: {0}")]
    Structure(String),

    /// A preference value outside its declared set, or an unusable width.
    #[error("Invalid layout configuration: {0}")]
    Config(String),
}

impl LayoutError {
    /// Short diagnostic category for user-facing notices.
    pub fn category(&self) -> &'static str {
        match self {
            LayoutError::Range(_) => "range",
            LayoutError::Structure(_) => "structure",
            LayoutError::Config(_) => "configuration",
        }
    }
}

/// Any failure along the parse → layout → render path.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
