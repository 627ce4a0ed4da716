//! User style preferences for the layout.
//!
//! Every option is a closed enum. Values arrive as JSON from whatever
//! stores the user's choices; anything outside the declared sets is a
//! configuration error rather than a silent default.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Size selector for note glyphs and the staff label column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Small,
    #[default]
    Medium,
    Large,
}

/// Spacing selector for row gaps and side padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Narrow,
    #[default]
    Moderate,
    Wide,
}

/// How black-key pitches are spelled.
///
/// `Auto` follows the key signature (sharps for `fifths >= 0`, flats
/// otherwise); `Sharp` and `Flat` force a spelling regardless of key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccidentalDisplay {
    #[default]
    Auto,
    Sharp,
    Flat,
}

/// Note-head shapes. The glyph aliases are the characters the preference
/// screen shows, so stored preferences may use either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[serde(alias = "▲")]
    TriangleUp,
    #[serde(alias = "▼")]
    TriangleDown,
    #[serde(alias = "●")]
    Circle,
    #[serde(alias = "○")]
    HollowCircle,
    #[serde(alias = "◼")]
    Square,
    #[serde(alias = "□")]
    HollowSquare,
    #[serde(alias = "⨂")]
    CrossCircle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::TriangleUp,
        ShapeKind::TriangleDown,
        ShapeKind::Circle,
        ShapeKind::HollowCircle,
        ShapeKind::Square,
        ShapeKind::HollowSquare,
        ShapeKind::CrossCircle,
    ];

    /// The display glyph for this shape.
    pub fn glyph(self) -> char {
        match self {
            ShapeKind::TriangleUp => '▲',
            ShapeKind::TriangleDown => '▼',
            ShapeKind::Circle => '●',
            ShapeKind::HollowCircle => '○',
            ShapeKind::Square => '◼',
            ShapeKind::HollowSquare => '□',
            ShapeKind::CrossCircle => '⨂',
        }
    }
}

/// The fixed palette duration bars and note heads are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Black,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl PaletteColor {
    pub fn css(self) -> &'static str {
        match self {
            PaletteColor::Black => "#000000",
            PaletteColor::Gray => "#808080",
            PaletteColor::Red => "#e53935",
            PaletteColor::Orange => "#fb8c00",
            PaletteColor::Yellow => "#fdd835",
            PaletteColor::Green => "#43a047",
            PaletteColor::Blue => "#1e88e5",
            PaletteColor::Purple => "#8e24aa",
        }
    }
}

/// The style options a layout pass reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPreferences {
    pub note_scale: Scale,
    pub staff_scale: Scale,
    pub horizontal_spacing: Spacing,
    pub vertical_spacing: Spacing,
    #[serde(alias = "accidentalType")]
    pub accidental_display: AccidentalDisplay,
    pub measures_per_row: u32,
    pub natural_note_shape: ShapeKind,
    pub sharp_note_shape: ShapeKind,
    pub flat_note_shape: ShapeKind,
    pub note_duration_color: PaletteColor,
    pub note_symbol_color: PaletteColor,
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        Self {
            note_scale: Scale::Medium,
            staff_scale: Scale::Medium,
            horizontal_spacing: Spacing::Moderate,
            vertical_spacing: Spacing::Moderate,
            accidental_display: AccidentalDisplay::Auto,
            measures_per_row: 4,
            natural_note_shape: ShapeKind::Circle,
            sharp_note_shape: ShapeKind::TriangleUp,
            flat_note_shape: ShapeKind::TriangleDown,
            note_duration_color: PaletteColor::Blue,
            note_symbol_color: PaletteColor::Black,
        }
    }
}

impl LayoutPreferences {
    /// Load preferences from JSON. Missing keys take their defaults;
    /// unknown option values are rejected.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let prefs: LayoutPreferences = serde_json::from_str(json)
            .map_err(|e| LayoutError::Config(format!("preferences: {e}")))?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Check the constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.measures_per_row == 0 {
            return Err(LayoutError::Config(
                "measures per row must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}
