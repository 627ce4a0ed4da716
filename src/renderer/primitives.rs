//! Display list produced by a layout pass.
//!
//! Everything a renderer needs is precomputed here: positions, sizes,
//! colors and path outlines. Coordinates of measure children are local to
//! the measure group; a measure's `x`/`y` are local to the row content,
//! which is itself shifted right by the row's `offset_x`.

use serde::Serialize;

use crate::preferences::ShapeKind;
use super::pitch::Accidental;

/// Outline stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Auto,
    Middle,
    Hanging,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: f64,
        anchor: TextAnchor,
        baseline: Baseline,
    },
    Path {
        commands: Vec<PathCommand>,
        fill: String,
        fill_opacity: f64,
    },
}

impl Primitive {
    pub(super) fn filled_rect(x: f64, y: f64, width: f64, height: f64, fill: &str) -> Self {
        Primitive::Rect {
            x,
            y,
            width,
            height,
            fill: Some(fill.to_string()),
            stroke: None,
        }
    }

    pub(super) fn text(x: f64, y: f64, content: impl Into<String>, size: f64) -> Self {
        Primitive::Text {
            x,
            y,
            content: content.into(),
            size,
            anchor: TextAnchor::Start,
            baseline: Baseline::Auto,
        }
    }

    pub(super) fn aligned(self, anchor: TextAnchor, baseline: Baseline) -> Self {
        match self {
            Primitive::Text { x, y, content, size, .. } => Primitive::Text {
                x,
                y,
                content,
                size,
                anchor,
                baseline,
            },
            other => other,
        }
    }
}

/// Relative path commands, mirroring the SVG path mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    HorizontalTo { x: f64 },
    LineBy { dx: f64, dy: f64 },
    VerticalBy { dy: f64 },
    /// Quarter-circle style arc; `sweep` is the SVG sweep flag
    ArcBy { r: f64, sweep: bool, dx: f64, dy: f64 },
    Close,
}

impl PathCommand {
    pub fn to_svg(&self) -> String {
        match *self {
            PathCommand::MoveTo { x, y } => format!("M{:.2} {:.2}", x, y),
            PathCommand::HorizontalTo { x } => format!("H{:.2}", x),
            PathCommand::LineBy { dx, dy } => format!("l{:.2} {:.2}", dx, dy),
            PathCommand::VerticalBy { dy } => format!("v{:.2}", dy),
            PathCommand::ArcBy { r, sweep, dx, dy } => format!(
                "a{:.2} {:.2} 0 0 {} {:.2} {:.2}",
                r,
                r,
                u8::from(sweep),
                dx,
                dy
            ),
            PathCommand::Close => "z".to_string(),
        }
    }
}

/// SVG `d` attribute for a command list.
pub fn path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(PathCommand::to_svg)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The rounded (or pointed) bar spanning a note's duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationBar {
    pub track: usize,
    pub pitch: i32,
    /// Line relative to the bottom of the row range
    pub line: i32,
    pub x_start: f64,
    pub x_end: f64,
    pub top: f64,
    pub height: f64,
    pub radius_start: f64,
    pub radius_end: f64,
    pub pointed_end: bool,
    pub spans_row: bool,
    pub color: String,
    pub opacity: f64,
    pub outline: Vec<PathCommand>,
}

impl DurationBar {
    pub fn to_primitive(&self) -> Primitive {
        Primitive::Path {
            commands: self.outline.clone(),
            fill: self.color.clone(),
            fill_opacity: self.opacity,
        }
    }
}

/// A shaped note head at the leading edge of its duration bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteHead {
    pub track: usize,
    pub pitch: i32,
    pub accidental: Accidental,
    pub shape: ShapeKind,
    pub cx: f64,
    pub cy: f64,
    pub size: f64,
    pub parts: Vec<Primitive>,
}

/// One measure: frame primitives plus the notes drawn inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureLayout {
    /// 0-based measure index in the score
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub beats: u32,
    pub key_fifths: i32,
    pub frame: Vec<Primitive>,
    pub bars: Vec<DurationBar>,
    pub heads: Vec<NoteHead>,
}

/// One row canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLayout {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    /// Gap left below the canvas
    pub padding_bottom: f64,
    /// Translation applied to everything in the row
    pub offset_x: f64,
    /// Staff label and the left boundary bar
    pub prefix: Vec<Primitive>,
    pub measures: Vec<MeasureLayout>,
}

/// Title / tempo / author canvas shown above the first row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderLayout {
    pub width: f64,
    pub height: f64,
    pub padding_bottom: f64,
    pub elements: Vec<Primitive>,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLayout {
    pub width: f64,
    pub vertical_padding: f64,
    pub min_line: i32,
    pub max_line: i32,
    pub header: HeaderLayout,
    pub rows: Vec<RowLayout>,
}

impl ScoreLayout {
    /// Height of all canvases stacked, including gaps and outer padding.
    pub fn total_height(&self) -> f64 {
        let rows: f64 = self.rows.iter().map(|r| r.height + r.padding_bottom).sum();
        self.vertical_padding * 2.0 + self.header.height + self.header.padding_bottom + rows
    }

    pub fn measures(&self) -> impl Iterator<Item = &MeasureLayout> {
        self.rows.iter().flat_map(|r| r.measures.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_commands_format_like_svg() {
        let d = path_data(&[
            PathCommand::MoveTo { x: 5.0, y: 10.0 },
            PathCommand::HorizontalTo { x: 100.0 },
            PathCommand::ArcBy { r: 2.5, sweep: true, dx: 2.5, dy: 2.5 },
            PathCommand::VerticalBy { dy: -15.0 },
            PathCommand::LineBy { dx: 10.0, dy: 10.0 },
            PathCommand::Close,
        ]);
        assert_eq!(
            d,
            "M5.00 10.00 H100.00 a2.50 2.50 0 0 1 2.50 2.50 v-15.00 l10.00 10.00 z"
        );
    }
}
