//! SVG builder — accumulates SVG elements and produces the final string.
//!
//! Layout types are turned into markup here and nowhere else; the layout
//! pass itself never formats SVG.

use super::constants::*;
use super::primitives::{
    path_data, Baseline, HeaderLayout, MeasureLayout, Primitive, RowLayout, ScoreLayout, Stroke,
    TextAnchor,
};

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(super) struct SvgBuilder {
    pub(super) elements: Vec<String>,
    width: f64,
    height: f64,
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn paint(fill: Option<&str>, stroke: Option<&Stroke>) -> String {
    let mut attrs = format!(r#"fill="{}""#, fill.unwrap_or("none"));
    if let Some(s) = stroke {
        attrs.push_str(&format!(r#" stroke="{}" stroke-width="{:.1}""#, s.color, s.width));
    }
    attrs
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    fn open_tag(&self, y: Option<f64>) -> String {
        match y {
            Some(y) => format!(
                r#"<svg x="0" y="{:.1}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
                y, self.width, self.height, self.width, self.height
            ),
            None => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="font-family: 'Georgia', 'Times New Roman', serif;">"#,
                self.width, self.height, self.width, self.height
            ),
        }
    }

    fn write_into(&self, svg: &mut String, y: Option<f64>, indent: &str) {
        svg.push_str(indent);
        svg.push_str(&self.open_tag(y));
        svg.push('\n');
        for el in &self.elements {
            svg.push_str(indent);
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str(indent);
        svg.push_str("</svg>\n");
    }

    pub(super) fn build(self) -> String {
        let mut svg = String::new();
        self.write_into(&mut svg, None, "");
        svg
    }

    pub(super) fn open_group(&mut self, tx: f64, ty: f64) {
        self.elements
            .push(format!(r#"<g transform="translate({:.1},{:.1})">"#, tx, ty));
    }

    pub(super) fn close_group(&mut self) {
        self.elements.push("</g>".to_string());
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Option<&str>, stroke: Option<&Stroke>) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" {}/>"#,
            x, y, w, h, paint(fill, stroke)
        ));
    }

    pub(super) fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Option<&str>, stroke: Option<&Stroke>) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" {}/>"#,
            cx, cy, r, paint(fill, stroke)
        ));
    }

    pub(super) fn polygon(&mut self, points: &[(f64, f64)], fill: &str) {
        let points = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements
            .push(format!(r#"<polygon points="{}" fill="{}"/>"#, points, fill));
    }

    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            x1, y1, x2, y2, stroke.color, stroke.width
        ));
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: TextAnchor, baseline: Baseline) {
        let anchor = match anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let baseline = match baseline {
            Baseline::Auto => String::new(),
            Baseline::Middle => r#" dominant-baseline="middle""#.to_string(),
            Baseline::Hanging => r#" dominant-baseline="hanging""#.to_string(),
        };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}" fill="{}" text-anchor="{}"{}>{}</text>"#,
            x, y, size, TEXT_COLOR, anchor, baseline, escape(content)
        ));
    }

    pub(super) fn path(&mut self, d: &str, fill: &str, opacity: f64) {
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" fill-opacity="{:.2}"/>"#,
            d, fill, opacity
        ));
    }

    pub(super) fn primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rect { x, y, width, height, fill, stroke } => {
                self.rect(*x, *y, *width, *height, fill.as_deref(), stroke.as_ref())
            }
            Primitive::Circle { cx, cy, r, fill, stroke } => {
                self.circle(*cx, *cy, *r, fill.as_deref(), stroke.as_ref())
            }
            Primitive::Polygon { points, fill } => self.polygon(points, fill),
            Primitive::Line { x1, y1, x2, y2, stroke } => self.line(*x1, *y1, *x2, *y2, stroke),
            Primitive::Text { x, y, content, size, anchor, baseline } => {
                self.text(*x, *y, content, *size, *anchor, *baseline)
            }
            Primitive::Path { commands, fill, fill_opacity } => {
                self.path(&path_data(commands), fill, *fill_opacity)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Canvas rendering
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn header_svg(header: &HeaderLayout) -> SvgBuilder {
    let mut svg = SvgBuilder::new(header.width, header.height);
    for element in &header.elements {
        svg.primitive(element);
    }
    svg
}

fn measure_svg(svg: &mut SvgBuilder, measure: &MeasureLayout) {
    svg.open_group(measure.x, measure.y);
    for element in &measure.frame {
        svg.primitive(element);
    }
    // Bars first so heads sit on top of them.
    for bar in &measure.bars {
        svg.primitive(&bar.to_primitive());
    }
    for head in &measure.heads {
        for part in &head.parts {
            svg.primitive(part);
        }
    }
    svg.close_group();
}

pub(super) fn row_svg(row: &RowLayout) -> SvgBuilder {
    let mut svg = SvgBuilder::new(row.width, row.height);
    svg.open_group(row.offset_x, 0.0);
    for element in &row.prefix {
        svg.primitive(element);
    }
    for measure in &row.measures {
        measure_svg(&mut svg, measure);
    }
    svg.close_group();
    svg
}

/// One document holding the header and every row, stacked top to bottom.
pub(super) fn stacked_svg(layout: &ScoreLayout) -> String {
    let mut out = SvgBuilder::new(layout.width, layout.total_height()).open_tag(None);
    out.push('\n');

    let mut y = layout.vertical_padding;
    header_svg(&layout.header).write_into(&mut out, Some(y), "  ");
    y += layout.header.height + layout.header.padding_bottom;

    for row in &layout.rows {
        row_svg(row).write_into(&mut out, Some(y), "  ");
        y += row.height + row.padding_bottom;
    }

    out.push_str("</svg>\n");
    out
}

// ═══════════════════════════════════════════════════════════════════════
// Empty SVG fallback
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>",
        escape(message)
    )
}
