//! SVG document encoder.
//!
//! Builds a vector document from groups, circles, lines and text. Circles can
//! carry a SMIL animation so a browser plays the transition declared for the
//! frame.

use std::fmt::Write as FmtWrite;
use std::time::Duration;

use crate::chart::CircleAttrs;
use crate::color::Rgba;

/// An SVG document with fixed outer dimensions on a white background.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Top-level elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Group, optionally translated
    Group {
        class: Option<String>,
        translate: Option<(f64, f64)>,
        children: Vec<SvgElement>,
    },
    /// Circle
    Circle {
        id: Option<String>,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Rgba,
        animation: Option<CircleAnimation>,
    },
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
    },
    /// Text
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// Animate a circle from an earlier state to its drawn attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleAnimation {
    /// Starting attributes.
    pub from: CircleAttrs,
    /// Duration.
    pub duration: Duration,
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Presentation attributes for a text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Text color.
    pub fill: Rgba,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// CSS font weight, e.g. 700 for bold.
    pub weight: Option<u16>,
    /// Opacity in `[0, 1]`.
    pub opacity: Option<f64>,
    /// Rotation in degrees about the origin.
    pub rotate: Option<f64>,
    /// CSS class.
    pub class: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Start,
            weight: None,
            opacity: None,
            rotate: None,
            class: None,
        }
    }
}

impl SvgDocument {
    /// Create a new SVG document with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, elements: Vec::new() }
    }

    /// Add a top-level element, builder style.
    #[must_use]
    pub fn with(mut self, element: SvgElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, Rgba::WHITE.to_css());

        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Escape XML special characters in text and attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn write_element(out: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        SvgElement::Group { class, translate, children } => {
            let class_attr = class
                .as_ref()
                .map(|c| format!(r#" class="{}""#, escape(c)))
                .unwrap_or_default();
            let transform_attr = translate
                .map(|(x, y)| format!(r#" transform="translate({}, {})""#, num(x), num(y)))
                .unwrap_or_default();
            let _ = writeln!(out, "{indent}<g{class_attr}{transform_attr}>");
            for child in children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}</g>");
        }
        SvgElement::Circle { id, cx, cy, r, fill, animation } => {
            let id_attr = id
                .as_ref()
                .map(|i| format!(r#" data-key="{}""#, escape(i)))
                .unwrap_or_default();
            let open = format!(
                r#"<circle{id_attr} cx="{}" cy="{}" r="{}" fill="{}""#,
                num(*cx),
                num(*cy),
                num(*r),
                fill.to_css()
            );
            match animation {
                None => {
                    let _ = writeln!(out, "{indent}{open}/>");
                }
                Some(anim) => {
                    let _ = writeln!(out, "{indent}{open}>");
                    let inner = "  ".repeat(depth + 1);
                    let dur = anim.duration.as_millis();
                    for (name, from, to) in [
                        ("cx", anim.from.cx, *cx),
                        ("cy", anim.from.cy, *cy),
                        ("r", anim.from.r, *r),
                    ] {
                        let _ = writeln!(
                            out,
                            r#"{inner}<animate attributeName="{name}" from="{}" to="{}" dur="{dur}ms" calcMode="spline" keyTimes="0;1" keySplines="0.645 0.045 0.355 1" fill="freeze"/>"#,
                            num(from),
                            num(to)
                        );
                    }
                    let _ = writeln!(out, "{indent}</circle>");
                }
            }
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => {
            let _ = writeln!(
                out,
                r#"{indent}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2),
                stroke.to_css(),
                num(*stroke_width)
            );
        }
        SvgElement::Text { x, y, text, style } => {
            let mut attrs = String::new();
            if let Some(class) = &style.class {
                let _ = write!(attrs, r#" class="{}""#, escape(class));
            }
            let _ = write!(
                attrs,
                r#" x="{}" y="{}" font-size="{}px""#,
                num(*x),
                num(*y),
                num(style.font_size)
            );
            if let Some(weight) = style.weight {
                let _ = write!(attrs, r#" font-weight="{weight}""#);
            }
            if let Some(opacity) = style.opacity {
                let _ = write!(attrs, r#" opacity="{}""#, num(opacity));
            }
            let _ = write!(
                attrs,
                r#" fill="{}" text-anchor="{}" font-family="sans-serif""#,
                style.fill.to_css(),
                style.anchor.as_str()
            );
            if let Some(angle) = style.rotate {
                let _ = write!(attrs, r#" transform="rotate({})""#, num(angle));
            }
            let _ = writeln!(out, "{indent}<text{attrs}>{}</text>", escape(text));
        }
    }
}
