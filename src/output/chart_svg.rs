//! Full chart document: axes, axis labels, time label and circles.

use crate::chart::{ChartLayout, ChartScales};
use crate::color::Rgba;
use crate::error::Result;
use crate::scale::{LinearScale, LogScale, Scale};

use super::svg::{CircleAnimation, SvgDocument, SvgElement, TextAnchor, TextStyle};
use super::Frame;

/// Income values labelled on the x axis.
pub const X_TICK_VALUES: [f64; 3] = [400.0, 4000.0, 40_000.0];

const TICK_SIZE: f64 = 6.0;
const AXIS_COLOR: Rgba = Rgba::BLACK;

/// Draws frames onto the fixed chart furniture for one layout.
#[derive(Debug, Clone)]
pub struct ChartSvg {
    layout: ChartLayout,
    x: LogScale,
    y: LinearScale,
}

impl ChartSvg {
    /// Create a chart template for `layout`.
    ///
    /// # Errors
    ///
    /// Returns a scale error if the chart scales cannot be built.
    pub fn new(layout: ChartLayout) -> Result<Self> {
        let scales = ChartScales::new(&layout)?;
        Ok(Self { layout, x: *scales.x_scale(), y: *scales.y_scale() })
    }

    /// Layout this template draws.
    #[must_use]
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Build the SVG document for `frame`.
    #[must_use]
    pub fn document(&self, frame: &Frame) -> SvgDocument {
        let width = self.layout.plot_width();
        let height = self.layout.plot_height();
        let margin = self.layout.margin();

        let mut children = vec![
            label(
                width / 2.0,
                height + 65.0,
                "GDP Per Capita ($)",
                TextStyle {
                    font_size: 20.0,
                    anchor: TextAnchor::Middle,
                    weight: Some(700),
                    class: Some("x-axis-label".to_string()),
                    ..TextStyle::default()
                },
            ),
            label(
                -(height / 2.0),
                -60.0,
                "Life Expectancy (Years)",
                TextStyle {
                    font_size: 20.0,
                    anchor: TextAnchor::Middle,
                    weight: Some(700),
                    rotate: Some(-90.0),
                    class: Some("y axis-label".to_string()),
                    ..TextStyle::default()
                },
            ),
            label(
                width - 40.0,
                height - 10.0,
                &frame.time_label,
                TextStyle {
                    font_size: 40.0,
                    anchor: TextAnchor::Middle,
                    opacity: Some(0.4),
                    class: Some("time-label".to_string()),
                    ..TextStyle::default()
                },
            ),
            self.x_axis(),
            self.y_axis(),
        ];

        children.extend(frame.circles.iter().map(|c| SvgElement::Circle {
            id: Some(c.key.clone()),
            cx: c.cx,
            cy: c.cy,
            r: c.r,
            fill: c.fill,
            animation: c
                .from
                .map(|from| CircleAnimation { from, duration: frame.transition_duration }),
        }));

        SvgDocument::new(self.layout.width(), self.layout.height()).with(SvgElement::Group {
            class: None,
            translate: Some((f64::from(margin.left), f64::from(margin.top))),
            children,
        })
    }

    /// Render `frame` to an SVG string.
    #[must_use]
    pub fn render(&self, frame: &Frame) -> String {
        self.document(frame).render()
    }

    fn x_axis(&self) -> SvgElement {
        let mut children = vec![axis_line(0.0, 0.0, self.layout.plot_width(), 0.0)];
        for value in X_TICK_VALUES {
            let x = self.x.scale(value);
            children.push(axis_line(x, 0.0, x, TICK_SIZE));
            children.push(label(
                x,
                TICK_SIZE + 10.0,
                &format_dollars(value),
                TextStyle { anchor: TextAnchor::Middle, ..TextStyle::default() },
            ));
        }

        SvgElement::Group {
            class: Some("x-axis".to_string()),
            translate: Some((0.0, self.layout.plot_height())),
            children,
        }
    }

    fn y_axis(&self) -> SvgElement {
        let mut children = vec![axis_line(0.0, 0.0, 0.0, self.layout.plot_height())];
        for value in self.y.ticks(10) {
            let y = self.y.scale(value);
            children.push(axis_line(-TICK_SIZE, y, 0.0, y));
            children.push(label(
                -(TICK_SIZE + 3.0),
                y + 3.0,
                &format!("{value}"),
                TextStyle { anchor: TextAnchor::End, ..TextStyle::default() },
            ));
        }

        SvgElement::Group { class: Some("y-axis".to_string()), translate: None, children }
    }
}

/// Format an income tick as whole dollars, e.g. `$4000`.
#[must_use]
pub fn format_dollars(value: f64) -> String {
    format!("${}", value.round() as i64)
}

fn label(x: f64, y: f64, text: &str, style: TextStyle) -> SvgElement {
    SvgElement::Text { x, y, text: text.to_string(), style }
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> SvgElement {
    SvgElement::Line { x1, y1, x2, y2, stroke: AXIS_COLOR, stroke_width: 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::CircleAttrs;
    use crate::output::CircleFrame;
    use std::time::Duration;

    fn frame() -> Frame {
        Frame {
            time_label: "1800".to_string(),
            transition_duration: Duration::from_millis(100),
            circles: vec![
                CircleFrame {
                    key: "China".to_string(),
                    cx: 200.0,
                    cy: 100.0,
                    r: 20.0,
                    fill: Rgba::rgb(251, 180, 174),
                    from: None,
                },
                CircleFrame {
                    key: "India".to_string(),
                    cx: 210.0,
                    cy: 120.0,
                    r: 18.0,
                    fill: Rgba::rgb(251, 180, 174),
                    from: Some(CircleAttrs { cx: 205.0, cy: 121.0, r: 18.0 }),
                },
            ],
        }
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(400.0), "$400");
        assert_eq!(format_dollars(40_000.0), "$40000");
    }

    #[test]
    fn test_chart_furniture() {
        let chart = ChartSvg::new(ChartLayout::default()).unwrap();
        let svg = chart.render(&frame());

        assert!(svg.contains(r#"width="800" height="500""#));
        assert!(svg.contains(r#"transform="translate(100, 10)""#));
        assert!(svg.contains("GDP Per Capita ($)"));
        assert!(svg.contains("Life Expectancy (Years)"));
        assert!(svg.contains(r#"class="time-label" x="650" y="380" font-size="40px""#));
        assert!(svg.contains(">1800</text>"));
        assert!(svg.contains(">$400</text>"));
        assert!(svg.contains(">$4000</text>"));
        assert!(svg.contains(">$40000</text>"));
        assert!(svg.contains(">90</text>"));
        assert!(svg.contains(r#"<g class="x-axis" transform="translate(0, 390)">"#));
    }

    #[test]
    fn test_chart_circles() {
        let chart = ChartSvg::new(ChartLayout::default()).unwrap();
        let svg = chart.render(&frame());

        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r#"data-key="China""#));
        assert_eq!(svg.matches("<animate ").count(), 3);
        assert!(svg.contains(r#"dur="100ms""#));
        // Circles draw above the axes.
        assert!(svg.find("data-key=\"China\"") > svg.find("class=\"y-axis\""));
    }

    #[test]
    fn test_chart_empty_frame() {
        let chart = ChartSvg::new(ChartLayout::default()).unwrap();
        let svg = chart.render(&Frame::default());
        assert_eq!(svg.matches("<circle").count(), 0);
        assert!(svg.contains("time-label"));
    }
}
