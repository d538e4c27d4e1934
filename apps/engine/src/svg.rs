//! Standalone SVG output for the display list.

use std::fmt::Write as _;

use crate::geometry::Point;
use crate::render::{DrawCommand, Layer, Shape, Surface};

const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

/// Writes draw commands as SVG elements in a square viewport centred on the
/// chart origin.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    /// The complete `<svg>` document for what has been drawn so far.
    pub fn finish(&self) -> String {
        let half = self.size / 2.0;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
             viewBox=\"{min} {min} {size} {size}\" font-family=\"{FONT_FAMILY}\">\n{body}</svg>\n",
            size = fmt_num(self.size),
            min = fmt_num(-half),
            body = self.body,
        )
    }

    fn open_circle(&mut self, command: &DrawCommand, center: Point, radius: f64) {
        let start_radius = match (command.entrance, command.layer) {
            (Some(_), Layer::Halos | Layer::Markers) => 0.0,
            _ => radius,
        };
        let _ = write!(
            self.body,
            "<circle id=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\"{}",
            command.element,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(start_radius),
            paint_attributes(command),
        );

        match command.entrance {
            Some(entrance) => {
                self.body.push('>');
                if start_radius < radius {
                    let _ = write!(
                        self.body,
                        "<animate attributeName=\"r\" from=\"0\" to=\"{}\" begin=\"{}ms\" dur=\"{}ms\" fill=\"freeze\"/>",
                        fmt_num(radius),
                        entrance.delay_ms,
                        entrance.duration_ms,
                    );
                }
                self.push_fade(command);
                self.body.push_str("</circle>\n");
            }
            None => self.body.push_str("/>\n"),
        }
    }

    fn push_fade(&mut self, command: &DrawCommand) {
        if let Some(entrance) = command.entrance {
            let _ = write!(
                self.body,
                "<animate attributeName=\"opacity\" from=\"0\" to=\"{}\" begin=\"{}ms\" dur=\"{}ms\" fill=\"freeze\"/>",
                fmt_num(command.paint.opacity),
                entrance.delay_ms,
                entrance.duration_ms,
            );
        }
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.body.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        match &command.shape {
            Shape::Circle { center, radius } => self.open_circle(command, *center, *radius),
            Shape::Line { from, to } => {
                let _ = write!(
                    self.body,
                    "<line id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}",
                    command.element,
                    fmt_num(from.x),
                    fmt_num(from.y),
                    fmt_num(to.x),
                    fmt_num(to.y),
                    paint_attributes(command),
                );
                if command.entrance.is_some() {
                    self.body.push('>');
                    self.push_fade(command);
                    self.body.push_str("</line>\n");
                } else {
                    self.body.push_str("/>\n");
                }
            }
            Shape::Text {
                font_size, bold, ..
            } => {
                let _ = write!(
                    self.body,
                    "<g id=\"{}\" font-size=\"{}\" font-weight=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\"{}>",
                    command.element,
                    fmt_num(*font_size),
                    if *bold { "bold" } else { "normal" },
                    paint_attributes(command),
                );
                self.push_fade(command);
                for (position, line) in command.shape.text_lines() {
                    let _ = write!(
                        self.body,
                        "<text x=\"{}\" y=\"{}\">{}</text>",
                        fmt_num(position.x),
                        fmt_num(position.y),
                        escape_xml(line),
                    );
                }
                self.body.push_str("</g>\n");
            }
        }
    }
}

fn paint_attributes(command: &DrawCommand) -> String {
    let paint = &command.paint;
    let mut attributes = String::new();

    let _ = write!(
        attributes,
        " fill=\"{}\"",
        paint.fill.map_or_else(|| "none".to_string(), |color| color.to_hex())
    );
    if let Some(stroke) = paint.stroke {
        let _ = write!(
            attributes,
            " stroke=\"{}\" stroke-width=\"{}\"",
            stroke.to_hex(),
            fmt_num(paint.stroke_width)
        );
    }

    let opacity = if command.entrance.is_some() {
        0.0
    } else {
        paint.opacity
    };
    if (opacity - 1.0).abs() > f64::EPSILON {
        let _ = write!(attributes, " opacity=\"{}\"", fmt_num(opacity));
    }

    attributes
}

fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::SelectionState;
    use crate::model::tests::{item, radar};
    use crate::render::{Renderer, Transitions};
    use crate::scene::SceneBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn render(transitions: Transitions) -> String {
        let radar = radar(vec![item("Git", 1, 0), item("Docker", 2, 0)]);
        let scene = SceneBuilder::default()
            .build_radar(&radar, 350.0, &mut StdRng::seed_from_u64(2))
            .unwrap();

        let mut surface = SvgSurface::new(880.0);
        Renderer::default()
            .render(&scene, &SelectionState::default(), transitions, Some(&mut surface))
            .unwrap();
        surface.finish()
    }

    #[test]
    fn writes_a_centred_document() {
        let svg = render(Transitions::Off);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"880\""));
        assert!(svg.contains("viewBox=\"-440 -440 880 880\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("id=\"marker-").count(), 2);
        assert!(svg.contains("LANGUAGES &amp;"));
        assert!(!svg.contains("<animate"));
    }

    #[test]
    fn scheduled_transitions_become_animations() {
        let svg = render(Transitions::Scheduled);

        assert!(svg.contains("<animate attributeName=\"r\" from=\"0\" to=\"12\" begin=\"700ms\""));
        assert!(svg.contains("attributeName=\"opacity\""));
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_xml("A&B <c> \"d\" 'e'"), "A&amp;B &lt;c&gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(1.23456), "1.23");
    }
}
