use std::collections::HashMap;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points};
use ratatui::Frame;
use tech_radar_engine::{replay, DrawCommand, ItemIndex, Layer, Point, Rgb, Shape, Surface};

use crate::ui::layout::{ChartViewport, CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// Fills fainter than this are invisible on a terminal and are skipped.
const MIN_FILL_OPACITY: f64 = 0.25;
/// Text and lines fade in by popping in once past this opacity.
const MIN_INK_OPACITY: f64 = 0.35;
/// Spacing of the concentric rings that approximate a solid disc.
const FILL_STEP_PX: f64 = 5.0;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Draws engine commands into a ratatui canvas.
///
/// The canvas y axis points up, chart y points down; every point is flipped.
pub struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    default_stroke: f64,
    marker_fills: HashMap<ItemIndex, Rgb>,
}

impl<'a, 'b> CanvasSurface<'a, 'b> {
    pub fn new(ctx: &'a mut Context<'b>, default_stroke: f64) -> Self {
        Self {
            ctx,
            default_stroke,
            marker_fills: HashMap::new(),
        }
    }

    fn circle(&mut self, center: Point, radius: f64, color: Color) {
        self.ctx.draw(&Circle {
            x: center.x,
            y: -center.y,
            radius,
            color,
        });
    }

    fn disc(&mut self, center: Point, radius: f64, color: Color) {
        let mut r = radius;
        while r > 0.0 {
            self.circle(center, r, color);
            r -= FILL_STEP_PX;
        }
        self.ctx.draw(&Points {
            coords: &[(center.x, -center.y)],
            color,
        });
    }

    fn text(&mut self, command: &DrawCommand, background: Option<Color>) {
        let Some(fill) = command.paint.fill else {
            return;
        };

        let mut style = Style::default().fg(to_color(fill));
        if let Some(background) = background {
            style = style.bg(background);
        }
        if matches!(command.shape, Shape::Text { bold: true, .. }) {
            style = style.add_modifier(Modifier::BOLD);
        }

        let Shape::Text {
            position, lines, ..
        } = &command.shape
        else {
            return;
        };

        // One terminal row per line, stacked around the label position.
        let middle = (lines.len().saturating_sub(1)) as f64 / 2.0;
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count() as f64 * CELL_WIDTH_PX;
            let y = (row as f64 - middle).mul_add(CELL_HEIGHT_PX, position.y);
            self.ctx.print(
                position.x - width / 2.0 + CELL_WIDTH_PX / 2.0,
                -y,
                Span::styled(line.clone(), style),
            );
        }
    }
}

impl Surface for CanvasSurface<'_, '_> {
    fn clear(&mut self) {
        // Every canvas paint starts from an empty grid.
        self.marker_fills.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        let paint = command.paint;
        match (&command.shape, command.layer) {
            (_, Layer::Background) => {}
            (Shape::Circle { center, radius }, Layer::Markers) => {
                let Some(fill) = paint.fill else {
                    return;
                };
                if *radius <= 0.0 {
                    return;
                }
                self.marker_fills.insert(command.element.item().unwrap_or_default(), fill);
                self.disc(*center, *radius, to_color(fill));
                if paint.stroke_width > self.default_stroke {
                    let stroke = paint.stroke.map_or(Color::White, to_color);
                    self.circle(*center, radius + paint.stroke_width, stroke);
                }
            }
            (Shape::Circle { center, radius }, _) => {
                if let Some(stroke) = paint.stroke {
                    if paint.opacity >= MIN_INK_OPACITY {
                        self.circle(*center, *radius, to_color(stroke));
                    }
                } else if let Some(fill) = paint.fill {
                    if paint.opacity >= MIN_FILL_OPACITY && *radius > 0.0 {
                        self.circle(*center, *radius, to_color(fill));
                    }
                }
            }
            (Shape::Line { from, to }, _) => {
                if paint.opacity < MIN_INK_OPACITY {
                    return;
                }
                if let Some(stroke) = paint.stroke {
                    self.ctx.draw(&CanvasLine {
                        x1: from.x,
                        y1: -from.y,
                        x2: to.x,
                        y2: -to.y,
                        color: to_color(stroke),
                    });
                }
            }
            (Shape::Text { .. }, layer) => {
                if paint.opacity < MIN_INK_OPACITY {
                    return;
                }
                let background = (layer == Layer::Numbers)
                    .then(|| command.element.item())
                    .flatten()
                    .and_then(|index| self.marker_fills.get(&index))
                    .copied()
                    .map(to_color);
                self.text(command, background);
            }
        }
    }
}

/// Paints a prepared display list into the chart viewport.
pub fn render_radar_canvas(
    f: &mut Frame<'_>,
    viewport: &ChartViewport,
    commands: &[DrawCommand],
    default_stroke: f64,
) {
    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let mut surface = CanvasSurface::new(ctx, default_stroke);
                replay(commands, &mut surface);
            })
            .x_bounds(viewport.x_bounds())
            .y_bounds(viewport.y_bounds()),
        viewport.area,
    );
}

/// A centred one-line message in place of the chart.
pub fn render_radar_message(f: &mut Frame<'_>, area: Rect, message: &str, color: Color) {
    let paragraph = ratatui::widgets::Paragraph::new(message.to_string())
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .style(Style::default().fg(color));
    f.render_widget(paragraph, area);
}
