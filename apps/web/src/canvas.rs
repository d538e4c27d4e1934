use std::collections::HashMap;

use ratzilla::ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    Frame,
};
use tech_radar_engine::{chart_radius_for, replay, DrawCommand, ItemIndex, Layer, Point, Rgb, Shape, Surface};

/// Nominal pixel size of one DOM grid cell.
const CELL_WIDTH_PX: f64 = 10.0;
const CELL_HEIGHT_PX: f64 = 20.0;
const MIN_FILL_OPACITY: f64 = 0.25;
const MIN_INK_OPACITY: f64 = 0.35;
const FILL_STEP_PX: f64 = 4.0;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// The chart's share of the grid, in pixels centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub area: Rect,
    half_width: f64,
    half_height: f64,
}

impl ChartArea {
    /// `None` while the grid is too small to hold a chart.
    pub fn new(area: Rect) -> Option<Self> {
        if area.width < 8 || area.height < 6 {
            return None;
        }

        Some(Self {
            area,
            half_width: f64::from(area.width) * CELL_WIDTH_PX / 2.0,
            half_height: f64::from(area.height) * CELL_HEIGHT_PX / 2.0,
        })
    }

    pub fn chart_radius(&self) -> f64 {
        chart_radius_for((self.half_width * 2.0).min(self.half_height * 2.0))
    }

    /// Grid cell holding a chart point, clamped to the area.
    pub fn to_cell(&self, point: Point) -> (u16, u16) {
        let max_column = f64::from(self.area.width.saturating_sub(1));
        let max_row = f64::from(self.area.height.saturating_sub(1));
        let column = ((point.x + self.half_width) / CELL_WIDTH_PX).floor().clamp(0.0, max_column);
        let row = ((point.y + self.half_height) / CELL_HEIGHT_PX).floor().clamp(0.0, max_row);

        (self.area.x + column as u16, self.area.y + row as u16)
    }
}

/// Replays engine commands into a ratatui canvas, flipping y.
struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    default_stroke: f64,
    marker_fills: HashMap<ItemIndex, Rgb>,
}

impl CanvasSurface<'_, '_> {
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
}

impl Surface for CanvasSurface<'_, '_> {
    fn clear(&mut self) {
        self.marker_fills.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        let paint = command.paint;
        match (&command.shape, command.layer) {
            (_, Layer::Background) => {}
            (Shape::Circle { center, radius }, Layer::Markers) => {
                let (Some(fill), true) = (paint.fill, *radius > 0.0) else {
                    return;
                };
                if let Some(index) = command.element.item() {
                    self.marker_fills.insert(index, fill);
                }
                self.disc(*center, *radius, to_color(fill));
                if paint.stroke_width > self.default_stroke {
                    let stroke = paint.stroke.map_or(Color::White, to_color);
                    self.circle(*center, radius + paint.stroke_width, stroke);
                }
            }
            (Shape::Circle { center, radius }, _) => match (paint.stroke, paint.fill) {
                (Some(stroke), _) if paint.opacity >= MIN_INK_OPACITY => {
                    self.circle(*center, *radius, to_color(stroke));
                }
                (None, Some(fill)) if paint.opacity >= MIN_FILL_OPACITY && *radius > 0.0 => {
                    self.circle(*center, *radius, to_color(fill));
                }
                _ => {}
            },
            (Shape::Line { from, to }, _) => {
                if let (Some(stroke), true) = (paint.stroke, paint.opacity >= MIN_INK_OPACITY) {
                    self.ctx.draw(&CanvasLine {
                        x1: from.x,
                        y1: -from.y,
                        x2: to.x,
                        y2: -to.y,
                        color: to_color(stroke),
                    });
                }
            }
            (
                Shape::Text {
                    position,
                    lines,
                    bold,
                    ..
                },
                layer,
            ) => {
                let (Some(fill), true) = (paint.fill, paint.opacity >= MIN_INK_OPACITY) else {
                    return;
                };
                let mut style = Style::default().fg(to_color(fill));
                if *bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if layer == Layer::Numbers {
                    if let Some(background) = command.element.item().and_then(|i| self.marker_fills.get(&i)) {
                        style = style.bg(to_color(*background));
                    }
                }

                // One grid row per line, stacked around the label position.
                let middle = lines.len().saturating_sub(1) as f64 / 2.0;
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
    }
}

pub fn render_chart(f: &mut Frame<'_>, chart: &ChartArea, commands: &[DrawCommand], default_stroke: f64) {
    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let mut surface = CanvasSurface {
                    ctx,
                    default_stroke,
                    marker_fills: HashMap::new(),
                };
                replay(commands, &mut surface);
            })
            .x_bounds([-chart.half_width, chart.half_width])
            .y_bounds([-chart.half_height, chart.half_height]),
        chart.area,
    );
}
