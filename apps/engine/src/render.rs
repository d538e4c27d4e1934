//! Turns a [`Scene`] into an ordered display list and replays it onto a
//! [`Surface`].
//!
//! Every render is a full redraw: the surface is cleared, then commands are
//! issued back to front. Entrance staggering only changes *when* an element
//! appears, never the order or the settled paint.

use std::fmt;

use serde::Serialize;

use crate::error::RadarError;
use crate::geometry::Point;
use crate::interaction::SelectionState;
use crate::model::{ItemIndex, Rgb};
use crate::scene::Scene;
use crate::style::{RadarStyle, Stagger};

/// Draw layers, back to front. The chart frame layers are drawn in this
/// order; `Halos`, `Markers` and `Numbers` are then drawn as one group per
/// blip, so a later blip covers an earlier one's number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    Background,
    RingFills,
    RingStrokes,
    Dividers,
    RingLabels,
    QuadrantLabels,
    Halos,
    Markers,
    Numbers,
}

/// Stable identity of a drawn element, used for hover/selection re-styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementId {
    Background,
    RingFill(usize),
    RingStroke(usize),
    Divider(usize),
    RingLabel(usize),
    QuadrantLabel(usize),
    Halo(ItemIndex),
    Marker(ItemIndex),
    Number(ItemIndex),
}

impl ElementId {
    /// The item this element belongs to, if any.
    pub const fn item(self) -> Option<ItemIndex> {
        match self {
            Self::Halo(index) | Self::Marker(index) | Self::Number(index) => Some(index),
            _ => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::RingFill(id) => write!(f, "ring-fill-{id}"),
            Self::RingStroke(id) => write!(f, "ring-{id}"),
            Self::Divider(id) => write!(f, "divider-{id}"),
            Self::RingLabel(id) => write!(f, "ring-label-{id}"),
            Self::QuadrantLabel(id) => write!(f, "quadrant-label-{id}"),
            Self::Halo(index) => write!(f, "halo-{index}"),
            Self::Marker(index) => write!(f, "marker-{index}"),
            Self::Number(index) => write!(f, "number-{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Circle {
        center: Point,
        radius: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    /// Text centred on `position`; multiple lines are stacked around it.
    Text {
        position: Point,
        lines: Vec<String>,
        font_size: f64,
        line_height: f64,
        bold: bool,
    },
}

impl Shape {
    /// Baseline-centre of each text line, first line on top.
    pub fn text_lines(&self) -> Vec<(Point, &str)> {
        let Self::Text {
            position,
            lines,
            line_height,
            ..
        } = self
        else {
            return Vec::new();
        };

        let first = position.y - line_height * (lines.len().saturating_sub(1) as f64) / 2.0;
        lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                (
                    Point {
                        x: position.x,
                        y: (row as f64).mul_add(*line_height, first),
                    },
                    line.as_str(),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    /// 0..=1, applied to fill and stroke alike.
    pub opacity: f64,
}

impl Paint {
    const fn fill(color: Rgb, opacity: f64) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            opacity,
        }
    }

    const fn stroke(color: Rgb, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            opacity: 1.0,
        }
    }
}

/// When an element starts appearing and how long it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entrance {
    pub delay_ms: u32,
    pub duration_ms: u32,
}

impl Entrance {
    /// Eased progress in 0..=1 at `elapsed_ms` since the render started.
    pub fn progress(self, elapsed_ms: u32) -> f64 {
        if elapsed_ms <= self.delay_ms {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }

        let t = (f64::from(elapsed_ms - self.delay_ms) / f64::from(self.duration_ms)).min(1.0);
        // ease-out cubic
        1.0 - (1.0 - t).powi(3)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub layer: Layer,
    pub element: ElementId,
    pub shape: Shape,
    pub paint: Paint,
    /// Present only when the surface should animate the entrance itself.
    pub entrance: Option<Entrance>,
}

/// A 2D drawing target in chart-local coordinates (origin at the centre,
/// y pointing down).
pub trait Surface {
    fn clear(&mut self);
    fn draw(&mut self, command: &DrawCommand);
}

/// Clears `surface` and issues `commands` in order.
pub fn replay<S: Surface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    surface.clear();
    for command in commands {
        surface.draw(command);
    }
}

/// How entrance animation is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transitions {
    /// Draw the settled state.
    #[default]
    Off,
    /// Attach entrance timings for surfaces that animate on their own.
    Scheduled,
    /// Bake the frame at this many milliseconds into the paint.
    At(u32),
}

/// Resolved radius and stroke of one blip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub stroke_width: f64,
}

/// Blip styling under the current hover/selection state.
pub fn marker_style(style: &RadarStyle, state: &SelectionState, index: ItemIndex) -> MarkerStyle {
    MarkerStyle {
        radius: if state.is_hovered(index) {
            style.blip_radius + style.hover_extra
        } else {
            style.blip_radius
        },
        stroke_width: if state.is_selected(index) {
            style.selected_stroke_width
        } else {
            style.stroke_width
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RadarStyle,
}

impl Renderer {
    pub const fn new(style: RadarStyle) -> Self {
        Self { style }
    }

    pub const fn style(&self) -> &RadarStyle {
        &self.style
    }

    /// Full redraw. The scene shape is checked before the surface is touched;
    /// an absent surface leaves everything as it was.
    pub fn render<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        state: &SelectionState,
        transitions: Transitions,
        surface: Option<&mut S>,
    ) -> Result<usize, RadarError> {
        let commands = self.display_list(scene, state, transitions)?;
        let surface = surface.ok_or(RadarError::MissingSurface)?;

        replay(&commands, surface);

        tracing::trace!(commands = commands.len(), ?transitions, "rendered radar");
        Ok(commands.len())
    }

    /// The back-to-front command list for one frame.
    pub fn display_list(
        &self,
        scene: &Scene,
        state: &SelectionState,
        transitions: Transitions,
    ) -> Result<Vec<DrawCommand>, RadarError> {
        scene.check_shape()?;

        let style = &self.style;
        let mut list = DisplayList::new(style.animation_ms, transitions);

        list.push(
            Layer::Background,
            ElementId::Background,
            Shape::Circle {
                center: Point::ORIGIN,
                radius: scene.chart_radius,
            },
            Paint::fill(style.background, 1.0),
            None,
        );

        // Outermost first so inner fills stack on top.
        for (order, circle) in scene.ring_circles.iter().rev().enumerate() {
            list.push(
                Layer::RingFills,
                ElementId::RingFill(circle.ring_id),
                Shape::Circle {
                    center: Point::ORIGIN,
                    radius: circle.radius,
                },
                Paint::fill(circle.color, style.ring_fill_opacity),
                Some((style.rings_stagger, order)),
            );
        }

        for circle in &scene.ring_circles {
            list.push(
                Layer::RingStrokes,
                ElementId::RingStroke(circle.ring_id),
                Shape::Circle {
                    center: Point::ORIGIN,
                    radius: circle.radius,
                },
                Paint::stroke(style.grid, style.grid_width),
                Some((style.rings_stagger, circle.ring_id)),
            );
        }

        for (order, divider) in scene.dividers.iter().enumerate() {
            list.push(
                Layer::Dividers,
                ElementId::Divider(order),
                Shape::Line {
                    from: divider.from,
                    to: divider.to,
                },
                Paint::stroke(style.grid, style.grid_width),
                Some((style.dividers_stagger, order)),
            );
        }

        for label in &scene.ring_labels {
            list.push(
                Layer::RingLabels,
                ElementId::RingLabel(label.ring_id),
                Shape::Text {
                    position: label.position,
                    lines: vec![label.text.clone()],
                    font_size: style.ring_label_font_size,
                    line_height: style.ring_label_font_size,
                    bold: true,
                },
                Paint::fill(label.color, style.ring_label_opacity),
                Some((style.ring_labels_stagger, label.ring_id)),
            );
        }

        for label in &scene.quadrant_labels {
            list.push(
                Layer::QuadrantLabels,
                ElementId::QuadrantLabel(label.quadrant_id),
                Shape::Text {
                    position: label.position,
                    lines: label.lines.clone(),
                    font_size: style.quadrant_label_font_size,
                    line_height: style.quadrant_label_line_height,
                    bold: true,
                },
                Paint::fill(label.color, style.quadrant_label_opacity),
                Some((style.quadrant_labels_stagger, label.quadrant_id)),
            );
        }

        for (order, marker) in scene.markers.iter().enumerate() {
            let resolved = marker_style(style, state, marker.index);

            list.push(
                Layer::Halos,
                ElementId::Halo(marker.index),
                Shape::Circle {
                    center: marker.position,
                    radius: style.blip_radius + style.halo_extra,
                },
                Paint::fill(marker.color, style.halo_opacity),
                Some((style.markers_stagger, order)),
            );
            list.push(
                Layer::Markers,
                ElementId::Marker(marker.index),
                Shape::Circle {
                    center: marker.position,
                    radius: resolved.radius,
                },
                Paint {
                    fill: Some(marker.color),
                    stroke: Some(style.blip_stroke),
                    stroke_width: resolved.stroke_width,
                    opacity: 1.0,
                },
                Some((style.markers_stagger, order)),
            );
            list.push(
                Layer::Numbers,
                ElementId::Number(marker.index),
                Shape::Text {
                    position: marker.position,
                    lines: vec![marker.display_number.to_string()],
                    font_size: style.number_font_size,
                    line_height: style.number_font_size,
                    bold: true,
                },
                Paint::fill(marker.color.contrasting(), 1.0),
                Some((style.numbers_stagger, order)),
            );
        }

        Ok(list.commands)
    }
}

struct DisplayList {
    duration_ms: u32,
    transitions: Transitions,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    const fn new(duration_ms: u32, transitions: Transitions) -> Self {
        Self {
            duration_ms,
            transitions,
            commands: Vec::new(),
        }
    }

    fn push(
        &mut self,
        layer: Layer,
        element: ElementId,
        mut shape: Shape,
        mut paint: Paint,
        stagger: Option<(Stagger, usize)>,
    ) {
        let entrance = stagger.map(|(stagger, order)| Entrance {
            delay_ms: stagger.delay_ms(order),
            duration_ms: self.duration_ms,
        });

        let entrance = match (self.transitions, entrance) {
            (Transitions::Scheduled, entrance) => entrance,
            (Transitions::At(elapsed_ms), Some(entrance)) => {
                let progress = entrance.progress(elapsed_ms);
                match (&mut shape, layer) {
                    // Blips grow from nothing; everything else fades in.
                    (Shape::Circle { radius, .. }, Layer::Halos | Layer::Markers) => {
                        *radius *= progress;
                    }
                    _ => paint.opacity *= progress,
                }
                None
            }
            _ => None,
        };

        self.commands.push(DrawCommand {
            layer,
            element,
            shape,
            paint,
            entrance,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::tests::{item, radar};
    use crate::scene::SceneBuilder;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Records every call so tests can inspect what reached the surface.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub clears: usize,
        pub commands: Vec<DrawCommand>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
            self.commands.clear();
        }

        fn draw(&mut self, command: &DrawCommand) {
            self.commands.push(command.clone());
        }
    }

    fn scene() -> Scene {
        let radar = radar(vec![
            item("CI/CD", 0, 0),
            item("Git", 1, 0),
            item("Docker", 2, 0),
        ]);
        SceneBuilder::default()
            .build_radar(&radar, 350.0, &mut StdRng::seed_from_u64(8))
            .unwrap()
    }

    fn marker_paint(commands: &[DrawCommand], index: ItemIndex) -> (f64, f64) {
        commands
            .iter()
            .find_map(|command| match (&command.element, &command.shape) {
                (ElementId::Marker(i), Shape::Circle { radius, .. }) if *i == index => {
                    Some((*radius, command.paint.stroke_width))
                }
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn draws_layers_back_to_front_after_clearing() {
        let scene = scene();
        let mut surface = RecordingSurface::default();

        let drawn = Renderer::default()
            .render(&scene, &SelectionState::default(), Transitions::Off, Some(&mut surface))
            .unwrap();

        assert_eq!(surface.clears, 1);
        assert_eq!(drawn, 1 + 4 * 5 + 3 * 3);
        assert_eq!(surface.commands[0].element, ElementId::Background);

        let first_blip = surface
            .commands
            .iter()
            .position(|command| command.layer == Layer::Halos)
            .unwrap();
        let (frame, blips) = surface.commands.split_at(first_blip);
        assert!(frame.windows(2).all(|pair| pair[0].layer <= pair[1].layer));
        assert!(frame.iter().all(|command| command.layer < Layer::Halos));

        let groups: Vec<_> = blips
            .chunks(3)
            .map(|group| {
                (
                    group.iter().map(|command| command.layer).collect::<Vec<_>>(),
                    group.iter().map(|command| command.element.item()).collect::<Vec<_>>(),
                )
            })
            .collect();
        let expected: Vec<_> = scene
            .markers
            .iter()
            .map(|marker| {
                (
                    vec![Layer::Halos, Layer::Markers, Layer::Numbers],
                    vec![Some(marker.index); 3],
                )
            })
            .collect();
        assert_eq!(groups, expected);
    }

    #[test]
    fn rendering_twice_replaces_the_previous_frame() {
        let scene = scene();
        let renderer = Renderer::default();
        let mut surface = RecordingSurface::default();
        let state = SelectionState::default();

        renderer.render(&scene, &state, Transitions::Off, Some(&mut surface)).unwrap();
        let first = surface.commands.clone();
        renderer.render(&scene, &state, Transitions::Off, Some(&mut surface)).unwrap();

        assert_eq!(surface.clears, 2);
        assert_eq!(surface.commands, first);
    }

    #[test]
    fn marker_numbers_use_a_contrasting_colour() {
        let scene = scene();
        let commands = Renderer::default()
            .display_list(&scene, &SelectionState::default(), Transitions::Off)
            .unwrap();

        let number = commands
            .iter()
            .find(|command| command.element == ElementId::Number(1))
            .unwrap();
        let Shape::Text { lines, .. } = &number.shape else {
            panic!("number is not text");
        };
        assert_eq!(lines, &vec!["2".to_string()]);
        assert_eq!(number.paint.fill, Some(scene.markers[1].color.contrasting()));
    }

    #[test]
    fn hover_enlarges_and_selection_thickens_the_stroke() {
        let scene = scene();
        let state = SelectionState {
            hovered: Some(0),
            selected: Some(2),
        };
        let commands = Renderer::default()
            .display_list(&scene, &state, Transitions::Off)
            .unwrap();

        assert_eq!(marker_paint(&commands, 0), (16.0, 2.5));
        assert_eq!(marker_paint(&commands, 1), (12.0, 2.5));
        assert_eq!(marker_paint(&commands, 2), (12.0, 4.0));
    }

    #[test]
    fn wrong_shape_fails_before_touching_the_surface() {
        let mut scene = scene();
        scene.quadrants.pop();
        let mut surface = RecordingSurface::default();

        let error = Renderer::default()
            .render(&scene, &SelectionState::default(), Transitions::Off, Some(&mut surface))
            .unwrap_err();

        assert_eq!(error, RadarError::InvalidScene { quadrants: 3, rings: 4 });
        assert_eq!(surface.clears, 0);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn absent_surface_is_reported_without_drawing() {
        let error = Renderer::default()
            .render::<RecordingSurface>(&scene(), &SelectionState::default(), Transitions::Off, None)
            .unwrap_err();
        assert_eq!(error, RadarError::MissingSurface);
    }

    #[test]
    fn scheduled_entrances_follow_the_stagger() {
        let scene = scene();
        let commands = Renderer::default()
            .display_list(&scene, &SelectionState::default(), Transitions::Scheduled)
            .unwrap();

        let delay = |element: ElementId| {
            commands
                .iter()
                .find(|command| command.element == element)
                .and_then(|command| command.entrance)
                .map(|entrance| entrance.delay_ms)
        };

        assert_eq!(delay(ElementId::Background), None);
        assert_eq!(delay(ElementId::RingStroke(2)), Some(140));
        assert_eq!(delay(ElementId::RingLabel(1)), Some(420));
        assert_eq!(delay(ElementId::QuadrantLabel(3)), Some(710));
        assert_eq!(delay(ElementId::Marker(2)), Some(770));
        assert_eq!(delay(ElementId::Number(2)), Some(920));
    }

    #[test]
    fn transitions_never_change_order_and_settle_to_the_final_frame() {
        let scene = scene();
        let renderer = Renderer::default();
        let state = SelectionState::default();
        let settled = renderer.display_list(&scene, &state, Transitions::Off).unwrap();
        let elements: Vec<ElementId> = settled.iter().map(|c| c.element).collect();

        for elapsed in [0, 300, 800, 1200] {
            let frame = renderer
                .display_list(&scene, &state, Transitions::At(elapsed))
                .unwrap();
            assert_eq!(frame.iter().map(|c| c.element).collect::<Vec<_>>(), elements);
        }

        let start = renderer.display_list(&scene, &state, Transitions::At(0)).unwrap();
        assert_eq!(marker_paint(&start, 0).0, 0.0);

        let end = renderer
            .display_list(&scene, &state, Transitions::At(renderer.style().settle_ms(3)))
            .unwrap();
        assert_eq!(end, settled);
    }

    #[test]
    fn multi_line_text_is_stacked_around_its_position() {
        let shape = Shape::Text {
            position: Point { x: 5.0, y: 100.0 },
            lines: vec!["LANGUAGES &".to_string(), "FRAMEWORKS".to_string()],
            font_size: 13.0,
            line_height: 16.0,
            bold: true,
        };

        let lines = shape.text_lines();
        assert_eq!(lines[0], (Point { x: 5.0, y: 92.0 }, "LANGUAGES &"));
        assert_eq!(lines[1], (Point { x: 5.0, y: 108.0 }, "FRAMEWORKS"));
    }
}
