use rand::Rng;
use serde::Serialize;

use crate::error::{IntegrityError, RadarError};
use crate::geometry::{sector_of, Point};
use crate::model::{Categories, Item, ItemIndex, Quadrant, Radar, Rgb, Ring, QUADRANT_COUNT, RING_COUNT};
use crate::style::RadarStyle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingCircle {
    pub ring_id: usize,
    pub radius: f64,
    pub color: Rgb,
}

/// Radius segment on a quadrant boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divider {
    pub angle: f64,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingLabel {
    pub ring_id: usize,
    pub text: String,
    pub position: Point,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantLabel {
    pub quadrant_id: usize,
    /// One entry per text line, drawn top to bottom from `position`.
    pub lines: Vec<String>,
    pub position: Point,
    pub color: Rgb,
}

/// One blip, positioned for this render pass only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub index: ItemIndex,
    /// 1-based, equal to the legend row number of the same item.
    pub display_number: usize,
    pub item: Item,
    pub angle: f64,
    pub radius: f64,
    pub position: Point,
    pub color: Rgb,
    pub ring_color: Rgb,
}

/// Everything the renderer needs, already positioned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub chart_radius: f64,
    pub quadrants: Vec<Quadrant>,
    pub rings: Vec<Ring>,
    pub ring_circles: Vec<RingCircle>,
    pub dividers: Vec<Divider>,
    pub ring_labels: Vec<RingLabel>,
    pub quadrant_labels: Vec<QuadrantLabel>,
    pub markers: Vec<Marker>,
}

impl Scene {
    /// Rejects anything that is not the fixed 4 quadrant by 4 ring shape.
    pub fn check_shape(&self) -> Result<(), RadarError> {
        if self.quadrants.len() == QUADRANT_COUNT && self.rings.len() == RING_COUNT {
            Ok(())
        } else {
            Err(RadarError::InvalidScene {
                quadrants: self.quadrants.len(),
                rings: self.rings.len(),
            })
        }
    }

    pub fn marker(&self, index: ItemIndex) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.index == index)
    }

    pub fn marker_by_number(&self, display_number: usize) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|marker| marker.display_number == display_number)
    }

    pub fn quadrant(&self, id: usize) -> Option<&Quadrant> {
        self.quadrants.get(id)
    }

    pub fn ring(&self, id: usize) -> Option<&Ring> {
        self.rings.get(id)
    }
}

/// Turns categories and items into a positioned [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    style: RadarStyle,
}

impl SceneBuilder {
    pub const fn new(style: RadarStyle) -> Self {
        Self { style }
    }

    pub const fn style(&self) -> &RadarStyle {
        &self.style
    }

    pub fn build_radar<R: Rng + ?Sized>(
        &self,
        radar: &Radar,
        chart_radius: f64,
        rng: &mut R,
    ) -> Result<Scene, RadarError> {
        self.build(radar.categories(), radar.items(), chart_radius, rng)
    }

    /// Builds the scene, re-sampling every marker position.
    ///
    /// Fails with `DataIntegrity` instead of clamping bad ids.
    pub fn build<R: Rng + ?Sized>(
        &self,
        categories: &Categories,
        items: &[Item],
        chart_radius: f64,
        rng: &mut R,
    ) -> Result<Scene, RadarError> {
        categories.validate()?;

        let placement = self.style.placement();
        let markers = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let quadrant = categories.quadrants.get(item.quadrant_id).ok_or_else(|| {
                    IntegrityError::DanglingQuadrant {
                        index,
                        name: item.name.clone(),
                        id: item.quadrant_id,
                    }
                })?;
                let ring = categories.rings.get(item.ring_id).ok_or_else(|| {
                    IntegrityError::DanglingRing {
                        index,
                        name: item.name.clone(),
                        id: item.ring_id,
                    }
                })?;
                let sample = placement
                    .sample_point(item.quadrant_id, item.ring_id, &categories.rings, chart_radius, rng)
                    .ok_or(IntegrityError::DanglingQuadrant {
                        index,
                        name: item.name.clone(),
                        id: item.quadrant_id,
                    })?;

                Ok(Marker {
                    index,
                    display_number: index + 1,
                    item: item.clone(),
                    angle: sample.angle,
                    radius: sample.radius,
                    position: sample.point,
                    color: quadrant.color,
                    ring_color: ring.color,
                })
            })
            .collect::<Result<Vec<_>, IntegrityError>>()?;

        let scene = Scene {
            chart_radius,
            quadrants: categories.quadrants.clone(),
            rings: categories.rings.clone(),
            ring_circles: Self::ring_circles(&categories.rings, chart_radius),
            dividers: Self::dividers(chart_radius),
            ring_labels: self.ring_labels(&categories.rings, chart_radius),
            quadrant_labels: self.quadrant_labels(&categories.quadrants, chart_radius),
            markers,
        };

        tracing::debug!(
            markers = scene.markers.len(),
            chart_radius,
            "built radar scene"
        );

        Ok(scene)
    }

    fn ring_circles(rings: &[Ring], chart_radius: f64) -> Vec<RingCircle> {
        rings
            .iter()
            .map(|ring| RingCircle {
                ring_id: ring.id,
                radius: ring.outer_radius_fraction * chart_radius,
                color: ring.color,
            })
            .collect()
    }

    fn dividers(chart_radius: f64) -> Vec<Divider> {
        (0..QUADRANT_COUNT)
            .filter_map(sector_of)
            .map(|sector| Divider {
                angle: sector.start,
                from: Point::ORIGIN,
                to: Point::from_polar(sector.start, chart_radius),
            })
            .collect()
    }

    fn ring_labels(&self, rings: &[Ring], chart_radius: f64) -> Vec<RingLabel> {
        // Labels sit above the horizontal axis, counter-clockwise from 0.
        let angle = -self.style.ring_label_angle;
        rings
            .iter()
            .map(|ring| RingLabel {
                ring_id: ring.id,
                text: ring.name.to_uppercase(),
                position: Point::from_polar(
                    angle,
                    ring.outer_radius_fraction * chart_radius * self.style.ring_label_radius_factor,
                ),
                color: ring.color,
            })
            .collect()
    }

    fn quadrant_labels(&self, quadrants: &[Quadrant], chart_radius: f64) -> Vec<QuadrantLabel> {
        quadrants
            .iter()
            .filter_map(|quadrant| {
                let sector = sector_of(quadrant.id)?;
                Some(QuadrantLabel {
                    quadrant_id: quadrant.id,
                    lines: quadrant.label.lines().map(str::to_string).collect(),
                    position: Point::from_polar(
                        sector.bisector(),
                        chart_radius * self.style.quadrant_label_radius_factor,
                    ),
                    color: quadrant.color,
                })
            })
            .collect()
    }
}
