use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geometry::Placement;
use crate::model::Rgb;

/// Largest container edge the chart grows to.
pub const MAX_CHART_SIZE: f64 = 880.0;

/// Space between the outer ring and the container edge, for labels.
pub const LABEL_GUTTER: f64 = 90.0;

const MIN_CHART_RADIUS: f64 = 24.0;

/// Radius of the chart drawn into a square container of edge `size`.
pub fn chart_radius_for(size: f64) -> f64 {
    let size = size.min(MAX_CHART_SIZE);
    (size / 2.0 - LABEL_GUTTER).max(MIN_CHART_RADIUS)
}

/// Delay before one element of a layer starts its entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stagger {
    pub base_ms: u32,
    pub step_ms: u32,
}

impl Stagger {
    pub const fn new(base_ms: u32, step_ms: u32) -> Self {
        Self { base_ms, step_ms }
    }

    pub fn delay_ms(self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_ms
            .saturating_add(self.step_ms.saturating_mul(index))
    }
}

/// Visual constants shared by every surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarStyle {
    pub background: Rgb,
    pub grid: Rgb,
    pub grid_width: f64,
    pub ring_fill_opacity: f64,

    pub blip_radius: f64,
    pub halo_extra: f64,
    pub halo_opacity: f64,
    pub hover_extra: f64,
    pub blip_stroke: Rgb,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
    pub number_font_size: f64,

    pub ring_label_angle: f64,
    pub ring_label_radius_factor: f64,
    pub ring_label_font_size: f64,
    pub ring_label_opacity: f64,

    /// Distance of quadrant labels from the centre, as a multiple of R.
    pub quadrant_label_radius_factor: f64,
    pub quadrant_label_font_size: f64,
    pub quadrant_label_line_height: f64,
    pub quadrant_label_opacity: f64,

    pub margin_fraction: f64,
    pub ring_padding: f64,

    pub animation_ms: u32,
    pub rings_stagger: Stagger,
    pub dividers_stagger: Stagger,
    pub ring_labels_stagger: Stagger,
    pub quadrant_labels_stagger: Stagger,
    pub markers_stagger: Stagger,
    pub numbers_stagger: Stagger,

    /// Tooltip offset from the pointer, right and up.
    pub tooltip_offset: (f64, f64),
}

impl Default for RadarStyle {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            grid: Rgb(0xe5, 0xe7, 0xeb),
            grid_width: 1.5,
            ring_fill_opacity: 0.02,

            blip_radius: 12.0,
            halo_extra: 6.0,
            halo_opacity: 0.12,
            hover_extra: 4.0,
            blip_stroke: Rgb::WHITE,
            stroke_width: 2.5,
            selected_stroke_width: 4.0,
            number_font_size: 10.0,

            ring_label_angle: PI / 4.5,
            ring_label_radius_factor: 0.90,
            ring_label_font_size: 10.0,
            ring_label_opacity: 0.8,

            quadrant_label_radius_factor: 0.75 * std::f64::consts::SQRT_2,
            quadrant_label_font_size: 13.0,
            quadrant_label_line_height: 16.0,
            quadrant_label_opacity: 0.85,

            margin_fraction: 0.15,
            ring_padding: 18.0,

            animation_ms: 700,
            rings_stagger: Stagger::new(0, 70),
            dividers_stagger: Stagger::new(0, 70),
            ring_labels_stagger: Stagger::new(350, 70),
            quadrant_labels_stagger: Stagger::new(500, 70),
            markers_stagger: Stagger::new(700, 35),
            numbers_stagger: Stagger::new(850, 35),

            tooltip_offset: (12.0, 12.0),
        }
    }
}

impl RadarStyle {
    pub const fn placement(&self) -> Placement {
        Placement {
            margin_fraction: self.margin_fraction,
            ring_padding: self.ring_padding,
        }
    }

    /// Time until the last element of a chart with `markers` blips has settled.
    pub fn settle_ms(&self, markers: usize) -> u32 {
        let last = markers.saturating_sub(1);
        self.numbers_stagger
            .delay_ms(last)
            .max(self.quadrant_labels_stagger.delay_ms(3))
            .saturating_add(self.animation_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_radius_leaves_room_for_labels() {
        assert!((chart_radius_for(880.0) - 350.0).abs() < f64::EPSILON);
        assert!((chart_radius_for(2000.0) - 350.0).abs() < f64::EPSILON);
        assert!((chart_radius_for(100.0) - MIN_CHART_RADIUS).abs() < f64::EPSILON);
    }

    #[test]
    fn stagger_grows_with_index() {
        let stagger = RadarStyle::default().markers_stagger;
        assert_eq!(stagger.delay_ms(0), 700);
        assert_eq!(stagger.delay_ms(4), 840);
    }

    #[test]
    fn settle_time_covers_the_last_number() {
        let style = RadarStyle::default();
        assert_eq!(style.settle_ms(10), 850 + 9 * 35 + 700);
        assert_eq!(style.settle_ms(0), 850 + 700);
    }
}
