//! Polar geometry of the radar: quadrant arcs, ring bands and blip sampling.
//!
//! Angles are radians in chart-local space, 0 on the positive x axis and
//! growing clockwise on screen because y points down.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::distr::Open01;
use rand::Rng;
use serde::Serialize;

use crate::model::{Ring, QUADRANT_COUNT};

/// Angular span owned by one quadrant.
pub const QUADRANT_SPAN: f64 = FRAC_PI_2;

/// The shrunk ring band never gets thinner than this many pixels.
pub const MIN_USABLE_BAND: f64 = 1.0;

/// Edge margin is capped so the shrunk arc keeps a positive width.
const MAX_MARGIN_FRACTION: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn from_polar(angle: f64, radius: f64) -> Self {
        Self {
            x: angle.cos() * radius,
            y: angle.sin() * radius,
        }
    }

    /// Angle in `[0, 2π)` and distance from the origin.
    pub fn to_polar(self) -> (f64, f64) {
        (self.y.atan2(self.x).rem_euclid(TAU), self.x.hypot(self.y))
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Half-open arc `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    pub fn bisector(self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains(self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

/// Annulus between two radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub inner: f64,
    pub outer: f64,
}

impl Band {
    pub fn width(self) -> f64 {
        self.outer - self.inner
    }

    pub fn mid(self) -> f64 {
        (self.inner + self.outer) / 2.0
    }
}

/// The fixed 90° arc of a quadrant, `None` for ids outside `0..4`.
pub fn sector_of(quadrant_id: usize) -> Option<Sector> {
    if quadrant_id >= QUADRANT_COUNT {
        return None;
    }

    let start = QUADRANT_SPAN * quadrant_id as f64;
    Some(Sector {
        start,
        end: start + QUADRANT_SPAN,
    })
}

/// Physical radial band of a ring at the given chart radius.
pub fn band_of(ring_id: usize, rings: &[Ring], chart_radius: f64) -> Option<Band> {
    let outer = rings.get(ring_id)?.outer_radius_fraction * chart_radius;
    let inner = ring_id
        .checked_sub(1)
        .and_then(|previous| rings.get(previous))
        .map_or(0.0, |ring| ring.outer_radius_fraction * chart_radius);

    Some(Band { inner, outer })
}

/// A sampled blip position in both coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub angle: f64,
    pub radius: f64,
    pub point: Point,
}

/// How far blips stay away from divider lines and ring boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Fraction of the quadrant arc left empty at each edge.
    pub margin_fraction: f64,
    /// Pixels left empty at the inner and outer ring boundary.
    pub ring_padding: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            margin_fraction: 0.15,
            ring_padding: 18.0,
        }
    }
}

impl Placement {
    /// The arc a blip may occupy once both edges are shrunk.
    pub fn usable_sector(&self, sector: Sector) -> Sector {
        let margin = sector.span() * self.margin_fraction.clamp(0.0, MAX_MARGIN_FRACTION);
        Sector {
            start: sector.start + margin,
            end: sector.end - margin,
        }
    }

    /// The radial range a blip may occupy once both boundaries are padded.
    ///
    /// Padding shrinks when the ring is thinner than twice the padding so
    /// that at least [`MIN_USABLE_BAND`] pixels remain.
    pub fn usable_band(&self, band: Band) -> Band {
        let max_padding = ((band.width() - MIN_USABLE_BAND) / 2.0).max(0.0);
        let padding = self.ring_padding.clamp(0.0, max_padding);
        Band {
            inner: band.inner + padding,
            outer: band.outer - padding,
        }
    }

    /// Draws one point uniformly inside the shrunk quadrant x ring cell.
    ///
    /// Every call is an independent draw; pass a seeded generator to pin
    /// the output.
    pub fn sample_point<R: Rng + ?Sized>(
        &self,
        quadrant_id: usize,
        ring_id: usize,
        rings: &[Ring],
        chart_radius: f64,
        rng: &mut R,
    ) -> Option<PolarPoint> {
        let sector = self.usable_sector(sector_of(quadrant_id)?);
        let band = self.usable_band(band_of(ring_id, rings, chart_radius)?);

        let along: f64 = rng.sample(Open01);
        let across: f64 = rng.sample(Open01);

        let angle = along.mul_add(sector.span(), sector.start);
        let radius = across.mul_add(band.width(), band.inner);

        Some(PolarPoint {
            angle,
            radius,
            point: Point::from_polar(angle, radius),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Categories;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn sectors_are_contiguous_and_cover_the_circle() {
        let sectors: Vec<Sector> = (0..QUADRANT_COUNT).filter_map(sector_of).collect();
        assert_eq!(sectors.len(), 4);

        assert_close(sectors[0].start, 0.0);
        for pair in sectors.windows(2) {
            assert_close(pair[0].end, pair[1].start);
        }
        for sector in &sectors {
            assert_close(sector.span(), FRAC_PI_2);
        }
        assert_close(sectors.iter().map(|s| s.span()).sum(), TAU);
        assert_eq!(sector_of(4), None);
    }

    #[test]
    fn bands_tile_the_used_radius() {
        let categories = Categories::default();
        for chart_radius in [1.0, 42.5, 350.0] {
            let bands: Vec<Band> = (0..4)
                .filter_map(|id| band_of(id, &categories.rings, chart_radius))
                .collect();

            assert_close(bands[0].inner, 0.0);
            for band in &bands {
                assert!(band.inner < band.outer);
            }
            for pair in bands.windows(2) {
                assert_close(pair[0].outer, pair[1].inner);
            }
            assert_close(
                bands[3].outer,
                chart_radius * categories.max_outer_fraction(),
            );
        }
        assert_eq!(band_of(4, &categories.rings, 100.0), None);
    }

    #[test]
    fn samples_stay_strictly_inside_their_cell() {
        let categories = Categories::default();
        let placement = Placement::default();
        let mut rng = StdRng::seed_from_u64(7);

        for chart_radius in [60.0, 350.0] {
            for quadrant_id in 0..4 {
                for ring_id in 0..4 {
                    let sector = sector_of(quadrant_id).unwrap();
                    let band = band_of(ring_id, &categories.rings, chart_radius).unwrap();

                    for _ in 0..1000 {
                        let sample = placement
                            .sample_point(quadrant_id, ring_id, &categories.rings, chart_radius, &mut rng)
                            .unwrap();

                        assert!(sample.angle > sector.start && sample.angle < sector.end);
                        assert!(sample.radius > band.inner && sample.radius < band.outer);

                        let (angle, radius) = sample.point.to_polar();
                        assert!((angle - sample.angle).abs() < 1e-9);
                        assert!((radius - sample.radius).abs() < 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn samples_respect_margin_and_padding() {
        let categories = Categories::default();
        let placement = Placement::default();
        let mut rng = StdRng::seed_from_u64(11);
        let chart_radius = 350.0;

        let band = band_of(2, &categories.rings, chart_radius).unwrap();
        for _ in 0..500 {
            let sample = placement
                .sample_point(1, 2, &categories.rings, chart_radius, &mut rng)
                .unwrap();
            let margin = FRAC_PI_2 * 0.15;
            assert!(sample.angle >= FRAC_PI_2 + margin);
            assert!(sample.angle <= 2.0 * FRAC_PI_2 - margin);
            assert!(sample.radius >= band.inner + 18.0);
            assert!(sample.radius <= band.outer - 18.0);
        }
    }

    #[test]
    fn thin_rings_clamp_padding_to_keep_a_usable_band() {
        let placement = Placement::default();
        let band = Band {
            inner: 10.0,
            outer: 20.0,
        };

        let usable = placement.usable_band(band);
        assert_close(usable.width(), MIN_USABLE_BAND);
        assert_close(usable.mid(), band.mid());

        let sliver = Band {
            inner: 10.0,
            outer: 10.5,
        };
        assert_eq!(placement.usable_band(sliver), sliver);
    }

    #[test]
    fn same_seed_pins_the_output_and_draws_are_independent() {
        let rings = Categories::default().rings;
        let placement = Placement::default();

        let mut first = StdRng::seed_from_u64(3);
        let mut second = StdRng::seed_from_u64(3);
        let a = placement.sample_point(0, 1, &rings, 300.0, &mut first);
        let b = placement.sample_point(0, 1, &rings, 300.0, &mut second);
        assert_eq!(a, b);

        let c = placement.sample_point(0, 1, &rings, 300.0, &mut first);
        assert_ne!(a, c);
    }

    #[test]
    fn unknown_cells_sample_nothing() {
        let rings = Categories::default().rings;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Placement::default()
            .sample_point(5, 0, &rings, 100.0, &mut rng)
            .is_none());
        assert!(Placement::default()
            .sample_point(0, 9, &rings, 100.0, &mut rng)
            .is_none());
    }
}
