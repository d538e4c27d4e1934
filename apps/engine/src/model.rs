use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;

pub const QUADRANT_COUNT: usize = 4;
pub const RING_COUNT: usize = 4;

/// Position of an item in the input ordering.
pub type ItemIndex = usize;

/// A 24-bit colour, written as `#rrggbb` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(0xff, 0xff, 0xff);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Relative luminance in 0..=1, good enough to choose a text colour.
    pub fn luminance(self) -> f64 {
        0.114f64.mul_add(
            f64::from(self.2),
            0.299f64.mul_add(f64::from(self.0), 0.587 * f64::from(self.1)),
        ) / 255.0
    }

    /// Black or white, whichever reads better on top of this colour.
    pub fn contrasting(self) -> Self {
        if self.luminance() > 0.6 {
            Self(0x11, 0x11, 0x11)
        } else {
            Self::WHITE
        }
    }
}

impl FromStr for Rgb {
    type Err = IntegrityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim().trim_start_matches('#');
        let invalid = || IntegrityError::Parse(format!("invalid colour {value:?}"));

        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = IntegrityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One of the four angular buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quadrant {
    pub id: usize,
    pub name: String,
    /// Chart label; a `\n` splits it over several lines.
    pub label: String,
    pub color: Rgb,
}

/// One of the four maturity bands, inner to outer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub id: usize,
    pub name: String,
    pub outer_radius_fraction: f64,
    pub color: Rgb,
}

/// Quadrant and ring tables shared by every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Categories {
    pub quadrants: Vec<Quadrant>,
    pub rings: Vec<Ring>,
}

impl Default for Categories {
    fn default() -> Self {
        let quadrant = |id, name: &str, label: &str, color| Quadrant {
            id,
            name: name.to_string(),
            label: label.to_string(),
            color,
        };
        let ring = |id, name: &str, outer_radius_fraction, color| Ring {
            id,
            name: name.to_string(),
            outer_radius_fraction,
            color,
        };

        Self {
            quadrants: vec![
                quadrant(0, "Techniques", "TECHNIQUES", Rgb(0x8f, 0xa2, 0x27)),
                quadrant(1, "Tools", "TOOLS", Rgb(0x1e, 0xaa, 0xdf)),
                quadrant(2, "Platforms", "PLATFORMS", Rgb(0xf3, 0x8a, 0x3e)),
                quadrant(
                    3,
                    "Languages & Frameworks",
                    "LANGUAGES &\nFRAMEWORKS",
                    Rgb(0x8b, 0x47, 0x89),
                ),
            ],
            rings: vec![
                ring(0, "Adopt", 0.25, Rgb(0x5b, 0xa3, 0x00)),
                ring(1, "Trial", 0.45, Rgb(0x00, 0x9e, 0xb0)),
                ring(2, "Assess", 0.70, Rgb(0xc7, 0xba, 0x00)),
                ring(3, "Hold", 0.92, Rgb(0xe0, 0x9b, 0x96)),
            ],
        }
    }
}

impl Categories {
    /// Checks the fixed 4x4 shape, id order and monotone ring fractions.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        if self.quadrants.len() != QUADRANT_COUNT {
            return Err(IntegrityError::QuadrantCount(self.quadrants.len()));
        }
        if self.rings.len() != RING_COUNT {
            return Err(IntegrityError::RingCount(self.rings.len()));
        }

        check_order("quadrant", self.quadrants.iter().map(|q| q.id))?;
        check_order("ring", self.rings.iter().map(|r| r.id))?;

        let mut previous = 0.0;
        for ring in &self.rings {
            let fraction = ring.outer_radius_fraction;
            if !(fraction > previous && fraction <= 1.0) {
                return Err(IntegrityError::RingFraction {
                    id: ring.id,
                    fraction,
                });
            }
            previous = fraction;
        }

        Ok(())
    }

    /// Largest outer fraction, i.e. how much of the chart radius the rings use.
    pub fn max_outer_fraction(&self) -> f64 {
        self.rings
            .last()
            .map_or(1.0, |ring| ring.outer_radius_fraction)
    }
}

fn check_order(kind: &'static str, ids: impl Iterator<Item = usize>) -> Result<(), IntegrityError> {
    for (position, id) in ids.enumerate() {
        if position != id {
            return Err(IntegrityError::CategoryOrder { kind, position, id });
        }
    }
    Ok(())
}

/// One radar entry as it arrives from the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "quadrant", alias = "quadrantId")]
    pub quadrant_id: usize,
    #[serde(rename = "ring", alias = "ringId")]
    pub ring_id: usize,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "url", alias = "detailUrl")]
    pub detail_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuadrantRecord {
    pub name: String,
    pub id: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RingRecord {
    pub name: String,
    pub id: usize,
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// The record produced by the data-generation step.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarData {
    pub technologies: Vec<Item>,
    pub quadrants: Vec<QuadrantRecord>,
    pub rings: Vec<RingRecord>,
}

impl RadarData {
    /// Parses either plain JSON or the generated `const radarData = {...};`
    /// script.
    pub fn parse(text: &str) -> Result<Self, IntegrityError> {
        let trimmed = text.trim_start();
        let json = if trimmed.starts_with('{') {
            trimmed
        } else {
            extract_object_literal(text).ok_or_else(|| {
                IntegrityError::Parse("no object literal found in data script".to_string())
            })?
        };

        Ok(serde_json::from_str(json)?)
    }
}

/// Slice from the first `{` to its matching `}`, skipping braces in strings.
fn extract_object_literal(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Validated data set: categories plus the items that reference them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Radar {
    categories: Categories,
    items: Vec<Item>,
}

impl Radar {
    pub fn new(categories: Categories, mut items: Vec<Item>) -> Result<Self, IntegrityError> {
        categories.validate()?;

        for (index, item) in items.iter_mut().enumerate() {
            if item.quadrant_id >= QUADRANT_COUNT {
                return Err(IntegrityError::DanglingQuadrant {
                    index,
                    name: item.name.clone(),
                    id: item.quadrant_id,
                });
            }
            if item.ring_id >= RING_COUNT {
                return Err(IntegrityError::DanglingRing {
                    index,
                    name: item.name.clone(),
                    id: item.ring_id,
                });
            }
            dedup_in_order(&mut item.tags);
        }

        Ok(Self { categories, items })
    }

    /// Merges a data record into the default category tables and validates it.
    ///
    /// Names and ring colours from the data win; radius fractions and
    /// quadrant colours come from `defaults`.
    pub fn from_data(data: RadarData, defaults: &Categories) -> Result<Self, IntegrityError> {
        if data.quadrants.len() != QUADRANT_COUNT {
            return Err(IntegrityError::QuadrantCount(data.quadrants.len()));
        }
        if data.rings.len() != RING_COUNT {
            return Err(IntegrityError::RingCount(data.rings.len()));
        }
        check_order("quadrant", data.quadrants.iter().map(|q| q.id))?;
        check_order("ring", data.rings.iter().map(|r| r.id))?;

        let quadrants = defaults
            .quadrants
            .iter()
            .zip(data.quadrants)
            .map(|(default, record)| {
                let label = if record.name == default.name {
                    default.label.clone()
                } else {
                    record.name.to_uppercase()
                };
                Quadrant {
                    id: record.id,
                    name: record.name,
                    label,
                    color: default.color,
                }
            })
            .collect();

        let rings = defaults
            .rings
            .iter()
            .zip(data.rings)
            .map(|(default, record)| Ring {
                id: record.id,
                name: record.name,
                outer_radius_fraction: default.outer_radius_fraction,
                color: record.color.unwrap_or(default.color),
            })
            .collect();

        Self::new(Categories { quadrants, rings }, data.technologies)
    }

    /// Parses and validates a data file in one step.
    pub fn parse(text: &str, defaults: &Categories) -> Result<Self, IntegrityError> {
        Self::from_data(RadarData::parse(text)?, defaults)
    }

    pub const fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn quadrants(&self) -> &[Quadrant] {
        &self.categories.quadrants
    }

    pub fn rings(&self) -> &[Ring] {
        &self.categories.rings
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index)
    }

    /// `None` for an item whose quadrant id this radar does not define.
    pub fn quadrant_of(&self, item: &Item) -> Option<&Quadrant> {
        self.categories.quadrants.get(item.quadrant_id)
    }

    pub fn ring_of(&self, item: &Item) -> Option<&Ring> {
        self.categories.rings.get(item.ring_id)
    }

    /// Item counts per quadrant, in quadrant id order.
    pub fn count_by_quadrant(&self) -> [usize; QUADRANT_COUNT] {
        let mut counts = [0; QUADRANT_COUNT];
        for item in &self.items {
            counts[item.quadrant_id] += 1;
        }
        counts
    }

    /// Item counts per ring, in ring id order.
    pub fn count_by_ring(&self) -> [usize; RING_COUNT] {
        let mut counts = [0; RING_COUNT];
        for item in &self.items {
            counts[item.ring_id] += 1;
        }
        counts
    }
}

fn dedup_in_order(tags: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
}
