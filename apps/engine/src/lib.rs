//! Layout, rendering and interaction core of the Tech Radar.
//!
//! Data flows one way: [`Radar`] (validated items and categories) is laid
//! out by the [`SceneBuilder`] into a [`Scene`], which the [`Renderer`]
//! draws and the [`Legend`] lists. The [`InteractionController`] owns the
//! only mutable UI state, [`SelectionState`].

pub mod error;
pub mod geometry;
pub mod interaction;
pub mod legend;
pub mod loader;
pub mod model;
pub mod render;
pub mod scene;
pub mod style;
pub mod svg;

pub use error::{IntegrityError, RadarError};
pub use geometry::{band_of, sector_of, Band, Placement, Point, Sector};
pub use interaction::{
    hit_test, ClickTarget, Effect, InteractionController, InteractionEvent, Phase, SelectionState, Tooltip,
};
pub use legend::{Badge, DetailPanel, DetailView, Legend, LegendGroup, LegendRow};
pub use loader::{LoadGate, Readiness, RetryPolicy};
pub use model::{Categories, Item, ItemIndex, Quadrant, Radar, RadarData, Rgb, Ring};
pub use render::{marker_style, replay, DrawCommand, ElementId, Layer, Paint, Renderer, Shape, Surface, Transitions};
pub use scene::{Marker, Scene, SceneBuilder};
pub use style::{chart_radius_for, RadarStyle};
pub use svg::SvgSurface;
