use thiserror::Error;

/// Errors raised while turning radar data into a drawn chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadarError {
    /// Malformed or out-of-range input. Fatal to the render.
    #[error("radar data rejected: {0}")]
    DataIntegrity(#[from] IntegrityError),

    /// A scene that does not have the fixed 4x4 shape reached the renderer.
    #[error("invalid scene: expected 4 quadrants and 4 rings, found {quadrants} and {rings}")]
    InvalidScene { quadrants: usize, rings: usize },

    /// The drawing target is not attached yet.
    #[error("drawing surface is not available")]
    MissingSurface,
}

/// The specific reason a data set failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    #[error("expected exactly 4 quadrants, found {0}")]
    QuadrantCount(usize),

    #[error("expected exactly 4 rings, found {0}")]
    RingCount(usize),

    #[error("{kind} at position {position} has id {id}")]
    CategoryOrder {
        kind: &'static str,
        position: usize,
        id: usize,
    },

    #[error("item #{index} ({name}) references unknown quadrant {id}")]
    DanglingQuadrant { index: usize, name: String, id: usize },

    #[error("item #{index} ({name}) references unknown ring {id}")]
    DanglingRing { index: usize, name: String, id: usize },

    #[error("ring {id} outer radius fraction {fraction} is outside (0, 1] or not increasing")]
    RingFraction { id: usize, fraction: f64 },

    #[error("could not parse radar data: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for IntegrityError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
