use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tech_radar_engine::{
    DetailPanel, InteractionController, Legend, LoadGate, Radar, RadarStyle, Renderer, RetryPolicy, Scene,
    SceneBuilder, Tooltip, Transitions,
};

use crate::config::AppConfig;
use crate::data::placement_rng;
use crate::ui::layout::ChartViewport;

/// How long the loop keeps waiting for a usable chart area.
const SURFACE_RETRY: RetryPolicy = RetryPolicy {
    max_attempts: 40,
    interval: Duration::from_millis(50),
};

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub radar: Option<Radar>,
    pub scene: Option<Scene>,
    pub legend: Legend,
    pub detail: DetailPanel,
    pub controller: InteractionController,
    pub renderer: Renderer,
    pub builder: SceneBuilder,
    pub rng: StdRng,
    pub load_error: Option<String>,
    pub status_message: String,
    pub show_help: bool,
    pub transitions_enabled: bool,
    /// Highlighted legend row, in legend display order.
    pub legend_cursor: usize,
    pub detail_scroll: u16,
    pub tooltip: Option<Tooltip>,
    /// Viewport the current scene was laid out for.
    pub viewport: Option<ChartViewport>,
    pub gate: LoadGate,
    pub next_poll: Option<Instant>,
    pub scene_started: Instant,
    pub last_frame: Instant,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let style = RadarStyle::default();
        let now = Instant::now();

        Self {
            running: true,
            rng: placement_rng(config.seed),
            transitions_enabled: config.transitions,
            config,
            radar: None,
            scene: None,
            legend: Legend::default(),
            detail: DetailPanel::default(),
            controller: InteractionController::new(style.tooltip_offset),
            renderer: Renderer::new(style.clone()),
            builder: SceneBuilder::new(style),
            load_error: None,
            status_message: String::new(),
            show_help: false,
            legend_cursor: 0,
            detail_scroll: 0,
            tooltip: None,
            viewport: None,
            gate: LoadGate::new(SURFACE_RETRY),
            next_poll: None,
            scene_started: now,
            last_frame: now,
        }
    }

    pub const fn style(&self) -> &RadarStyle {
        self.renderer.style()
    }

    pub fn update(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Milliseconds since the current scene first appeared.
    pub fn elapsed_ms(&self) -> u32 {
        let elapsed = self.last_frame.saturating_duration_since(self.scene_started);
        u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX)
    }

    /// Entrance frame to draw, `Off` once everything has settled.
    pub fn transitions(&self) -> Transitions {
        if !self.transitions_enabled {
            return Transitions::Off;
        }

        let markers = self.scene.as_ref().map_or(0, |scene| scene.markers.len());
        let elapsed = self.elapsed_ms();
        if elapsed >= self.style().settle_ms(markers) {
            Transitions::Off
        } else {
            Transitions::At(elapsed)
        }
    }

    /// Radius around a blip that counts as pointing at it. Never smaller
    /// than one cell so the coarse terminal grid can still hit it.
    pub fn hit_radius(&self) -> f64 {
        let style = self.style();
        (style.blip_radius + style.hover_extra).max(crate::ui::layout::CELL_WIDTH_PX)
    }

    pub fn selected_legend_number(&self) -> Option<usize> {
        self.legend
            .rows()
            .nth(self.legend_cursor)
            .map(|row| row.display_number)
    }
}
