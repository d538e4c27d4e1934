use rand::rngs::StdRng;
use tech_radar_engine::{
    ClickTarget, DetailPanel, DrawCommand, Effect, InteractionController, InteractionEvent, Legend, Radar,
    RadarStyle, Renderer, Scene, SceneBuilder, Tooltip,
};

use crate::animation::{ClockMode, TransitionClock};
use crate::canvas::ChartArea;

/// Everything the page shows, driven by keyboard events and frame ticks.
#[derive(Debug)]
pub struct RadarView {
    pub radar: Option<Radar>,
    pub error: Option<String>,
    pub scene: Option<Scene>,
    pub legend: Legend,
    pub detail: DetailPanel,
    pub controller: InteractionController,
    pub tooltip: Option<Tooltip>,
    /// Highlighted legend row, in legend display order.
    pub cursor: usize,
    pub clock: TransitionClock,
    chart: Option<ChartArea>,
    renderer: Renderer,
    builder: SceneBuilder,
    rng: StdRng,
}

impl RadarView {
    pub fn new(rng: StdRng) -> Self {
        let style = RadarStyle::default();
        Self {
            radar: None,
            error: None,
            scene: None,
            legend: Legend::default(),
            detail: DetailPanel::default(),
            controller: InteractionController::new(style.tooltip_offset),
            tooltip: None,
            cursor: 0,
            clock: TransitionClock::new(ClockMode::Running),
            chart: None,
            renderer: Renderer::new(style.clone()),
            builder: SceneBuilder::new(style),
            rng,
        }
    }

    pub const fn style(&self) -> &RadarStyle {
        self.renderer.style()
    }

    pub fn set_radar(&mut self, radar: Radar) {
        self.radar = Some(radar);
        self.error = None;
        self.scene = None;
        self.controller.reset();
        self.detail.clear();
        self.tooltip = None;
        self.cursor = 0;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.scene = None;
    }

    /// Called every frame with the chart's current share of the grid. A new
    /// size lays the scene out again; the selection survives.
    pub fn prepare(&mut self, chart: Option<ChartArea>) {
        if chart != self.chart {
            self.chart = chart;
            self.scene = None;
        }
        if self.scene.is_none() && self.radar.is_some() {
            self.resample();
        }
    }

    /// Fresh blip positions at the current size.
    pub fn resample(&mut self) {
        let (Some(radar), Some(chart)) = (self.radar.as_ref(), self.chart) else {
            return;
        };

        match self.builder.build_radar(radar, chart.chart_radius(), &mut self.rng) {
            Ok(scene) => {
                self.legend = Legend::build(&scene);
                self.cursor = self.cursor.min(self.legend.len().saturating_sub(1));
                self.controller.clear_hover();
                self.detail.update(&scene, self.controller.state());
                self.tooltip = None;
                self.scene = Some(scene);
                self.clock.restart();
            }
            Err(error) => self.set_error(error.to_string()),
        }
    }

    pub const fn chart(&self) -> Option<ChartArea> {
        self.chart
    }

    /// This frame's display list, or `None` while there is nothing to draw.
    pub fn commands(&mut self, now_ms: f64) -> Option<Vec<DrawCommand>> {
        self.clock.tick(now_ms);
        let scene = self.scene.as_ref()?;
        let transitions = self.clock.transitions(self.style().settle_ms(scene.markers.len()));

        match self
            .renderer
            .display_list(scene, self.controller.state(), transitions)
        {
            Ok(commands) => Some(commands),
            Err(error) => {
                web_log(&format!("Failed to render radar: {error}"));
                None
            }
        }
    }

    /// Moves the legend cursor; the blip under it is treated as hovered.
    pub fn move_cursor(&mut self, forward: bool) {
        let len = self.legend.len();
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
        self.hover_cursor();
    }

    fn hover_cursor(&mut self) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        let mut effects = Vec::new();
        if let Some(index) = self.controller.state().hovered {
            effects.extend(self.controller.handle(scene, InteractionEvent::PointerLeave { index }));
        }

        let target = self
            .legend
            .rows()
            .nth(self.cursor)
            .and_then(|row| scene.marker(row.index));
        if let Some(marker) = target {
            effects.extend(self.controller.handle(
                scene,
                InteractionEvent::PointerEnter {
                    index: marker.index,
                    pointer: marker.position,
                },
            ));
        }
        self.apply(effects);
    }

    pub fn select_cursor(&mut self) {
        let Some(number) = self.legend.rows().nth(self.cursor).map(|row| row.display_number) else {
            return;
        };
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let effects = self
            .controller
            .handle(scene, InteractionEvent::Click(ClickTarget::LegendRow(number)));
        self.apply(effects);
    }

    pub fn toggle_transitions(&mut self) {
        self.clock.toggle();
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowTooltip(tooltip) => self.tooltip = Some(tooltip),
                Effect::HideTooltip => self.tooltip = None,
                Effect::ShowDetail(_) => {
                    if let Some(scene) = self.scene.as_ref() {
                        self.detail.update(scene, self.controller.state());
                    }
                }
                Effect::ScrollDetailIntoView => {
                    if self.detail.take_scroll_request() {
                        if let Some(position) = self
                            .controller
                            .state()
                            .selected
                            .and_then(|index| self.legend.position_of(index))
                        {
                            self.cursor = position;
                        }
                    }
                }
                Effect::EnlargeMarker(_)
                | Effect::RestoreMarkerSize(_)
                | Effect::EmphasizeStroke(_)
                | Effect::RestoreStroke(_) => {}
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn web_log(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn web_log(message: &str) {
    eprintln!("{message}");
}
