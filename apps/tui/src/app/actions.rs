use std::time::Instant;

use tech_radar_engine::{ClickTarget, Effect, InteractionEvent, Legend, Point, Readiness};

use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::data::load_radar;
use crate::ui::layout::ChartViewport;

impl App {
    /// (Re)loads the data file. Hover and selection start over; a failure
    /// replaces the chart with the error.
    pub async fn load(&mut self) {
        self.reset_interaction();
        self.scene = None;
        self.gate.reset();
        self.next_poll = None;

        match load_radar(&self.config.data_path).await {
            Ok(radar) => {
                self.status_message = format!("Loaded {} technologies", radar.items().len());
                self.radar = Some(radar);
                self.load_error = None;
            }
            Err(error) => {
                tracing::error!(error = %format!("{error:#}"), "failed to load radar data");
                self.radar = None;
                self.load_error = Some(format!("{error:#}"));
            }
        }
    }

    /// Called once per frame with the chart area available right now.
    ///
    /// A changed viewport drops the scene so it is laid out again for the
    /// new size. Building waits, bounded, until both data and a large
    /// enough area exist.
    pub fn prepare_frame(&mut self, viewport: Option<ChartViewport>) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.scene = None;
            self.controller.clear_hover();
            self.tooltip = None;
            self.gate.reset();
            self.next_poll = None;
        }

        if self.scene.is_some() || self.load_error.is_some() {
            return;
        }
        if self.next_poll.is_some_and(|at| Instant::now() < at) {
            return;
        }

        match self.gate.poll(self.radar.is_some(), viewport.is_some()) {
            Readiness::Ready => {
                self.next_poll = None;
                if let Some(viewport) = viewport {
                    self.build_scene(viewport);
                }
            }
            Readiness::Waiting { retry_in, .. } => {
                self.next_poll = Some(Instant::now() + retry_in);
            }
            Readiness::GaveUp { attempts } => {
                self.next_poll = None;
                self.status_message =
                    format!("Terminal too small to draw the radar (gave up after {attempts} tries)");
            }
        }
    }

    /// Lays the chart out again with fresh blip positions.
    pub fn rebuild_scene(&mut self) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        if self.radar.is_none() {
            return false;
        }

        self.build_scene(viewport);
        self.scene.is_some()
    }

    fn build_scene(&mut self, viewport: ChartViewport) {
        let Some(radar) = self.radar.as_ref() else {
            return;
        };

        match self
            .builder
            .build_radar(radar, viewport.chart_radius(), &mut self.rng)
        {
            Ok(scene) => {
                self.legend = Legend::build(&scene);
                self.legend_cursor = self.legend_cursor.min(self.legend.len().saturating_sub(1));
                self.controller.clear_hover();
                self.tooltip = None;
                self.detail.update(&scene, self.controller.state());
                self.scene = Some(scene);
                self.scene_started = Instant::now();
                self.last_frame = self.scene_started;
            }
            Err(error) => {
                tracing::error!(%error, "failed to lay out radar");
                self.load_error = Some(error.to_string());
                self.scene = None;
            }
        }
    }

    fn reset_interaction(&mut self) {
        self.controller.reset();
        self.detail.clear();
        self.tooltip = None;
        self.legend = Legend::default();
        self.legend_cursor = 0;
        self.detail_scroll = 0;
    }

    pub fn dispatch(&mut self, event: InteractionEvent) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let effects = self.controller.handle(scene, event);
        self.apply_effects(effects);
    }

    /// Pointer motion in chart pixels; `None` when it left the chart.
    pub fn pointer_moved(&mut self, point: Option<Point>) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        let effects = match point {
            Some(point) => self.controller.pointer_moved(scene, point, self.hit_radius()),
            None => match self.controller.state().hovered {
                Some(index) => self.controller.handle(scene, InteractionEvent::PointerLeave { index }),
                None => Vec::new(),
            },
        };
        self.apply_effects(effects);
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowTooltip(tooltip) => self.tooltip = Some(tooltip),
                Effect::HideTooltip => self.tooltip = None,
                Effect::ShowDetail(_) => {
                    if let Some(scene) = self.scene.as_ref() {
                        self.detail.update(scene, self.controller.state());
                    }
                    if let Some(view) = self.detail.view() {
                        self.status_message = format!("#{} {}", view.display_number, view.name);
                    }
                }
                Effect::ScrollDetailIntoView => {
                    if self.detail.take_scroll_request() {
                        self.detail_scroll = 0;
                        if let Some(position) = self
                            .controller
                            .state()
                            .selected
                            .and_then(|index| self.legend.position_of(index))
                        {
                            self.legend_cursor = position;
                        }
                    }
                }
                // Marker size and stroke follow the selection state on the next frame.
                Effect::EnlargeMarker(_)
                | Effect::RestoreMarkerSize(_)
                | Effect::EmphasizeStroke(_)
                | Effect::RestoreStroke(_) => {}
            }
        }
    }

    pub fn select_legend_cursor(&mut self) {
        if let Some(number) = self.selected_legend_number() {
            self.dispatch(InteractionEvent::Click(ClickTarget::LegendRow(number)));
        }
    }

    pub fn move_legend_cursor(&mut self, forward: bool) {
        let len = self.legend.len();
        self.legend_cursor = if forward {
            wrap_increment(self.legend_cursor, len)
        } else {
            wrap_decrement(self.legend_cursor, len)
        };
    }

    pub fn toggle_transitions(&mut self) {
        self.transitions_enabled = !self.transitions_enabled;
        self.scene_started = Instant::now();
        self.status_message = if self.transitions_enabled {
            "Transitions on".to_string()
        } else {
            "Transitions off".to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::tests::{data_file, SAMPLE};
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;
    use std::path::PathBuf;
    use tech_radar_engine::Phase;

    fn viewport(width: u16) -> Option<ChartViewport> {
        ChartViewport::new(Rect::new(1, 1, width, 30))
    }

    async fn loaded_app() -> (App, tempfile::NamedTempFile) {
        let file = data_file(SAMPLE, ".json");
        let config = AppConfig {
            data_path: file.path().to_path_buf(),
            seed: Some(3),
            ..AppConfig::default()
        };
        let mut app = App::new(config);
        app.load().await;
        app.prepare_frame(viewport(60));
        (app, file)
    }

    #[tokio::test]
    async fn builds_the_scene_once_data_and_surface_are_ready() {
        let (app, _file) = loaded_app().await;

        let scene = app.scene.as_ref().unwrap();
        assert_eq!(scene.markers.len(), 3);
        assert_eq!(app.legend.len(), 3);
        assert!(app.load_error.is_none());
    }

    #[tokio::test]
    async fn legend_row_two_selects_docker() {
        let (mut app, _file) = loaded_app().await;

        // Legend order: TDD (#3), Git (#1), Docker (#2).
        app.legend_cursor = 2;
        app.select_legend_cursor();

        let view = app.detail.view().unwrap();
        assert_eq!(view.name, "Docker");
        assert_eq!(view.tags, vec!["containers", "runtime"]);
        assert_eq!(app.controller.state().selected, Some(1));
        assert_eq!(app.legend_cursor, 2);
    }

    #[tokio::test]
    async fn hovering_a_blip_shows_its_tooltip() {
        let (mut app, _file) = loaded_app().await;
        // TDD sits alone in the trial ring, clear of the other blips.
        let position = app.scene.as_ref().unwrap().markers[2].position;

        app.pointer_moved(Some(position));
        assert_eq!(app.tooltip.as_ref().map(|t| t.title.as_str()), Some("TDD"));

        app.pointer_moved(None);
        assert!(app.tooltip.is_none());
        assert_eq!(app.controller.state().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn resampling_drops_the_hover_with_its_tooltip() {
        let (mut app, _file) = loaded_app().await;
        app.dispatch(InteractionEvent::Click(ClickTarget::Marker(0)));
        let position = app.scene.as_ref().unwrap().markers[2].position;
        app.pointer_moved(Some(position));
        assert!(app.controller.state().is_hovered(2));

        assert!(app.rebuild_scene());

        assert!(app.tooltip.is_none());
        assert_eq!(app.controller.state().tooltip_visible(), app.tooltip.is_some());
        assert_eq!(app.controller.state().phase(), Phase::Selected(0));

        app.pointer_moved(Some(position));
        app.prepare_frame(viewport(40));
        assert_eq!(app.controller.state().hovered, None);
        assert!(app.tooltip.is_none());
    }

    #[tokio::test]
    async fn resizing_resamples_but_keeps_the_selection() {
        let (mut app, _file) = loaded_app().await;
        app.dispatch(InteractionEvent::Click(ClickTarget::Marker(0)));
        let before = app.scene.as_ref().unwrap().chart_radius;

        app.prepare_frame(viewport(40));

        let scene = app.scene.as_ref().unwrap();
        assert!(scene.chart_radius < before);
        assert_eq!(app.controller.state().selected, Some(0));
        assert_eq!(app.detail.view().map(|view| view.name.as_str()), Some("Git"));
    }

    #[tokio::test]
    async fn waits_for_a_usable_surface() {
        let (mut app, _file) = loaded_app().await;

        app.prepare_frame(None);
        assert!(app.scene.is_none());
        assert!(app.next_poll.is_some());

        app.next_poll = None;
        app.prepare_frame(viewport(60));
        assert!(app.scene.is_some());
    }

    #[tokio::test]
    async fn load_failure_is_shown_instead_of_a_chart() {
        let mut app = App::new(AppConfig {
            data_path: PathBuf::from("/no/such/radar.json"),
            ..AppConfig::default()
        });
        app.load().await;
        app.prepare_frame(viewport(60));

        assert!(app.scene.is_none());
        assert!(app.load_error.as_deref().unwrap().contains("/no/such/radar.json"));
    }

    #[tokio::test]
    async fn cursor_wraps_around_the_legend() {
        let (mut app, _file) = loaded_app().await;

        app.move_legend_cursor(false);
        assert_eq!(app.legend_cursor, 2);
        app.move_legend_cursor(true);
        assert_eq!(app.legend_cursor, 0);
    }
}
