pub(crate) mod helpers;

use crate::app::state::App;
use crate::ui::layout::ScreenLayout;
use crate::ui::legend::row_at;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use tech_radar_engine::{hit_test, ClickTarget, InteractionEvent};

/// Lines moved by one PageUp/PageDown in the detail pane.
const DETAIL_PAGE: u16 = 5;

pub async fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_legend_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_legend_cursor(true),
        KeyCode::Home => app.legend_cursor = 0,
        KeyCode::End => app.legend_cursor = app.legend.len().saturating_sub(1),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_legend_cursor(),
        KeyCode::PageUp => app.detail_scroll = app.detail_scroll.saturating_sub(DETAIL_PAGE),
        KeyCode::PageDown => app.detail_scroll = app.detail_scroll.saturating_add(DETAIL_PAGE),
        KeyCode::Char('r') => {
            if app.rebuild_scene() {
                app.status_message = "Re-sampled blip positions".to_string();
            }
        }
        KeyCode::Char('t') => app.toggle_transitions(),
        KeyCode::Char('l') => {
            app.load().await;
        }
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::F(1) | KeyCode::Char('?')) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

/// Pointer input against the layout drawn in the last frame.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, layout: &ScreenLayout) {
    if app.show_help {
        return;
    }

    let (column, row) = (mouse.column, mouse.row);
    let pointer = app
        .viewport
        .and_then(|viewport| viewport.to_chart(column, row));

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => app.pointer_moved(pointer),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(point) = pointer {
                let hit = app
                    .scene
                    .as_ref()
                    .and_then(|scene| hit_test(scene, point, app.hit_radius()));
                if let Some(index) = hit {
                    app.dispatch(InteractionEvent::Click(ClickTarget::Marker(index)));
                }
                return;
            }

            let clicked = row_at(&app.legend, app.legend_cursor, layout.legend_body(), column, row)
                .map(|legend_row| legend_row.display_number);
            if let Some(number) = clicked {
                app.dispatch(InteractionEvent::Click(ClickTarget::LegendRow(number)));
            }
        }
        MouseEventKind::ScrollUp if layout.legend.contains((column, row).into()) => {
            app.move_legend_cursor(false);
        }
        MouseEventKind::ScrollDown if layout.legend.contains((column, row).into()) => {
            app.move_legend_cursor(true);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::tests::{data_file, SAMPLE};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use tech_radar_engine::Phase;

    async fn loaded_app() -> (App, ScreenLayout, tempfile::NamedTempFile) {
        let file = data_file(SAMPLE, ".json");
        let mut app = App::new(AppConfig {
            data_path: file.path().to_path_buf(),
            seed: Some(11),
            ..AppConfig::default()
        });
        app.load().await;
        let layout = ScreenLayout::compute(Rect::new(0, 0, 140, 48));
        app.prepare_frame(layout.chart_viewport());
        (app, layout, file)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn help_swallows_keys_until_closed() {
        let (mut app, _, _file) = loaded_app().await;

        handle_input(&mut app, KeyCode::F(1)).await;
        assert!(app.show_help);
        handle_input(&mut app, KeyCode::Char('q')).await;
        assert!(app.running);
        handle_input(&mut app, KeyCode::Esc).await;
        assert!(!app.show_help);

        handle_input(&mut app, KeyCode::Char('q')).await;
        assert!(!app.running);
    }

    #[tokio::test]
    async fn enter_selects_the_highlighted_row() {
        let (mut app, _, _file) = loaded_app().await;

        handle_input(&mut app, KeyCode::End).await;
        handle_input(&mut app, KeyCode::Enter).await;

        assert_eq!(app.detail.view().map(|view| view.name.as_str()), Some("Docker"));
        assert_eq!(app.controller.state().phase(), Phase::Selected(1));
    }

    #[tokio::test]
    async fn clicking_a_blip_selects_it() {
        let (mut app, layout, _file) = loaded_app().await;
        let viewport = app.viewport.unwrap();
        let (column, row) = viewport.to_cell(app.scene.as_ref().unwrap().markers[2].position);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), column, row), &layout);

        assert_eq!(app.controller.state().selected, Some(2));
        assert_eq!(app.detail.view().map(|view| view.name.as_str()), Some("TDD"));
    }

    #[tokio::test]
    async fn clicking_a_legend_row_selects_its_item() {
        let (mut app, layout, _file) = loaded_app().await;
        let body = layout.legend_body();

        // Header, TDD, header, Git.
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), body.x + 2, body.y + 3), &layout);

        assert_eq!(app.controller.state().selected, Some(0));
        assert_eq!(app.legend_cursor, 1);
    }

    #[tokio::test]
    async fn moving_off_the_chart_hides_the_tooltip() {
        let (mut app, layout, _file) = loaded_app().await;
        let viewport = app.viewport.unwrap();
        let (column, row) = viewport.to_cell(app.scene.as_ref().unwrap().markers[2].position);

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, column, row), &layout);
        assert!(app.tooltip.is_some());

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 0, 0), &layout);
        assert!(app.tooltip.is_none());
    }
}
