use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::Rect;
use std::time::Duration;

use crate::app::{handle_input, handle_mouse, App};
use crate::terminal::RadarTerminal;
use crate::ui;
use crate::ui::layout::ScreenLayout;

/// Run the main application event loop
pub async fn run(terminal: &mut RadarTerminal, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms); also the frame interval while
    // the entrance transitions play.
    const EVENT_POLL_TIMEOUT: u64 = 50;

    while app.running {
        app.update();

        let size = terminal
            .size()
            .map_err(|e| color_eyre::eyre::eyre!("Terminal size error: {e}"))?;
        let layout = ScreenLayout::compute(Rect::new(0, 0, size.width, size.height));
        app.prepare_frame(layout.chart_viewport());

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(event) => handle_event(app, event, &layout).await,
                Err(e) => tracing::warn!(error = %e, "failed to read terminal event"),
            }
        }
    }

    tracing::info!("exiting");
    Ok(())
}

/// Routes one terminal event against the layout of the frame just drawn.
async fn handle_event(app: &mut App, event: Event, layout: &ScreenLayout) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_input(app, key.code).await;
        }
        Event::Mouse(mouse) => handle_mouse(app, mouse, layout),
        Event::Resize(width, height) => {
            // The next frame sees the new size and lays the chart out again.
            tracing::debug!(width, height, "terminal resized");
        }
        Event::Key(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::tests::{data_file, SAMPLE};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[tokio::test]
    async fn only_key_presses_are_handled() {
        let file = data_file(SAMPLE, ".json");
        let mut app = App::new(AppConfig {
            data_path: file.path().to_path_buf(),
            ..AppConfig::default()
        });
        let layout = ScreenLayout::compute(Rect::new(0, 0, 120, 40));

        handle_event(&mut app, key(KeyCode::Char('q'), KeyEventKind::Release), &layout).await;
        assert!(app.running);

        handle_event(&mut app, Event::Resize(80, 24), &layout).await;
        assert!(app.running);

        handle_event(&mut app, key(KeyCode::Char('q'), KeyEventKind::Press), &layout).await;
        assert!(!app.running);
    }
}
