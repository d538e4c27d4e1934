use crate::app::App;
use crate::ui::layout::{ChartViewport, ScreenLayout};
use crate::ui::legend::{legend_lines, scroll_offset, LegendLine};
use crate::ui::widgets::popup::{anchored_rect, centered_rect, ClearWidget};
use crate::ui::widgets::radar::{render_radar_canvas, render_radar_message, to_color};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tech_radar_engine::{Badge, DetailView, Tooltip};

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let layout = ScreenLayout::compute(f.area());

    render_title_section(app, f, layout.title);
    render_radar_section(app, f, layout.radar);
    render_legend_section(app, f, &layout);
    render_detail_section(app, f, layout.detail);
    render_status_section(app, f, layout.status);
    render_shortcuts(f, layout.shortcuts);

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn pane(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![Span::styled(
        "Tech Radar ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(radar) = app.radar.as_ref() {
        spans.push(Span::styled(
            format!("{} technologies  ", radar.items().len()),
            Style::default().fg(Color::White),
        ));
        for (ring, count) in radar.rings().iter().zip(radar.count_by_ring()) {
            spans.push(Span::styled(
                format!("{} {count}  ", ring.name),
                Style::default().fg(to_color(ring.color)),
            ));
        }
    }

    let title = Paragraph::new(TextLine::from(spans))
        .block(pane("== Tech Radar ==", Color::Cyan))
        .alignment(Alignment::Left);
    f.render_widget(title, area);
}

fn render_radar_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    f.render_widget(pane(" Radar ", Color::Green), area);
    let inner = area.inner(ratatui::layout::Margin::new(1, 1));

    if let Some(error) = app.load_error.as_deref() {
        render_radar_message(f, inner, &format!("Error: {error}"), Color::Red);
        return;
    }

    let Some(viewport) = app.viewport else {
        render_radar_message(f, inner, "Enlarge the terminal to draw the radar", Color::Yellow);
        return;
    };

    let Some(scene) = app.scene.as_ref() else {
        render_radar_message(f, inner, "Loading radar...", Color::Gray);
        return;
    };

    match app
        .renderer
        .display_list(scene, app.controller.state(), app.transitions())
    {
        Ok(commands) => {
            render_radar_canvas(f, &viewport, &commands, app.style().stroke_width);
        }
        Err(error) => {
            render_radar_message(f, inner, &format!("Error: {error}"), Color::Red);
            return;
        }
    }

    if let Some(tooltip) = app.tooltip.as_ref() {
        render_tooltip(f, &viewport, tooltip);
    }
}

/// A small bordered box just above and right of the pointer.
fn render_tooltip(f: &mut Frame<'_>, viewport: &ChartViewport, tooltip: &Tooltip) {
    let width = tooltip
        .title
        .chars()
        .count()
        .max(tooltip.subtitle.chars().count()) as u16
        + 4;

    let (column, row) = viewport.to_cell(tooltip.anchor);
    let popup = anchored_rect(column, row, width, 4, viewport.area);

    let text = Text::from(vec![
        TextLine::from(Span::styled(
            tooltip.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            tooltip.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ]);

    f.render_widget(ClearWidget, popup);
    f.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        popup,
    );
}

fn render_legend_section(app: &App, f: &mut Frame<'_>, layout: &ScreenLayout) {
    let body = layout.legend_body();
    let lines = legend_lines(&app.legend);
    let offset = scroll_offset(&lines, app.legend_cursor, body.height);
    let selected = app.controller.state().selected;
    let hovered = app.controller.state().hovered;
    let cursor_row = app.legend.rows().nth(app.legend_cursor).map(|row| row.index);

    let text: Vec<TextLine<'_>> = lines
        .iter()
        .skip(offset)
        .map(|line| match line {
            LegendLine::Header(group) => TextLine::from(Span::styled(
                group.name.clone(),
                Style::default()
                    .fg(to_color(group.color))
                    .add_modifier(Modifier::BOLD),
            )),
            LegendLine::Row(row) => {
                let mut name_style = Style::default().fg(Color::White);
                if Some(row.index) == selected {
                    name_style = name_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                if Some(row.index) == hovered {
                    name_style = name_style.fg(Color::Yellow);
                }
                let mut line = TextLine::from(vec![
                    Span::styled(
                        format!("{:>3}. ", row.display_number),
                        Style::default().fg(to_color(row.quadrant_color)),
                    ),
                    Span::styled(row.name.clone(), name_style),
                    Span::styled(
                        format!("  {}", row.ring_name),
                        Style::default().fg(to_color(row.ring_color)),
                    ),
                ]);
                if Some(row.index) == cursor_row {
                    line = line.style(Style::default().bg(Color::DarkGray));
                }
                line
            }
        })
        .collect();

    let title = format!(" Legend ({}) ", app.legend.len());
    f.render_widget(pane(&title, Color::Blue), layout.legend);
    f.render_widget(Paragraph::new(Text::from(text)), body);
}

fn render_detail_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = pane(" Details ", Color::Magenta);

    let Some(view) = app.detail.view() else {
        let hint = Paragraph::new(Span::styled(
            "Select a blip or a legend row to see its details",
            Style::default().fg(Color::Gray),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let detail = Paragraph::new(Text::from(detail_lines(view)))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));
    f.render_widget(detail, area);
}

fn badge(badge: &Badge) -> Span<'static> {
    Span::styled(
        format!(" {} ", badge.text),
        Style::default()
            .fg(to_color(badge.color.contrasting()))
            .bg(to_color(badge.color)),
    )
}

fn detail_lines(view: &DetailView) -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            format!("#{} {}", view.display_number, view.name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![badge(&view.quadrant), Span::raw(" "), badge(&view.ring)]),
    ];

    if !view.tags.is_empty() {
        let mut tags = vec![Span::styled("Tags: ", Style::default().fg(Color::Gray))];
        for tag in &view.tags {
            tags.push(Span::styled(format!("[{tag}] "), Style::default().fg(Color::Cyan)));
        }
        lines.push(TextLine::from(tags));
    }

    if let Some(description) = view.description.as_deref() {
        lines.push(TextLine::from(""));
        for paragraph in description.lines() {
            lines.push(TextLine::from(paragraph.to_string()));
        }
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(vec![
        Span::styled(
            view.link_text,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Span::styled(format!(" {}", view.detail_url), Style::default().fg(Color::Gray)),
    ]));

    lines
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.status_message.starts_with("Error") || app.load_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut message = app.status_message.clone();
    if !app.transitions_enabled {
        message.push_str("  (transitions off)");
    }

    let status = Paragraph::new(Span::styled(message, style))
        .block(pane(" Status ", Color::Yellow))
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn hint_span(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts = TextLine::from(vec![
        key_span("?"),
        hint_span(": Help | "),
        key_span("Up/Down"),
        hint_span(": Legend | "),
        key_span("Enter"),
        hint_span(": Select | "),
        key_span("r"),
        hint_span(": Re-sample | "),
        key_span("t"),
        hint_span(": Transitions | "),
        key_span("l"),
        hint_span(": Reload | "),
        key_span("q"),
        hint_span(": Quit"),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(pane("== Help & Keyboard Shortcuts ==", Color::Yellow))
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn help_entry(key: &'static str, text: &'static str) -> TextLine<'static> {
    TextLine::from(vec![key_span(key), Span::raw(text)])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            "Tech Radar",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Every blip is a technology, placed in its quadrant and ring. Hover a blip for its name, \
             click it or pick a legend row to open its details.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_entry("  ? / F1", " - Toggle this help popup"),
        help_entry("  Up/Down, k/j", " - Move through the legend"),
        help_entry("  Home/End", " - First or last legend row"),
        help_entry("  Enter/Space", " - Select the highlighted technology"),
        help_entry("  PgUp/PgDn", " - Scroll the details"),
        help_entry("  r", " - Re-sample blip positions"),
        help_entry("  t", " - Toggle entrance transitions"),
        help_entry("  l", " - Reload the data file"),
        help_entry("  q", " - Quit application"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Mouse:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from("  Hover a blip for a tooltip, click a blip or legend row to select it."),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "CLI Options:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::tests::{data_file, SAMPLE};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tech_radar_engine::{ClickTarget, InteractionEvent};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn draws_legend_and_selected_details() {
        let file = data_file(SAMPLE, ".json");
        let mut app = App::new(AppConfig {
            data_path: file.path().to_path_buf(),
            seed: Some(5),
            ..AppConfig::default()
        });
        app.load().await;

        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        app.prepare_frame(ScreenLayout::compute(Rect::new(0, 0, 140, 48)).chart_viewport());
        app.dispatch(InteractionEvent::Click(ClickTarget::LegendRow(2)));
        terminal.draw(|f| render_main(&app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Legend (3)"));
        assert!(text.contains("#2 Docker"));
        assert!(text.contains("[containers]"));
        assert!(text.contains("Container runtime."));
    }

    #[tokio::test]
    async fn load_errors_replace_the_chart() {
        let mut app = App::new(AppConfig {
            data_path: "/missing/radar.json".into(),
            ..AppConfig::default()
        });
        app.load().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render_main(&app, f)).unwrap();

        assert!(screen_text(&terminal).contains("Error: Failed to read radar data"));
    }
}
