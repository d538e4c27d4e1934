mod animation;
mod canvas;
mod view;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use tech_radar_engine::{Categories, LoadGate, Radar, RadarData, Readiness, RetryPolicy};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::canvas::{render_chart, to_color, ChartArea};
use crate::view::{web_log, RadarView};

const DATA_URL: &str = "radar-data.json";

fn main() -> io::Result<()> {
    let view = Rc::new(RefCell::new(RadarView::new(page_rng())));

    spawn_local(load_radar(view.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let view = view.clone();
        move |event| {
            let mut view = view.borrow_mut();
            match event.code {
                ratzilla::event::KeyCode::Up => view.move_cursor(false),
                ratzilla::event::KeyCode::Down => view.move_cursor(true),
                ratzilla::event::KeyCode::Enter => view.select_cursor(),
                ratzilla::event::KeyCode::Char('r') => view.resample(),
                ratzilla::event::KeyCode::Char('t') => view.toggle_transitions(),
                _ => {}
            }
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title("Tech Radar")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        let mut view = view.borrow_mut();
        render_page(&mut view, f, inner);
    });

    Ok(())
}

/// Placement randomness for this page load.
fn page_rng() -> StdRng {
    let noise = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let now = js_sys::Date::now() as u64;
    StdRng::seed_from_u64((noise << 32) ^ now)
}

fn render_page(view: &mut RadarView, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(12), Constraint::Length(1)])
        .split(columns[1]);

    render_radar_panel(view, f, columns[0]);
    render_legend(view, f, side[0]);
    render_detail(view, f, side[1]);

    let hint = Paragraph::new(TextLine::from(vec![
        Span::styled("Up/Down", Style::default().fg(Color::Yellow)),
        Span::styled(" legend  ", Style::default().fg(Color::Gray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" select  ", Style::default().fg(Color::Gray)),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::styled(" re-sample  ", Style::default().fg(Color::Gray)),
        Span::styled("t", Style::default().fg(Color::Yellow)),
        Span::styled(" transitions", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, side[2]);
}

fn message(f: &mut Frame<'_>, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color));
    f.render_widget(paragraph, area);
}

fn render_radar_panel(view: &mut RadarView, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Radar")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(error) = view.error.as_deref() {
        message(f, inner, &format!("Error: {error}"), Color::Red);
        return;
    }
    if view.radar.is_none() {
        message(f, inner, &format!("Loading {DATA_URL}..."), Color::Gray);
        return;
    }

    view.prepare(ChartArea::new(inner));
    let Some(chart) = view.chart() else {
        message(f, inner, "Enlarge the window to draw the radar", Color::Yellow);
        return;
    };

    let Some(commands) = view.commands(js_sys::Date::now()) else {
        return;
    };
    render_chart(f, &chart, &commands, view.style().stroke_width);

    if let Some(tooltip) = view.tooltip.as_ref() {
        let (column, row) = chart.to_cell(tooltip.anchor);
        let width = (tooltip.title.chars().count().max(tooltip.subtitle.chars().count()) as u16 + 4)
            .min(chart.area.width);
        let height = 4.min(chart.area.height);
        let popup = Rect {
            x: column.min(chart.area.right().saturating_sub(width)),
            y: row.saturating_sub(height - 1).max(chart.area.y),
            width,
            height,
        };

        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(
                    tooltip.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                TextLine::from(Span::styled(
                    tooltip.subtitle.clone(),
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .block(Block::default().borders(Borders::ALL)),
            popup,
        );
    }
}

fn render_legend(view: &RadarView, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Legend ({})", view.legend.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cursor_index = view.legend.rows().nth(view.cursor).map(|row| row.index);
    let selected = view.controller.state().selected;

    let mut lines = Vec::new();
    let mut cursor_line = 0;
    for group in &view.legend.groups {
        lines.push(TextLine::from(Span::styled(
            group.name.clone(),
            Style::default()
                .fg(to_color(group.color))
                .add_modifier(Modifier::BOLD),
        )));
        for row in &group.rows {
            let mut name_style = Style::default().fg(Color::White);
            if Some(row.index) == selected {
                name_style = name_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
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
            if Some(row.index) == cursor_index {
                cursor_line = lines.len();
                line = line.style(Style::default().bg(Color::DarkGray));
            }
            lines.push(line);
        }
    }

    let offset = (cursor_line + 1).saturating_sub(usize::from(inner.height));
    let visible: Vec<_> = lines.into_iter().skip(offset).collect();
    f.render_widget(Paragraph::new(Text::from(visible)), inner);
}

fn render_detail(view: &RadarView, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let Some(detail) = view.detail.view() else {
        let hint = Paragraph::new("Select a legend row to see its details")
            .style(Style::default().fg(Color::Gray))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let badge = |text: &str, color| {
        Span::styled(
            format!(" {text} "),
            Style::default()
                .fg(to_color(tech_radar_engine::Rgb::contrasting(color)))
                .bg(to_color(color)),
        )
    };

    let mut lines = vec![
        TextLine::from(Span::styled(
            format!("#{} {}", detail.display_number, detail.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![
            badge(&detail.quadrant.text, detail.quadrant.color),
            Span::raw(" "),
            badge(&detail.ring.text, detail.ring.color),
        ]),
    ];
    if !detail.tags.is_empty() {
        lines.push(TextLine::from(Span::styled(
            detail
                .tags
                .iter()
                .map(|tag| format!("[{tag}]"))
                .collect::<Vec<_>>()
                .join(" "),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(description) = detail.description.as_deref() {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(description.to_string()));
    }
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(vec![
        Span::styled(
            detail.link_text,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Span::styled(format!(" {}", detail.detail_url), Style::default().fg(Color::Gray)),
    ]));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Why a fetch attempt produced no radar.
enum FetchError {
    /// Worth retrying: network trouble or the file is not there yet.
    Unavailable(String),
    /// The file arrived but is not a valid radar.
    Invalid(String),
}

/// Fetches the data file, retrying on a fixed interval until it arrives or
/// the attempts run out.
async fn load_radar(view: Rc<RefCell<RadarView>>) {
    let mut gate = LoadGate::new(RetryPolicy::default());

    loop {
        let result = fetch_radar().await;
        if let Err(FetchError::Invalid(error)) = &result {
            web_log(&format!("Invalid {DATA_URL}: {error}"));
            view.borrow_mut().set_error(format!("Invalid {DATA_URL}: {error}"));
            return;
        }

        match gate.poll(result.is_ok(), true) {
            Readiness::Ready => {
                if let Ok(radar) = result {
                    view.borrow_mut().set_radar(radar);
                }
                return;
            }
            Readiness::Waiting { attempt, retry_in } => {
                if let Err(FetchError::Unavailable(error)) = &result {
                    web_sys::console::warn_1(&format!("Attempt {attempt} to load {DATA_URL} failed: {error}").into());
                }
                sleep(retry_in).await;
            }
            Readiness::GaveUp { attempts } => {
                let message = format!("Could not load {DATA_URL} after {attempts} attempts");
                web_log(&message);
                view.borrow_mut().set_error(message);
                return;
            }
        }
    }
}

async fn fetch_radar() -> Result<Radar, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Unavailable("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(DATA_URL, &opts)
        .map_err(|e| FetchError::Unavailable(format!("{e:?}")))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Unavailable(format!("{e:?}")))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| FetchError::Unavailable("Failed to read response".to_string()))?;
    if !response.ok() {
        return Err(FetchError::Unavailable(format!("HTTP {}", response.status())));
    }

    let body = response
        .json()
        .map_err(|e| FetchError::Invalid(format!("{e:?}")))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|e| FetchError::Invalid(format!("{e:?}")))?;

    let data = serde_wasm_bindgen::from_value::<RadarData>(json)
        .map_err(|e| FetchError::Invalid(e.to_string()))?;

    Radar::from_data(data, &Categories::default()).map_err(|e| FetchError::Invalid(e.to_string()))
}

async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
            }
            None => {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}
