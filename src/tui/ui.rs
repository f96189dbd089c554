//! Frame rendering
//!
//! Everything drawn comes from a [`View`]: a snapshot of the screen plus the
//! runtime-owned bits (clock, stay time, switches). Rendering never mutates
//! session state.

use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::widgets::{build_status_spans, format_stay_time, on_off, progress_bar_line};
use crate::effects::RainField;
use crate::screen::Screen;
use crate::theme::Theme;

/// What one frame shows.
#[derive(Debug)]
pub struct View<'a> {
    pub screen: &'a Screen,
    /// Present while the rain is running
    pub rain: Option<&'a RainField>,
    pub theme: &'a Theme,
    pub clock: DateTime<Local>,
    pub stay: Duration,
    pub sound_on: bool,
    /// Blink phase of the "press any key" status
    pub blink_on: bool,
}

/// Draw a full frame.
pub fn render(frame: &mut Frame, view: &View) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, view);
    if let Some(rain) = view.rain {
        frame.render_widget(rain, body);
    }
    render_transcript(frame, body, view);
    if view.screen.boot.visible {
        render_boot_panel(frame, body, view);
    }
    render_status(frame, status, view);
}

fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    let theme = view.theme;
    let banner = &view.screen.banner;
    let left = Paragraph::new(vec![
        Line::styled(banner.title.clone(), theme.accent_bold_style()),
        Line::styled(banner.subtitle.clone(), theme.text_secondary_style()),
    ]);
    let right = Paragraph::new(vec![
        Line::from(view.clock.format("%H:%M:%S").to_string()),
        Line::from(view.clock.format("%Y-%m-%d").to_string()),
    ])
    .style(theme.text_secondary_style())
    .alignment(Alignment::Right);
    frame.render_widget(left, area);
    frame.render_widget(right, area);
}

/// Output entries and the input line, anchored to the bottom.
fn render_transcript(frame: &mut Frame, area: Rect, view: &View) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let theme = view.theme;
    let screen = view.screen;
    let width = area.width as usize;

    let mut rows: Vec<Line<'static>> = Vec::new();
    for entry in screen.entries() {
        let style = theme.message_style(entry.style);
        for text_line in entry.text.split('\n') {
            for chunk in wrap_width(text_line, width) {
                rows.push(Line::styled(chunk, style));
            }
        }
    }

    let mut cursor = None;
    if screen.input.visible && !screen.terminated {
        let text = format!("{}{}", screen.prompt, screen.input.buffer);
        let chunks = wrap_width(&text, width);
        let last_width = chunks.last().map_or(0, |c| display_width(c));
        for (i, chunk) in chunks.into_iter().enumerate() {
            let line = match chunk.strip_prefix(screen.prompt.as_str()) {
                Some(typed) if i == 0 && !screen.prompt.is_empty() => Line::from(vec![
                    Span::styled(screen.prompt.clone(), theme.accent_style()),
                    Span::styled(typed.to_string(), theme.text_style()),
                ]),
                _ => Line::styled(chunk, theme.text_style()),
            };
            rows.push(line);
        }
        cursor = Some((last_width.min(width - 1) as u16, rows.len() - 1));
    }

    let skip = rows.len().saturating_sub(area.height as usize);
    let shown = (rows.len() - skip) as u16;
    let top = area.bottom() - shown;
    let target = Rect::new(area.x, top, area.width, shown);
    frame.render_widget(Paragraph::new(rows.split_off(skip)), target);

    if let Some((col, row)) = cursor {
        if !screen.boot.visible {
            frame.set_cursor_position((area.x + col, top + (row - skip) as u16));
        }
    }
}

fn render_boot_panel(frame: &mut Frame, body: Rect, view: &View) {
    let theme = view.theme;
    let boot = &view.screen.boot;
    let area = centered_rect(60, 50, body);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::styled(view.screen.banner.logo.clone(), theme.accent_bold_style()),
        Line::styled(view.screen.banner.subtitle.clone(), theme.text_secondary_style()),
        Line::default(),
    ];
    if !boot.waiting {
        lines.push(progress_bar_line(inner.width, boot.progress, theme));
    }
    let status_style = if boot.fading {
        theme.text_secondary_style().add_modifier(Modifier::DIM)
    } else if boot.waiting && !view.blink_on {
        theme.text_secondary_style()
    } else {
        theme.text_style()
    };
    lines.push(Line::styled(boot.status.clone(), status_style));

    let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
    let content = Rect::new(
        inner.x,
        inner.y + top_pad,
        inner.width,
        inner.height - top_pad,
    );
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
}

fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let stay = format_stay_time(view.stay);
    let rain_on = view.rain.is_some();
    let spans = build_status_spans(
        &[
            ("stay", stay.as_str()),
            ("sound", on_off(view.sound_on)),
            ("rain", on_off(rain_on)),
            ("ctrl-c", "quit"),
        ],
        view.theme,
    );
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Split `text` into rows no wider than `width` display cells.
///
/// Always yields at least one (possibly empty) row.
pub fn wrap_width(text: &str, width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    let mut used = 0;
    for c in text.chars() {
        let (c, w) = match c {
            '\t' => (' ', 1),
            c => (c, c.width().unwrap_or(0)),
        };
        if used + w > width && used > 0 {
            rows.push(String::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        used += w;
    }
    rows
}

fn display_width(text: &str) -> usize {
    text.chars().filter_map(|c| c.width()).sum()
}

/// Create a centered layout with the given constraints.
///
/// Returns the center area that can be used for content.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical_layout[1])[1]
}
