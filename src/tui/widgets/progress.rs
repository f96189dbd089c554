//! Boot progress bar.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

/// Build the progress bar characters.
///
/// Returns `(bar, filled)`: filled cells are `━`, the head is `⏺` and the
/// rest is `─`. A full bar has no head.
pub fn build_progress_bar_chars(bar_width: usize, percent: u16) -> (Vec<char>, usize) {
    let percent = usize::from(percent.min(100));
    let filled = bar_width * percent / 100;

    let mut bar: Vec<char> = vec!['─'; bar_width];
    for c in bar.iter_mut().take(filled) {
        *c = '━';
    }
    if filled < bar_width {
        bar[filled] = '⏺';
    }

    (bar, filled)
}

/// The progress bar with a trailing percentage, `width` cells wide.
pub fn progress_bar_line(width: u16, percent: u16, theme: &Theme) -> Line<'static> {
    let label = format!(" {:>3}%", percent.min(100));
    let bar_width = (width as usize).saturating_sub(label.len());
    let (bar, filled) = build_progress_bar_chars(bar_width, percent);

    let done: String = bar[..filled].iter().collect();
    let rest: String = bar[filled..].iter().collect();
    let mut spans = vec![Span::styled(done, theme.accent_style())];
    let mut rest = rest.chars();
    if let Some(head) = rest.next().filter(|&c| c == '⏺') {
        spans.push(Span::styled(head.to_string(), theme.text_style()));
    }
    spans.push(Span::styled(
        rest.collect::<String>(),
        theme.text_secondary_style(),
    ));
    spans.push(Span::styled(label, Style::default().fg(theme.text_primary)));
    Line::from(spans)
}
