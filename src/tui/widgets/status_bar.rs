//! Status bar: session stay time and effect switches.

use std::time::Duration;

use ratatui::{style::Style, text::Span};

use crate::theme::Theme;

/// Format how long the session has been up.
///
/// `M:SS.cc` below an hour, `H:MM:SS.cc` from then on (centiseconds).
pub fn format_stay_time(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let centis = elapsed.subsec_millis() / 10;
    if hours > 0 {
        format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
    } else {
        format!("{}:{:02}.{:02}", mins, secs, centis)
    }
}

/// Build styled spans for `key: value` status items.
///
/// Keys use the theme accent, values the secondary text color, and items
/// are separated by " | ".
pub fn build_status_spans(items: &[(&str, &str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, (key, value)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                " | ".to_string(),
                Style::default().fg(theme.text_secondary),
            ));
        }
        spans.push(Span::styled(key.to_string(), theme.accent_style()));
        spans.push(Span::styled(
            format!(": {}", value),
            Style::default().fg(theme.text_secondary),
        ));
    }
    spans
}

/// On/off label for a switch.
pub fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
