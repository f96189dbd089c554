//! Widgets for the terminal UI.

mod progress;
mod status_bar;

pub use progress::{build_progress_bar_chars, progress_bar_line};
pub use status_bar::{build_status_spans, format_stay_time, on_off};
