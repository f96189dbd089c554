//! TUI (Text User Interface) for hackterm
//!
//! The runtime owns the terminal through ratatui/crossterm; rendering is a
//! pure function of a [`ui::View`].

pub mod app;
pub mod ui;
pub mod widgets;

pub use app::{run, TerminalGuard, FRAME};
pub use ui::View;
