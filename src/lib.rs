//! hackterm - a hacker terminal for the console
//!
//! A boot animation with a progress panel, a typewriter that reveals every
//! line of output, a small scripted shell driven by a JSON command document,
//! and an optional glyph rain behind it all.
//!
//! The session logic (`player`, `session`, `shell`) is independent of the
//! terminal; the `tui` module renders a [`screen::Screen`] and feeds input
//! events back.

pub mod cli;
pub mod config;
pub mod effects;
pub mod input;
pub mod logging;
pub mod player;
pub mod screen;
pub mod session;
pub mod shell;
pub mod theme;
pub mod tui;

pub use config::{Config, ConfigError};
