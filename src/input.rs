//! Terminal input mapping
//!
//! crossterm events are translated into the few things the session cares
//! about. Key presses and clicks are forwarded to the session over a
//! channel; quitting and resizing are handled by the runtime itself.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use tokio::sync::mpsc;

/// Input as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character
    Char(char),
    Backspace,
    Enter,
    /// Any other key
    OtherKey,
    /// Left mouse click
    Click,
}

/// Sending half used by the runtime.
pub type InputSender = mpsc::UnboundedSender<InputEvent>;

/// Receiving half consumed by the session.
pub type InputEvents = mpsc::UnboundedReceiver<InputEvent>;

/// A fresh input channel.
pub fn channel() -> (InputSender, InputEvents) {
    mpsc::unbounded_channel()
}

/// What the runtime should do with a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Forward(InputEvent),
    Resize(u16, u16),
    Quit,
    Ignore,
}

/// Translate a crossterm event.
pub fn translate(event: &Event) -> InputAction {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputAction::Forward(InputEvent::Click),
            _ => InputAction::Ignore,
        },
        Event::Resize(cols, rows) => InputAction::Resize(*cols, *rows),
        _ => InputAction::Ignore, // focus, paste
    }
}

fn translate_key(key: &KeyEvent) -> InputAction {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => InputAction::Quit,
        KeyCode::Char(_) if ctrl => InputAction::Forward(InputEvent::OtherKey),
        KeyCode::Char(c) => InputAction::Forward(InputEvent::Char(c)),
        KeyCode::Backspace => InputAction::Forward(InputEvent::Backspace),
        KeyCode::Enter => InputAction::Forward(InputEvent::Enter),
        _ => InputAction::Forward(InputEvent::OtherKey),
    }
}
