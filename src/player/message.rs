//! Messages and message queues.
//!
//! A message is one unit of output: some text, the semantic style it is
//! rendered with, and whether it rings the keystroke sound when its reveal
//! starts. Queues are built fresh for every playback and consumed by it.

use std::collections::VecDeque;

/// Semantic style of an output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    /// Echo of a submitted command line
    Prompt,
}

impl MessageStyle {
    /// Lower-case name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Prompt => "prompt",
        }
    }
}

/// A single message waiting to be revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
    /// Ring the keystroke sound when the reveal starts
    pub play_sound: bool,
}

impl Message {
    /// Create a silent message with the given style.
    pub fn new(text: impl Into<String>, style: MessageStyle) -> Self {
        Self {
            text: text.into(),
            style,
            play_sound: false,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageStyle::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, MessageStyle::Success)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, MessageStyle::Warning)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageStyle::Error)
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(text, MessageStyle::Prompt)
    }

    /// Builder: ring the keystroke sound when this message starts.
    pub fn with_sound(mut self) -> Self {
        self.play_sound = true;
        self
    }
}

/// Ordered messages; insertion order is playback order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQueue {
    messages: VecDeque<Message>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue holding exactly one message.
    pub fn single(message: Message) -> Self {
        let mut queue = Self::new();
        queue.push(message);
        queue
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl FromIterator<Message> for MessageQueue {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageQueue {
    type Item = Message;
    type IntoIter = std::collections::vec_deque::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_style_and_no_sound() {
        assert_eq!(Message::info("a").style, MessageStyle::Info);
        assert_eq!(Message::success("a").style, MessageStyle::Success);
        assert_eq!(Message::warning("a").style, MessageStyle::Warning);
        assert_eq!(Message::error("a").style, MessageStyle::Error);
        assert_eq!(Message::prompt("a").style, MessageStyle::Prompt);
        assert!(!Message::info("a").play_sound);
    }

    #[test]
    fn with_sound_sets_flag() {
        assert!(Message::info("beep").with_sound().play_sound);
    }

    #[test]
    fn queue_preserves_insertion_order() {
        let queue: MessageQueue = ["one", "two", "three"]
            .into_iter()
            .map(Message::info)
            .collect();

        let texts: Vec<String> = queue.into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn single_queue_has_one_message() {
        let queue = MessageQueue::single(Message::error("nope"));
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_empty());
        assert!(MessageQueue::new().is_empty());
    }

    #[test]
    fn style_names_are_lowercase() {
        assert_eq!(MessageStyle::Prompt.name(), "prompt");
        assert_eq!(MessageStyle::default(), MessageStyle::Info);
    }
}
