//! Sequential output scheduler
//!
//! Everything that appears in the transcript goes through this module:
//!
//! - `message`: Message, MessageStyle and MessageQueue
//! - `pace`: cancellable waits (Pacer) and the shared Shutdown switch
//! - `typewriter`: incremental reveal of a single string
//! - `sequence`: MessagePlayer, which plays whole queues one message at a time
//!
//! # Usage
//!
//! ```no_run
//! use hackterm::player::{Message, MessagePlayer, MessageQueue, Pacer};
//! use hackterm::effects::Sound;
//! use hackterm::screen::Screen;
//! use hackterm::session::SessionFlags;
//!
//! # async fn demo() -> Result<(), hackterm::player::Cancelled> {
//! let screen = Screen::new("root@hacker-system:~# ", 200).shared();
//! let player = MessagePlayer::new(screen, Sound::none(), SessionFlags::new(), Pacer::default());
//!
//! let queue: MessageQueue = vec![Message::info("[*] A..."), Message::info("[*] B")]
//!     .into_iter()
//!     .collect();
//! player.play_all(queue).await?;
//! # Ok(())
//! # }
//! ```

mod message;
mod pace;
mod sequence;
mod typewriter;

pub use message::{Message, MessageQueue, MessageStyle};
pub use pace::{Cancelled, Pacer, Shutdown};
pub use sequence::{MessagePlayer, MESSAGE_PAUSE};
pub use typewriter::{
    RevealMode, RevealState, RevealTarget, Typewriter, ELLIPSIS_LEAD, LINE_TICK, TICK,
};
