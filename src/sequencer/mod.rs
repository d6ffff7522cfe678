// Sequencer module - Beat-time scheduling of MIDI messages
// Tempo, messages, the clock and its configuration

pub mod clock;
pub mod config;
pub mod message;
pub mod tempo;

pub use clock::{Clock, ClockStatus};
pub use config::ClockConfig;
pub use message::{CallbackFn, Message};
pub use tempo::Tempo;
