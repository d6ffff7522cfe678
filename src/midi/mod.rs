// MIDI module - Channels, controls, percussion, and the sink/input capabilities

pub mod channel;
pub mod control;
pub mod input;
pub mod percussion;
pub mod recorder;
pub mod sink;

pub use channel::Channel;
pub use control::Control;
pub use input::{InputFeed, NoteEvent};
pub use percussion::Percussion;
pub use recorder::{MidiRecorder, RecordedEvent, RecordedNote, SinkEvent};
pub use sink::{MidiSink, PITCH_BEND_CENTER, PITCH_BEND_MAX};
