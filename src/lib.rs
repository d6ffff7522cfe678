// MyMusic MIDI - Music theory and beat-time scheduling core

pub mod error;
pub mod midi;
pub mod sequencer;
pub mod theory;

// Re-export commonly used types for convenience
pub use error::{MidiError, Result};
pub use midi::{
    Channel, Control, InputFeed, MidiRecorder, MidiSink, NoteEvent, Percussion, SinkEvent,
};
pub use sequencer::{Clock, ClockConfig, ClockStatus, Message, Tempo};
pub use theory::{Chord, ChordPattern, Note, Pitch, Scale, ScalePattern};
