// Theory module - Pitches, note spellings, chords and scales

pub mod chord;
pub mod note;
pub mod pitch;
pub mod scale;

pub use chord::{Chord, ChordPattern};
pub use note::Note;
pub use pitch::Pitch;
pub use scale::{Scale, ScalePattern};
