// MIDI Recorder - Sink that captures every call with its wall-clock instant
// Pairs NoteOn/NoteOff into notes with durations

use super::channel::Channel;
use super::control::Control;
use super::percussion::Percussion;
use super::sink::MidiSink;
use crate::theory::Pitch;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One call made on the sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    NoteOn {
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
    },
    NoteOff {
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
    },
    ControlChange {
        channel: Channel,
        control: Control,
        value: u8,
    },
    PitchBend {
        channel: Channel,
        value: u16,
    },
    Percussion {
        percussion: Percussion,
        velocity: u8,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct RecordedEvent {
    pub event: SinkEvent,
    pub at: Instant,
}

/// A completed note reconstructed from a NoteOn/NoteOff pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedNote {
    pub channel: Channel,
    pub pitch: Pitch,
    pub velocity: u8,
    pub start: Instant,
    pub duration: Duration,
}

#[derive(Default)]
struct RecorderState {
    events: Vec<RecordedEvent>,
    active_notes: HashMap<(Channel, Pitch), (u8, Instant)>,
    notes: Vec<RecordedNote>,
}

/// Thread-safe recording sink, shared as `Arc<MidiRecorder>`
#[derive(Default)]
pub struct MidiRecorder {
    state: Mutex<RecorderState>,
}

impl MidiRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SinkEvent) {
        let at = Instant::now();
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        match event {
            // Velocity 0 is a note off
            SinkEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } if velocity > 0 => {
                state.active_notes.insert((channel, pitch), (velocity, at));
            }
            SinkEvent::NoteOn { channel, pitch, .. } | SinkEvent::NoteOff { channel, pitch, .. } => {
                if let Some((velocity, start)) = state.active_notes.remove(&(channel, pitch)) {
                    state.notes.push(RecordedNote {
                        channel,
                        pitch,
                        velocity,
                        start,
                        duration: at.duration_since(start),
                    });
                }
            }
            _ => {}
        }

        state.events.push(RecordedEvent { event, at });
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RecorderState) -> T) -> T {
        match self.state.lock() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Every call received so far, oldest first
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.with_state(|s| s.events.clone())
    }

    /// Only the calls themselves, without timestamps
    pub fn sink_events(&self) -> Vec<SinkEvent> {
        self.with_state(|s| s.events.iter().map(|e| e.event).collect())
    }

    pub fn len(&self) -> usize {
        self.with_state(|s| s.events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notes whose NoteOff has been received
    pub fn recorded_notes(&self) -> Vec<RecordedNote> {
        self.with_state(|s| s.notes.clone())
    }

    /// Notes currently held (NoteOn without a matching NoteOff)
    pub fn held_notes(&self) -> Vec<(Channel, Pitch)> {
        self.with_state(|s| {
            let mut held: Vec<_> = s.active_notes.keys().copied().collect();
            held.sort();
            held
        })
    }

    /// Closes every held note at the current instant and returns all notes
    pub fn finalize_recording(&self) -> Vec<RecordedNote> {
        let now = Instant::now();
        self.with_state(|s| {
            let active = std::mem::take(&mut s.active_notes);
            let mut notes = std::mem::take(&mut s.notes);
            let mut closed: Vec<RecordedNote> = active
                .into_iter()
                .map(|((channel, pitch), (velocity, start))| RecordedNote {
                    channel,
                    pitch,
                    velocity,
                    start,
                    duration: now.duration_since(start),
                })
                .collect();
            closed.sort_by_key(|n| n.start);
            notes.extend(closed);
            notes
        })
    }

    pub fn clear(&self) {
        self.with_state(|s| {
            s.events.clear();
            s.active_notes.clear();
            s.notes.clear();
        });
    }
}

impl MidiSink for MidiRecorder {
    fn send_note_on(&self, channel: Channel, pitch: Pitch, velocity: u8) {
        self.record(SinkEvent::NoteOn {
            channel,
            pitch,
            velocity,
        });
    }

    fn send_note_off(&self, channel: Channel, pitch: Pitch, velocity: u8) {
        self.record(SinkEvent::NoteOff {
            channel,
            pitch,
            velocity,
        });
    }

    fn send_control_change(&self, channel: Channel, control: Control, value: u8) {
        self.record(SinkEvent::ControlChange {
            channel,
            control,
            value,
        });
    }

    fn send_pitch_bend(&self, channel: Channel, value: u16) {
        self.record(SinkEvent::PitchBend { channel, value });
    }

    fn send_percussion(&self, percussion: Percussion, velocity: u8) {
        self.record(SinkEvent::Percussion {
            percussion,
            velocity,
        });
    }
}
