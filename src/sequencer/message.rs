// Message - Timestamped units of musical intent dispatched by the clock
// Payloads are validated at construction; send() only forwards to the sink

use crate::error::{MidiError, Result};
use crate::midi::{Channel, Control, MidiSink, Percussion, PITCH_BEND_MAX};
use crate::theory::Pitch;
use std::fmt;
use std::sync::Arc;

/// User function run by a callback message, given the message's beat-time
pub type CallbackFn = Arc<dyn Fn(f64) + Send + Sync>;

/// A message due at a beat-time
///
/// Cloning is cheap: the sink and callback are shared through `Arc`.
#[derive(Clone)]
pub enum Message {
    NoteOn {
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
        time: f64,
    },
    NoteOff {
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
        time: f64,
    },
    ControlChange {
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        control: Control,
        value: u8,
        time: f64,
    },
    PitchBend {
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        value: u16,
        time: f64,
    },
    Percussion {
        sink: Arc<dyn MidiSink>,
        percussion: Percussion,
        velocity: u8,
        time: f64,
    },
    Callback {
        callback: CallbackFn,
        time: f64,
    },
}

fn validate_data_byte(what: &'static str, value: u8) -> Result<u8> {
    if value > 127 {
        Err(MidiError::out_of_range(what, value))
    } else {
        Ok(value)
    }
}

fn validate_time(time: f64) -> Result<f64> {
    if time.is_finite() {
        Ok(time)
    } else {
        Err(MidiError::InvalidArgument(format!(
            "message time must be finite, got {}",
            time
        )))
    }
}

impl Message {
    pub fn note_on(
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
        time: f64,
    ) -> Result<Self> {
        channel.validate()?;
        pitch.validate_midi()?;
        Ok(Message::NoteOn {
            sink,
            channel,
            pitch,
            velocity: validate_data_byte("velocity", velocity)?,
            time: validate_time(time)?,
        })
    }

    pub fn note_off(
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
        time: f64,
    ) -> Result<Self> {
        channel.validate()?;
        pitch.validate_midi()?;
        Ok(Message::NoteOff {
            sink,
            channel,
            pitch,
            velocity: validate_data_byte("velocity", velocity)?,
            time: validate_time(time)?,
        })
    }

    /// A note-on at `time` and its note-off `duration` beats later
    pub fn note_on_off(
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        pitch: Pitch,
        velocity: u8,
        time: f64,
        duration: f64,
    ) -> Result<[Self; 2]> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(MidiError::InvalidArgument(format!(
                "note duration must be a non-negative number of beats, got {}",
                duration
            )));
        }
        let on = Message::note_on(sink.clone(), channel, pitch, velocity, time)?;
        let off = Message::note_off(sink, channel, pitch, velocity, time + duration)?;
        Ok([on, off])
    }

    pub fn control_change(
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        control: Control,
        value: u8,
        time: f64,
    ) -> Result<Self> {
        channel.validate()?;
        control.validate()?;
        Ok(Message::ControlChange {
            sink,
            channel,
            control,
            value: validate_data_byte("control value", value)?,
            time: validate_time(time)?,
        })
    }

    /// `value` is a 14-bit bend, 8192 being centered
    pub fn pitch_bend(
        sink: Arc<dyn MidiSink>,
        channel: Channel,
        value: u16,
        time: f64,
    ) -> Result<Self> {
        channel.validate()?;
        if value > PITCH_BEND_MAX {
            return Err(MidiError::out_of_range("pitch bend", value));
        }
        Ok(Message::PitchBend {
            sink,
            channel,
            value,
            time: validate_time(time)?,
        })
    }

    pub fn percussion(
        sink: Arc<dyn MidiSink>,
        percussion: Percussion,
        velocity: u8,
        time: f64,
    ) -> Result<Self> {
        percussion.validate()?;
        Ok(Message::Percussion {
            sink,
            percussion,
            velocity: validate_data_byte("velocity", velocity)?,
            time: validate_time(time)?,
        })
    }

    /// Runs `callback` when due; the callback may schedule further messages
    pub fn callback<F>(callback: F, time: f64) -> Result<Self>
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        Ok(Message::Callback {
            callback: Arc::new(callback),
            time: validate_time(time)?,
        })
    }

    /// Beat-time at which the message is due
    pub fn time(&self) -> f64 {
        match self {
            Message::NoteOn { time, .. }
            | Message::NoteOff { time, .. }
            | Message::ControlChange { time, .. }
            | Message::PitchBend { time, .. }
            | Message::Percussion { time, .. }
            | Message::Callback { time, .. } => *time,
        }
    }

    fn time_mut(&mut self) -> &mut f64 {
        match self {
            Message::NoteOn { time, .. }
            | Message::NoteOff { time, .. }
            | Message::ControlChange { time, .. }
            | Message::PitchBend { time, .. }
            | Message::Percussion { time, .. }
            | Message::Callback { time, .. } => time,
        }
    }

    /// A copy of this message due at `time`, which must be finite
    pub fn with_time(&self, time: f64) -> Result<Message> {
        let mut message = self.clone();
        *message.time_mut() = validate_time(time)?;
        Ok(message)
    }

    /// A copy of this message due `delta` beats later
    pub fn time_shifted(&self, delta: f64) -> Result<Message> {
        self.with_time(self.time() + delta)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::NoteOn { .. } => "NoteOn",
            Message::NoteOff { .. } => "NoteOff",
            Message::ControlChange { .. } => "ControlChange",
            Message::PitchBend { .. } => "PitchBend",
            Message::Percussion { .. } => "Percussion",
            Message::Callback { .. } => "Callback",
        }
    }

    /// Forwards the payload to the sink, or runs the callback
    pub fn send(&self) {
        match self {
            Message::NoteOn {
                sink,
                channel,
                pitch,
                velocity,
                ..
            } => sink.send_note_on(*channel, *pitch, *velocity),
            Message::NoteOff {
                sink,
                channel,
                pitch,
                velocity,
                ..
            } => sink.send_note_off(*channel, *pitch, *velocity),
            Message::ControlChange {
                sink,
                channel,
                control,
                value,
                ..
            } => sink.send_control_change(*channel, *control, *value),
            Message::PitchBend {
                sink,
                channel,
                value,
                ..
            } => sink.send_pitch_bend(*channel, *value),
            Message::Percussion {
                sink,
                percussion,
                velocity,
                ..
            } => sink.send_percussion(*percussion, *velocity),
            Message::Callback { callback, time } => callback(*time),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::NoteOn {
                channel,
                pitch,
                velocity,
                time,
                ..
            }
            | Message::NoteOff {
                channel,
                pitch,
                velocity,
                time,
                ..
            } => write!(
                f,
                "{}({}, {}, velocity {}) @ {}",
                self.kind(),
                channel,
                pitch,
                velocity,
                time
            ),
            Message::ControlChange {
                channel,
                control,
                value,
                time,
                ..
            } => write!(f, "ControlChange({}, {}, {}) @ {}", channel, control, value, time),
            Message::PitchBend {
                channel,
                value,
                time,
                ..
            } => write!(f, "PitchBend({}, {}) @ {}", channel, value, time),
            Message::Percussion {
                percussion,
                velocity,
                time,
                ..
            } => write!(f, "Percussion({}, velocity {}) @ {}", percussion, velocity, time),
            Message::Callback { time, .. } => write!(f, "Callback @ {}", time),
        }
    }
}
