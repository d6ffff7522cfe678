// MIDI Sink - Output capability the clock dispatches messages into
// Stands in for a device layer; implementations must return quickly

use super::channel::Channel;
use super::control::Control;
use super::percussion::Percussion;
use crate::theory::Pitch;

/// Centered pitch bend value (no bend)
pub const PITCH_BEND_CENTER: u16 = 8192;
/// Largest 14-bit pitch bend value
pub const PITCH_BEND_MAX: u16 = 16383;

/// Fire-and-forget MIDI output
///
/// Calls arrive from the clock's timing thread, so implementations must be
/// `Send + Sync` and must not block: a slow sink delays every message behind it.
/// Arguments have already been range-checked by the message constructors.
pub trait MidiSink: Send + Sync {
    fn send_note_on(&self, channel: Channel, pitch: Pitch, velocity: u8);

    fn send_note_off(&self, channel: Channel, pitch: Pitch, velocity: u8);

    fn send_control_change(&self, channel: Channel, control: Control, value: u8);

    /// `value` is 0..=16383, 8192 being centered
    fn send_pitch_bend(&self, channel: Channel, value: u16);

    /// Percussion plays on the General MIDI percussion channel
    fn send_percussion(&self, percussion: Percussion, velocity: u8);

    /// Sends "All notes off" on every channel
    fn silence_all_notes(&self) {
        for channel in Channel::all() {
            self.send_control_change(channel, Control::ALL_NOTES_OFF, 0);
        }
    }
}
