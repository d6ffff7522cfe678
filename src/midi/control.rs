// MIDI Control - Control change numbers with General MIDI names

use crate::error::{MidiError, Result};
use std::fmt;

/// A control change number; valid values are 0..=127
///
/// The field is wider than a byte so out-of-range numbers can be represented
/// and rejected by [`Control::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Control(pub i32);

impl Control {
    pub const MODULATION_WHEEL: Control = Control(1);
    pub const DATA_ENTRY_MSB: Control = Control(6);
    pub const VOLUME: Control = Control(7);
    pub const PAN: Control = Control(10);
    pub const EXPRESSION: Control = Control(11);
    pub const DATA_ENTRY_LSB: Control = Control(38);
    pub const SUSTAIN_PEDAL: Control = Control(64);
    pub const REVERB_LEVEL: Control = Control(91);
    pub const TREMOLO_LEVEL: Control = Control(92);
    pub const CHORUS_LEVEL: Control = Control(93);
    pub const CELESTE_LEVEL: Control = Control(94);
    pub const PHASER_LEVEL: Control = Control(95);
    pub const NON_REGISTERED_PARAMETER_LSB: Control = Control(98);
    pub const NON_REGISTERED_PARAMETER_MSB: Control = Control(99);
    pub const REGISTERED_PARAMETER_LSB: Control = Control(100);
    pub const REGISTERED_PARAMETER_MSB: Control = Control(101);
    pub const ALL_CONTROLLERS_OFF: Control = Control(121);
    pub const ALL_NOTES_OFF: Control = Control(123);

    pub fn is_valid(self) -> bool {
        (0..=127).contains(&self.0)
    }

    /// Returns the controller byte, or `OutOfRange`
    pub fn validate(self) -> Result<u8> {
        if self.is_valid() {
            Ok(self.0 as u8)
        } else {
            Err(MidiError::out_of_range("control", self.0))
        }
    }

    /// Human-readable name; controllers without a General MIDI role are "Undefined"
    pub fn name(self) -> Result<&'static str> {
        self.validate()?;
        Ok(match self {
            Control::MODULATION_WHEEL => "Modulation wheel",
            Control::DATA_ENTRY_MSB => "Data entry MSB",
            Control::VOLUME => "Volume",
            Control::PAN => "Pan",
            Control::EXPRESSION => "Expression",
            Control::DATA_ENTRY_LSB => "Data entry LSB",
            Control::SUSTAIN_PEDAL => "Sustain pedal",
            Control::REVERB_LEVEL => "Reverb level",
            Control::TREMOLO_LEVEL => "Tremolo level",
            Control::CHORUS_LEVEL => "Chorus level",
            Control::CELESTE_LEVEL => "Celeste level",
            Control::PHASER_LEVEL => "Phaser level",
            Control::NON_REGISTERED_PARAMETER_LSB => "Non-registered parameter LSB",
            Control::NON_REGISTERED_PARAMETER_MSB => "Non-registered parameter MSB",
            Control::REGISTERED_PARAMETER_LSB => "Registered parameter LSB",
            Control::REGISTERED_PARAMETER_MSB => "Registered parameter MSB",
            Control::ALL_CONTROLLERS_OFF => "All controllers off",
            Control::ALL_NOTES_OFF => "All notes off",
            _ => "Undefined",
        })
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Ok(name) => write!(f, "{} ({})", name, self.0),
            Err(_) => write!(f, "Invalid control ({})", self.0),
        }
    }
}
