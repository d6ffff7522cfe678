// MIDI Channel - Zero-based channel index, displayed one-based

use crate::error::{MidiError, Result};
use std::fmt;

/// A MIDI channel, stored zero-based (0..=15)
///
/// Users usually count channels from 1, so `Channel::CHANNEL_1` is `Channel(0)`
/// and `Display` prints the one-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Channel(pub i32);

impl Channel {
    pub const CHANNEL_1: Channel = Channel(0);
    pub const CHANNEL_2: Channel = Channel(1);
    pub const CHANNEL_3: Channel = Channel(2);
    pub const CHANNEL_4: Channel = Channel(3);
    pub const CHANNEL_5: Channel = Channel(4);
    pub const CHANNEL_6: Channel = Channel(5);
    pub const CHANNEL_7: Channel = Channel(6);
    pub const CHANNEL_8: Channel = Channel(7);
    pub const CHANNEL_9: Channel = Channel(8);
    pub const CHANNEL_10: Channel = Channel(9);
    pub const CHANNEL_11: Channel = Channel(10);
    pub const CHANNEL_12: Channel = Channel(11);
    pub const CHANNEL_13: Channel = Channel(12);
    pub const CHANNEL_14: Channel = Channel(13);
    pub const CHANNEL_15: Channel = Channel(14);
    pub const CHANNEL_16: Channel = Channel(15);

    /// General MIDI reserves channel 10 for percussion
    pub const PERCUSSION: Channel = Channel::CHANNEL_10;

    pub const COUNT: i32 = 16;

    pub fn is_valid(self) -> bool {
        (0..Self::COUNT).contains(&self.0)
    }

    /// Returns the zero-based index, or `OutOfRange`
    pub fn validate(self) -> Result<u8> {
        if self.is_valid() {
            Ok(self.0 as u8)
        } else {
            Err(MidiError::out_of_range("channel", self.0))
        }
    }

    /// All sixteen channels in order
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..Self::COUNT).map(Channel)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel {}", self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_validation() {
        assert!(Channel::CHANNEL_1.is_valid());
        assert!(Channel::CHANNEL_16.is_valid());
        assert!(!Channel(16).is_valid());
        assert!(!Channel(-1).is_valid());
        assert_eq!(Channel::PERCUSSION.validate().unwrap(), 9);
        assert!(matches!(
            Channel(16).validate(),
            Err(MidiError::OutOfRange { what: "channel", value: 16 })
        ));
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(Channel::CHANNEL_1.to_string(), "Channel 1");
        assert_eq!(Channel::PERCUSSION.to_string(), "Channel 10");
        assert_eq!(Channel::all().count(), 16);
    }
}
