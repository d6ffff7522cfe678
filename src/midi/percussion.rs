// MIDI Percussion - General MIDI drum map (notes 35..=81 on channel 10)

use crate::error::{MidiError, Result};
use std::fmt;

/// A General MIDI percussion instrument, identified by its key number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percussion(pub i32);

const FIRST: i32 = 35;

/// Names indexed from key 35
const NAMES: [&str; 47] = [
    "Bass Drum 2",
    "Bass Drum 1",
    "Side Stick",
    "Snare Drum 1",
    "Hand Clap",
    "Snare Drum 2",
    "Low Tom 2",
    "Closed Hi-hat",
    "Low Tom 1",
    "Pedal Hi-hat",
    "Mid Tom 2",
    "Open Hi-hat",
    "Mid Tom 1",
    "High Tom 2",
    "Crash Cymbal 1",
    "High Tom 1",
    "Ride Cymbal 1",
    "Chinese Cymbal",
    "Ride Bell",
    "Tambourine",
    "Splash Cymbal",
    "Cowbell",
    "Crash Cymbal 2",
    "Vibra Slap",
    "Ride Cymbal 2",
    "High Bongo",
    "Low Bongo",
    "Mute High Conga",
    "Open High Conga",
    "Low Conga",
    "High Timbale",
    "Low Timbale",
    "High Agogo",
    "Low Agogo",
    "Cabasa",
    "Maracas",
    "Short Whistle",
    "Long Whistle",
    "Short Guiro",
    "Long Guiro",
    "Claves",
    "High Wood Block",
    "Low Wood Block",
    "Mute Cuica",
    "Open Cuica",
    "Mute Triangle",
    "Open Triangle",
];

impl Percussion {
    pub const BASS_DRUM_2: Percussion = Percussion(35);
    pub const BASS_DRUM_1: Percussion = Percussion(36);
    pub const SIDE_STICK: Percussion = Percussion(37);
    pub const SNARE_DRUM_1: Percussion = Percussion(38);
    pub const HAND_CLAP: Percussion = Percussion(39);
    pub const SNARE_DRUM_2: Percussion = Percussion(40);
    pub const LOW_TOM_2: Percussion = Percussion(41);
    pub const CLOSED_HI_HAT: Percussion = Percussion(42);
    pub const LOW_TOM_1: Percussion = Percussion(43);
    pub const PEDAL_HI_HAT: Percussion = Percussion(44);
    pub const MID_TOM_2: Percussion = Percussion(45);
    pub const OPEN_HI_HAT: Percussion = Percussion(46);
    pub const MID_TOM_1: Percussion = Percussion(47);
    pub const HIGH_TOM_2: Percussion = Percussion(48);
    pub const CRASH_CYMBAL_1: Percussion = Percussion(49);
    pub const HIGH_TOM_1: Percussion = Percussion(50);
    pub const RIDE_CYMBAL_1: Percussion = Percussion(51);
    pub const CHINESE_CYMBAL: Percussion = Percussion(52);
    pub const RIDE_BELL: Percussion = Percussion(53);
    pub const TAMBOURINE: Percussion = Percussion(54);
    pub const SPLASH_CYMBAL: Percussion = Percussion(55);
    pub const COWBELL: Percussion = Percussion(56);
    pub const CRASH_CYMBAL_2: Percussion = Percussion(57);
    pub const VIBRA_SLAP: Percussion = Percussion(58);
    pub const RIDE_CYMBAL_2: Percussion = Percussion(59);
    pub const HIGH_BONGO: Percussion = Percussion(60);
    pub const LOW_BONGO: Percussion = Percussion(61);
    pub const MUTE_HIGH_CONGA: Percussion = Percussion(62);
    pub const OPEN_HIGH_CONGA: Percussion = Percussion(63);
    pub const LOW_CONGA: Percussion = Percussion(64);
    pub const HIGH_TIMBALE: Percussion = Percussion(65);
    pub const LOW_TIMBALE: Percussion = Percussion(66);
    pub const HIGH_AGOGO: Percussion = Percussion(67);
    pub const LOW_AGOGO: Percussion = Percussion(68);
    pub const CABASA: Percussion = Percussion(69);
    pub const MARACAS: Percussion = Percussion(70);
    pub const SHORT_WHISTLE: Percussion = Percussion(71);
    pub const LONG_WHISTLE: Percussion = Percussion(72);
    pub const SHORT_GUIRO: Percussion = Percussion(73);
    pub const LONG_GUIRO: Percussion = Percussion(74);
    pub const CLAVES: Percussion = Percussion(75);
    pub const HIGH_WOOD_BLOCK: Percussion = Percussion(76);
    pub const LOW_WOOD_BLOCK: Percussion = Percussion(77);
    pub const MUTE_CUICA: Percussion = Percussion(78);
    pub const OPEN_CUICA: Percussion = Percussion(79);
    pub const MUTE_TRIANGLE: Percussion = Percussion(80);
    pub const OPEN_TRIANGLE: Percussion = Percussion(81);

    pub fn is_valid(self) -> bool {
        (FIRST..FIRST + NAMES.len() as i32).contains(&self.0)
    }

    /// Returns the key number, or `OutOfRange`
    pub fn validate(self) -> Result<u8> {
        if self.is_valid() {
            Ok(self.0 as u8)
        } else {
            Err(MidiError::out_of_range("percussion", self.0))
        }
    }

    pub fn name(self) -> Result<&'static str> {
        self.validate()?;
        Ok(NAMES[(self.0 - FIRST) as usize])
    }

    /// Every instrument in the drum map, lowest key first
    pub fn all() -> impl Iterator<Item = Percussion> {
        (FIRST..FIRST + NAMES.len() as i32).map(Percussion)
    }
}

impl fmt::Display for Percussion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Ok(name) => f.write_str(name),
            Err(_) => write!(f, "Invalid percussion ({})", self.0),
        }
    }
}
