// Pitch - Semitone identity of a sounding note
// Plain integer semitones where 60 = C4 (middle C), not tied to any spelling

use super::note::Note;
use crate::error::{MidiError, Result};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A pitch in semitones, with 0 = C-1 and 60 = C4
///
/// The type is unbounded on purpose: chord and scale arithmetic routinely
/// walks below 0 or above 127. Use [`Pitch::is_in_midi_range`] or
/// [`Pitch::validate_midi`] before handing a pitch to a device.
///
/// The operators overflow like the `i32` they wrap, so they are meant for
/// the few thousand semitones around MIDI range. Near `i32::MIN`/`MAX` use
/// [`Pitch::checked_add`] and [`Pitch::checked_sub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pitch(pub i32);

/// Spellings used when a pitch class has to be named without a letter hint
const SHARP_SPELLINGS: [(char, i32); 12] = [
    ('C', 0),
    ('C', 1),
    ('D', 0),
    ('D', 1),
    ('E', 0),
    ('F', 0),
    ('F', 1),
    ('G', 0),
    ('G', 1),
    ('A', 0),
    ('A', 1),
    ('B', 0),
];

const FLAT_SPELLINGS: [(char, i32); 12] = [
    ('C', 0),
    ('D', -1),
    ('D', 0),
    ('E', -1),
    ('E', 0),
    ('F', 0),
    ('G', -1),
    ('G', 0),
    ('A', -1),
    ('A', 0),
    ('B', -1),
    ('B', 0),
];

impl Pitch {
    /// Lowest pitch a MIDI device accepts
    pub const MIDI_MIN: Pitch = Pitch(0);
    /// Highest pitch a MIDI device accepts
    pub const MIDI_MAX: Pitch = Pitch(127);
    /// C4
    pub const MIDDLE_C: Pitch = Pitch(60);
    /// A4, 440 Hz in standard tuning
    pub const A440: Pitch = Pitch(69);

    pub const fn new(semitones: i32) -> Self {
        Pitch(semitones)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// The pitch of `note` spelled in `octave` (e.g. `C` in octave 4 is 60)
    pub fn named(note: Note, octave: i32) -> Result<Pitch> {
        note.pitch_in_octave(octave)
    }

    pub fn is_in_midi_range(self) -> bool {
        (Self::MIDI_MIN.0..=Self::MIDI_MAX.0).contains(&self.0)
    }

    /// Returns the MIDI note number, or `OutOfRange` outside 0..=127
    pub fn validate_midi(self) -> Result<u8> {
        if self.is_in_midi_range() {
            Ok(self.0 as u8)
        } else {
            Err(MidiError::out_of_range("pitch", self.0))
        }
    }

    /// `self + semitones`, or `None` on overflow
    pub fn checked_add(self, semitones: i32) -> Option<Pitch> {
        self.0.checked_add(semitones).map(Pitch)
    }

    /// `self - semitones`, or `None` on overflow
    pub fn checked_sub(self, semitones: i32) -> Option<Pitch> {
        self.0.checked_sub(semitones).map(Pitch)
    }

    /// Octave number, where C4 is the first pitch of octave 4
    pub fn octave(self) -> i32 {
        self.0.div_euclid(12) - 1
    }

    /// Position within the octave, always in 0..12 (C = 0, B = 11)
    pub fn position_in_octave(self) -> i32 {
        self.0.rem_euclid(12)
    }

    /// Most common spelling of this pitch using sharps (C#, not Db)
    pub fn note_preferring_sharps(self) -> Note {
        let (letter, accidental) = SHARP_SPELLINGS[self.position_in_octave() as usize];
        Note::from_parts(letter, accidental)
    }

    /// Most common spelling of this pitch using flats (Db, not C#)
    pub fn note_preferring_flats(self) -> Note {
        let (letter, accidental) = FLAT_SPELLINGS[self.position_in_octave() as usize];
        Note::from_parts(letter, accidental)
    }

    /// The note with the given letter that is enharmonic with this pitch
    ///
    /// The accidental is chosen in -5..=6, so B3 with letter `E` is `Ebbbbb`.
    pub fn note_with_letter(self, letter: char) -> Result<Note> {
        let base = Note::letter_base_position(letter)?;
        let accidental = (self.position_in_octave() - base + 5).rem_euclid(12) - 5;
        Ok(Note::from_parts(letter, accidental))
    }
}

impl Add<i32> for Pitch {
    type Output = Pitch;

    fn add(self, semitones: i32) -> Pitch {
        Pitch(self.0 + semitones)
    }
}

impl Sub<i32> for Pitch {
    type Output = Pitch;

    fn sub(self, semitones: i32) -> Pitch {
        Pitch(self.0 - semitones)
    }
}

/// Signed distance in semitones
impl Sub<Pitch> for Pitch {
    type Output = i32;

    fn sub(self, other: Pitch) -> i32 {
        self.0 - other.0
    }
}

impl AddAssign<i32> for Pitch {
    fn add_assign(&mut self, semitones: i32) {
        self.0 += semitones;
    }
}

impl SubAssign<i32> for Pitch {
    fn sub_assign(&mut self, semitones: i32) {
        self.0 -= semitones;
    }
}

impl From<u8> for Pitch {
    fn from(midi: u8) -> Self {
        Pitch(midi as i32)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note_preferring_sharps(), self.octave())
    }
}

/// Parses names like `C4`, `F#2`, `Bb-1` or `B#3` (which is C4)
impl FromStr for Pitch {
    type Err = MidiError;

    fn from_str(s: &str) -> Result<Self> {
        let (note, rest) = Note::parse_prefix(s)?;
        if rest.is_empty() {
            return Err(MidiError::parse(s, s, "missing octave number"));
        }
        let octave: i32 = rest
            .parse()
            .map_err(|_| MidiError::parse(s, rest, "invalid octave number"))?;
        note.pitch_in_octave(octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    #[test]
    fn test_midi_range() {
        assert!(!Pitch(-1).is_in_midi_range());
        assert!(Pitch(0).is_in_midi_range());
        assert!(Pitch(127).is_in_midi_range());
        assert!(!Pitch(128).is_in_midi_range());

        assert_eq!(Pitch::MIDDLE_C.validate_midi().unwrap(), 60);
        assert!(matches!(
            Pitch(128).validate_midi(),
            Err(MidiError::OutOfRange { what: "pitch", value: 128 })
        ));
    }

    #[test]
    fn test_octave() {
        assert_eq!(Pitch::MIDDLE_C.octave(), 4);
        assert_eq!(Pitch(59).octave(), 3);
        assert_eq!(Pitch(0).octave(), -1);
        assert_eq!(Pitch(-1).octave(), -2);
    }

    #[test]
    fn test_position_in_octave() {
        assert_eq!(Pitch::MIDDLE_C.position_in_octave(), 0);
        assert_eq!(Pitch(59).position_in_octave(), 11);
        assert_eq!(Pitch(0).position_in_octave(), 0);
        assert_eq!(Pitch(-1).position_in_octave(), 11);
        assert_eq!(Pitch(-13).position_in_octave(), 11);
    }

    #[test]
    fn test_pitch_to_note() {
        assert_eq!(Pitch(60).note_preferring_sharps(), note("C"));
        assert_eq!(Pitch(60).note_preferring_flats(), note("C"));
        assert_eq!(Pitch(61).note_preferring_sharps(), note("C#"));
        assert_eq!(Pitch(61).note_preferring_flats(), note("Db"));
        assert_eq!(Pitch(59).note_preferring_sharps(), note("B"));
        assert_eq!(Pitch(59).note_preferring_flats(), note("B"));
        assert_eq!(Pitch(0).note_preferring_sharps(), note("C"));
        assert_eq!(Pitch(-1).note_preferring_sharps(), note("B"));
    }

    #[test]
    fn test_note_with_letter() {
        let c4 = Pitch(60);
        let c_sharp4 = Pitch(61);
        let b3 = Pitch(59);
        assert_eq!(c4.note_with_letter('C').unwrap(), note("C"));
        assert_eq!(c4.note_with_letter('B').unwrap(), note("B#"));
        assert_eq!(c4.note_with_letter('D').unwrap(), note("Dbb"));
        assert_eq!(c_sharp4.note_with_letter('C').unwrap(), note("C#"));
        assert_eq!(c_sharp4.note_with_letter('B').unwrap(), note("B##"));
        assert_eq!(c_sharp4.note_with_letter('D').unwrap(), note("Db"));
        assert_eq!(b3.note_with_letter('B').unwrap(), note("B"));
        assert_eq!(b3.note_with_letter('C').unwrap(), note("Cb"));
        assert_eq!(b3.note_with_letter('D').unwrap(), note("Dbbb"));
        assert_eq!(b3.note_with_letter('E').unwrap(), note("Ebbbbb"));
        assert!(c4.note_with_letter('H').is_err());
    }

    #[test]
    fn test_add_subtract() {
        assert_eq!(Pitch(60) + 1, Pitch(61));
        assert_eq!(Pitch(65) + 12, Pitch(77));
        assert_eq!(Pitch(60) - 1, Pitch(59));
        assert_eq!(Pitch(50) - 5, Pitch(45));
        assert_eq!(Pitch(67) - Pitch(60), 7);

        let mut p = Pitch::MIDDLE_C;
        p += 7;
        p -= 12;
        assert_eq!(p, Pitch(55));
    }

    #[test]
    fn test_checked_arithmetic_at_bounds() {
        assert_eq!(Pitch(60).checked_add(7), Some(Pitch(67)));
        assert_eq!(Pitch(i32::MAX).checked_add(1), None);
        assert_eq!(Pitch(i32::MIN).checked_sub(1), None);
        assert_eq!(Pitch(i32::MIN + 1).checked_sub(1), Some(Pitch(i32::MIN)));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Pitch::MIDDLE_C.to_string(), "C4");
        assert_eq!(Pitch::A440.to_string(), "A4");
        assert_eq!(Pitch(-1).to_string(), "B-2");
        assert_eq!(Pitch(61).to_string(), "C#4");

        assert_eq!("C4".parse::<Pitch>().unwrap(), Pitch::MIDDLE_C);
        assert_eq!("Db4".parse::<Pitch>().unwrap(), Pitch(61));
        assert_eq!("Bb-1".parse::<Pitch>().unwrap(), Pitch(10));
        assert_eq!("B#3".parse::<Pitch>().unwrap(), Pitch::MIDDLE_C);
        assert!("C".parse::<Pitch>().is_err());
        assert!("C4x".parse::<Pitch>().is_err());
        assert!("H4".parse::<Pitch>().is_err());
    }
}
