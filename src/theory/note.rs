// Note - Letter + accidental spelling of a pitch class
// Equality is by spelling (C# != Db); enharmonic equivalence is a separate check

use super::pitch::Pitch;
use crate::error::{MidiError, Result};
use std::fmt;
use std::str::FromStr;

/// Letters in the order used for diatonic letter arithmetic (C-based)
const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Semitone position of each natural letter, same order as `LETTERS`
const NATURAL_POSITIONS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// A note name: a letter `A`..`G` plus a signed accidental in semitones
///
/// Accidentals of any magnitude are representable and print as repeated
/// `#` or `b` (`F#####`, `Gbbb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    letter: char,
    accidental: i32,
}

impl Note {
    pub const DOUBLE_FLAT: i32 = -2;
    pub const FLAT: i32 = -1;
    pub const NATURAL: i32 = 0;
    pub const SHARP: i32 = 1;
    pub const DOUBLE_SHARP: i32 = 2;

    /// A natural note; `letter` must be an uppercase `A`..`G`
    pub fn new(letter: char) -> Result<Self> {
        Self::with_accidental(letter, Self::NATURAL)
    }

    pub fn with_accidental(letter: char, accidental: i32) -> Result<Self> {
        letter_index(letter)?;
        Ok(Self { letter, accidental })
    }

    /// Caller guarantees `letter` is valid
    pub(crate) const fn from_parts(letter: char, accidental: i32) -> Self {
        Self { letter, accidental }
    }

    /// Parses an optional name, distinguishing an absent name from a malformed one
    pub fn parse_opt(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => name.parse(),
            None => Err(MidiError::MissingArgument("note name".to_string())),
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn accidental(&self) -> i32 {
        self.accidental
    }

    /// Position of a natural letter within the octave (C = 0 .. B = 11)
    pub fn letter_base_position(letter: char) -> Result<i32> {
        Ok(NATURAL_POSITIONS[letter_index(letter)?])
    }

    /// Position of this note within the octave, always in 0..12
    pub fn position_in_octave(&self) -> i32 {
        (NATURAL_POSITIONS[self.index()] + self.accidental).rem_euclid(12)
    }

    pub fn is_enharmonic_with(&self, other: &Note) -> bool {
        self.position_in_octave() == other.position_in_octave()
    }

    /// Semitones walking up from this note to the nearest `other`, in 0..12
    pub fn semitones_up_to(&self, other: &Note) -> i32 {
        (other.position_in_octave() - self.position_in_octave()).rem_euclid(12)
    }

    /// Semitones walking down from this note to the nearest `other`, in 0..12
    pub fn semitones_down_to(&self, other: &Note) -> i32 {
        (self.position_in_octave() - other.position_in_octave()).rem_euclid(12)
    }

    /// The pitch of this note in the given octave
    ///
    /// The octave is that of the letter, so `B#` in octave 3 is C4 and `Cb`
    /// in octave 4 is B3.
    pub fn pitch_in_octave(&self, octave: i32) -> Result<Pitch> {
        let semitones = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|s| s.checked_add(NATURAL_POSITIONS[self.index()]))
            .and_then(|s| s.checked_add(self.accidental))
            .ok_or_else(|| MidiError::out_of_range("octave", octave))?;
        Ok(Pitch(semitones))
    }

    /// The lowest pitch at or above `pitch` whose pitch class matches this note
    ///
    /// Moves at most 11 semitones, with `Pitch`'s overflow behavior.
    pub fn pitch_at_or_above(&self, pitch: Pitch) -> Pitch {
        pitch + (self.position_in_octave() - pitch.position_in_octave()).rem_euclid(12)
    }

    /// The highest pitch at or below `pitch` whose pitch class matches this note
    pub fn pitch_at_or_below(&self, pitch: Pitch) -> Pitch {
        pitch - (pitch.position_in_octave() - self.position_in_octave()).rem_euclid(12)
    }

    /// Transposes by an interval given as both semitones and letter steps
    ///
    /// The letter moves `letter_steps` through C D E F G A B (wrapping), and
    /// the accidental absorbs whatever the natural letters do not cover. This
    /// is what spells a major third above `Ab` as `C` and above `C#` as `E#`.
    pub fn transpose(&self, semitones: i32, letter_steps: i32) -> Note {
        let from = self.index() as i32;
        let target = from + letter_steps;
        let to = target.rem_euclid(7) as usize;
        let natural_span =
            NATURAL_POSITIONS[to] + 12 * target.div_euclid(7) - NATURAL_POSITIONS[from as usize];
        Note::from_parts(LETTERS[to], self.accidental + semitones - natural_span)
    }

    fn index(&self) -> usize {
        // Letters are validated at construction
        LETTERS.iter().position(|&l| l == self.letter).unwrap_or(0)
    }

    /// Parses a leading note name, returning it with the unparsed remainder
    ///
    /// Accidentals are a run of one kind only; `Db#` stops after `Db`.
    pub(crate) fn parse_prefix(input: &str) -> Result<(Note, &str)> {
        let letter = match input.chars().next() {
            Some(c) => c,
            None => return Err(MidiError::parse(input, "", "empty note name")),
        };
        if letter_index(letter).is_err() {
            return Err(MidiError::parse(
                input,
                &input[..letter.len_utf8()],
                "unknown note letter",
            ));
        }

        let rest = &input[letter.len_utf8()..];
        let accidental_char = match rest.chars().next() {
            Some(c @ ('#' | 'b')) => c,
            _ => return Ok((Note::from_parts(letter, Self::NATURAL), rest)),
        };
        let count = rest.chars().take_while(|&c| c == accidental_char).count();
        let step = if accidental_char == '#' { 1 } else { -1 };
        Ok((
            Note::from_parts(letter, step * count as i32),
            &rest[count..],
        ))
    }
}

fn letter_index(letter: char) -> Result<usize> {
    LETTERS
        .iter()
        .position(|&l| l == letter)
        .ok_or_else(|| MidiError::out_of_range("note letter", letter as u32))
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        let symbol = if self.accidental > 0 { "#" } else { "b" };
        for _ in 0..self.accidental.unsigned_abs() {
            f.write_str(symbol)?;
        }
        Ok(())
    }
}

impl FromStr for Note {
    type Err = MidiError;

    fn from_str(s: &str) -> Result<Self> {
        let (note, rest) = Note::parse_prefix(s)?;
        match rest.chars().next() {
            None => Ok(note),
            Some('#' | 'b') => Err(MidiError::parse(s, rest, "mixed accidentals")),
            Some(_) => Err(MidiError::parse(s, rest, "unexpected characters")),
        }
    }
}
