// Scale - Interval patterns rooted at a tonic
// Seven-note scales are spelled one letter per degree; others from pitch classes

use super::chord::validate_ascent;
use super::note::Note;
use super::pitch::Pitch;
use crate::error::{MidiError, Result};
use std::fmt;
use std::sync::LazyLock;

/// Interval template for a scale, in semitones above the tonic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalePattern {
    name: String,
    ascent: Vec<i32>,
}

static SCALE_PATTERNS: LazyLock<Vec<ScalePattern>> = LazyLock::new(|| {
    vec![
        ScalePattern::builtin("Major", &[0, 2, 4, 5, 7, 9, 11]),
        ScalePattern::builtin("Natural Minor", &[0, 2, 3, 5, 7, 8, 10]),
        ScalePattern::builtin("Harmonic Minor", &[0, 2, 3, 5, 7, 8, 11]),
        ScalePattern::builtin("Melodic Minor Ascending", &[0, 2, 3, 5, 7, 9, 11]),
        ScalePattern::builtin("Chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
    ]
});

impl ScalePattern {
    /// Creates a validated pattern; the ascent must start at 0 and strictly increase
    pub fn new(name: &str, ascent: &[i32]) -> Result<Self> {
        if name.is_empty() {
            return Err(MidiError::MissingArgument("scale pattern name".to_string()));
        }
        validate_ascent("ascent", ascent)?;
        Ok(Self::builtin(name, ascent))
    }

    fn builtin(name: &str, ascent: &[i32]) -> Self {
        Self {
            name: name.to_string(),
            ascent: ascent.to_vec(),
        }
    }

    pub fn major() -> &'static ScalePattern {
        &SCALE_PATTERNS[0]
    }

    pub fn natural_minor() -> &'static ScalePattern {
        &SCALE_PATTERNS[1]
    }

    pub fn harmonic_minor() -> &'static ScalePattern {
        &SCALE_PATTERNS[2]
    }

    pub fn melodic_minor_ascending() -> &'static ScalePattern {
        &SCALE_PATTERNS[3]
    }

    pub fn chromatic() -> &'static ScalePattern {
        &SCALE_PATTERNS[4]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ascent(&self) -> &[i32] {
        &self.ascent
    }

    pub fn len(&self) -> usize {
        self.ascent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ascent.is_empty()
    }
}

impl fmt::Display for ScalePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A scale pattern rooted at a tonic note
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scale {
    tonic: Note,
    pattern: ScalePattern,
    note_sequence: Vec<Note>,
}

impl Scale {
    pub fn new(tonic: Note, pattern: &ScalePattern) -> Self {
        let note_sequence = if pattern.len() == 7 {
            pattern
                .ascent
                .iter()
                .zip(0..)
                .map(|(&semitones, letter_steps)| tonic.transpose(semitones, letter_steps))
                .collect()
        } else {
            let base = Pitch(tonic.position_in_octave());
            pattern
                .ascent
                .iter()
                .map(|&semitones| {
                    let pitch = base + semitones;
                    if semitones == 0 {
                        tonic
                    } else if tonic.accidental() < 0 {
                        pitch.note_preferring_flats()
                    } else {
                        pitch.note_preferring_sharps()
                    }
                })
                .collect()
        };

        Self {
            tonic,
            pattern: pattern.clone(),
            note_sequence,
        }
    }

    /// All built-in scale patterns
    pub fn patterns() -> &'static [ScalePattern] {
        &SCALE_PATTERNS
    }

    pub fn tonic(&self) -> Note {
        self.tonic
    }

    pub fn pattern(&self) -> &ScalePattern {
        &self.pattern
    }

    /// Degrees from the tonic upwards
    pub fn note_sequence(&self) -> &[Note] {
        &self.note_sequence
    }

    /// `<tonic> <pattern name>`, e.g. `Fb Natural Minor`
    pub fn name(&self) -> String {
        format!("{} {}", self.tonic, self.pattern.name)
    }

    /// True if the pitch's class is a scale degree, in any octave
    pub fn contains(&self, pitch: Pitch) -> bool {
        let position = pitch.position_in_octave();
        self.note_sequence
            .iter()
            .any(|n| n.position_in_octave() == position)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    fn sequence(s: &Scale) -> String {
        s.note_sequence()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn test_pattern_construction_errors() {
        assert!(matches!(
            ScalePattern::new("", &[0, 2, 4]),
            Err(MidiError::MissingArgument(_))
        ));
        assert!(matches!(
            ScalePattern::new("a", &[]),
            Err(MidiError::MissingArgument(_))
        ));
        assert!(matches!(
            ScalePattern::new("a", &[1, 2, 4]),
            Err(MidiError::InvalidArgument(_))
        ));
        assert!(matches!(
            ScalePattern::new("a", &[0, 2, 2]),
            Err(MidiError::InvalidArgument(_))
        ));
        assert!(ScalePattern::new("Pentatonic", &[0, 2, 4, 7, 9]).is_ok());
    }

    #[test]
    fn test_pattern_equality() {
        let a = ScalePattern::new("a", &[0, 1, 2]).unwrap();
        assert_eq!(a, ScalePattern::new("a", &[0, 1, 2]).unwrap());
        assert_ne!(a, ScalePattern::new("b", &[0, 1, 2]).unwrap());
        assert_ne!(a, ScalePattern::new("a", &[0, 1, 3]).unwrap());
    }

    #[test]
    fn test_properties() {
        let scale = Scale::new(note("Fb"), ScalePattern::natural_minor());
        assert_eq!(scale.tonic(), note("Fb"));
        assert_eq!(scale.pattern(), ScalePattern::natural_minor());
        assert_eq!(scale.name(), "Fb Natural Minor");
        assert_eq!(scale.to_string(), "Fb Natural Minor");
    }

    #[test]
    fn test_note_sequences() {
        assert_eq!(
            sequence(&Scale::new(note("C"), ScalePattern::major())),
            "C, D, E, F, G, A, B"
        );
        assert_eq!(
            sequence(&Scale::new(note("F#"), ScalePattern::major())),
            "F#, G#, A#, B, C#, D#, E#"
        );
        assert_eq!(
            sequence(&Scale::new(note("Gb"), ScalePattern::major())),
            "Gb, Ab, Bb, Cb, Db, Eb, F"
        );
        assert_eq!(
            sequence(&Scale::new(note("Bb"), ScalePattern::natural_minor())),
            "Bb, C, Db, Eb, F, Gb, Ab"
        );
        assert_eq!(
            sequence(&Scale::new(note("Bb"), ScalePattern::harmonic_minor())),
            "Bb, C, Db, Eb, F, Gb, A"
        );
        assert_eq!(
            sequence(&Scale::new(note("A"), ScalePattern::melodic_minor_ascending())),
            "A, B, C, D, E, F#, G#"
        );
    }

    #[test]
    fn test_non_heptatonic_spelling() {
        let flats = Scale::new(note("Eb"), ScalePattern::chromatic());
        assert_eq!(flats.note_sequence().len(), 12);
        assert_eq!(flats.note_sequence()[0], note("Eb"));
        assert_eq!(flats.note_sequence()[1], note("E"));
        assert_eq!(flats.note_sequence()[3], note("Gb"));

        let sharps = Scale::new(note("D"), ScalePattern::chromatic());
        assert_eq!(sharps.note_sequence()[1], note("D#"));

        // The tonic keeps its own spelling
        let f_flat = Scale::new(note("Fb"), ScalePattern::chromatic());
        assert_eq!(f_flat.note_sequence()[0], note("Fb"));
        assert_eq!(f_flat.note_sequence()[1], note("F"));
        let b_sharp = Scale::new(note("B#"), ScalePattern::chromatic());
        assert_eq!(b_sharp.note_sequence()[0], note("B#"));
        assert_eq!(b_sharp.note_sequence()[1], note("C#"));

        let pentatonic = ScalePattern::new("Major Pentatonic", &[0, 2, 4, 7, 9]).unwrap();
        assert_eq!(
            sequence(&Scale::new(note("A"), &pentatonic)),
            "A, B, C#, E, F#"
        );
    }

    #[test]
    fn test_contains() {
        let cmajor = Scale::new(note("C"), ScalePattern::major());
        for p in [60, 62, 64, 65, 67, 69, 71, 72, 48] {
            assert!(cmajor.contains(Pitch(p)));
        }
        for p in [61, 63, 66, 68, 70] {
            assert!(!cmajor.contains(Pitch(p)));
        }
        let chromatic = Scale::new(note("C"), ScalePattern::chromatic());
        assert!((0..12).all(|p| chromatic.contains(Pitch(p))));
    }
}
