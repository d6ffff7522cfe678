// Chord - Interval patterns rooted at a note, with inversions
// Handles chord spelling, name parsing/printing and chord recognition from pitches

use super::note::Note;
use super::pitch::Pitch;
use crate::error::{MidiError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Interval template for a chord
///
/// `ascent` holds semitone offsets from the root and `letter_offsets` the
/// matching letter steps, so a major triad is `[0, 4, 7]` / `[0, 2, 4]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordPattern {
    name: String,
    abbreviation: String,
    ascent: Vec<i32>,
    letter_offsets: Vec<i32>,
}

static CHORD_PATTERNS: LazyLock<Vec<ChordPattern>> = LazyLock::new(|| {
    vec![
        ChordPattern::builtin("Major", "", &[0, 4, 7], &[0, 2, 4]),
        ChordPattern::builtin("Minor", "m", &[0, 3, 7], &[0, 2, 4]),
        ChordPattern::builtin("Seventh", "7", &[0, 4, 7, 10], &[0, 2, 4, 6]),
        ChordPattern::builtin("Augmented", "aug", &[0, 4, 8], &[0, 2, 4]),
        ChordPattern::builtin("Diminished", "dim", &[0, 3, 6], &[0, 2, 4]),
    ]
});

impl ChordPattern {
    /// Creates a validated pattern
    ///
    /// Both arrays must be non-empty, of equal length, start at 0 and be
    /// strictly increasing; letter offsets must stay below 7.
    pub fn new(
        name: &str,
        abbreviation: &str,
        ascent: &[i32],
        letter_offsets: &[i32],
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(MidiError::MissingArgument("chord pattern name".to_string()));
        }
        validate_ascent("ascent", ascent)?;
        validate_ascent("letter offsets", letter_offsets)?;
        if ascent.len() != letter_offsets.len() {
            return Err(MidiError::InvalidArgument(format!(
                "ascent has {} entries but letter offsets has {}",
                ascent.len(),
                letter_offsets.len()
            )));
        }
        if let Some(&last) = letter_offsets.last() {
            if last >= 7 {
                return Err(MidiError::InvalidArgument(format!(
                    "letter offset {} spans more than an octave",
                    last
                )));
            }
        }
        Ok(Self::builtin(name, abbreviation, ascent, letter_offsets))
    }

    fn builtin(name: &str, abbreviation: &str, ascent: &[i32], letter_offsets: &[i32]) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            ascent: ascent.to_vec(),
            letter_offsets: letter_offsets.to_vec(),
        }
    }

    pub fn major() -> &'static ChordPattern {
        &CHORD_PATTERNS[0]
    }

    pub fn minor() -> &'static ChordPattern {
        &CHORD_PATTERNS[1]
    }

    pub fn seventh() -> &'static ChordPattern {
        &CHORD_PATTERNS[2]
    }

    pub fn augmented() -> &'static ChordPattern {
        &CHORD_PATTERNS[3]
    }

    pub fn diminished() -> &'static ChordPattern {
        &CHORD_PATTERNS[4]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn ascent(&self) -> &[i32] {
        &self.ascent
    }

    pub fn letter_offsets(&self) -> &[i32] {
        &self.letter_offsets
    }

    pub fn len(&self) -> usize {
        self.ascent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ascent.is_empty()
    }

    /// Pitch classes of this pattern rooted at pitch class `root`
    fn pitch_classes(&self, root: i32) -> BTreeSet<i32> {
        self.ascent.iter().map(|a| (root + a).rem_euclid(12)).collect()
    }
}

/// Shared validation for chord and scale ascents
pub(crate) fn validate_ascent(what: &str, values: &[i32]) -> Result<()> {
    match values.first() {
        None => return Err(MidiError::MissingArgument(what.to_string())),
        Some(&first) if first != 0 => {
            return Err(MidiError::InvalidArgument(format!(
                "{} must start at 0, got {}",
                what, first
            )));
        }
        Some(_) => {}
    }
    if values.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MidiError::InvalidArgument(format!(
            "{} must be strictly increasing: {:?}",
            what, values
        )));
    }
    Ok(())
}

/// A chord: a pattern rooted at a note, in some inversion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    root: Note,
    pattern: ChordPattern,
    inversion: usize,
    note_sequence: Vec<Note>,
}

impl Chord {
    /// Creates a chord; `inversion` must be less than the pattern length
    pub fn new(root: Note, pattern: &ChordPattern, inversion: usize) -> Result<Self> {
        if inversion >= pattern.len() {
            return Err(MidiError::InvalidArgument(format!(
                "inversion {} out of range for {} chord ({} notes)",
                inversion,
                pattern.name(),
                pattern.len()
            )));
        }

        let len = pattern.len();
        let note_sequence = (0..len)
            .map(|i| {
                let index = (i + inversion) % len;
                root.transpose(pattern.ascent[index], pattern.letter_offsets[index])
            })
            .collect();

        Ok(Self {
            root,
            pattern: pattern.clone(),
            inversion,
            note_sequence,
        })
    }

    /// Parses an optional chord name, distinguishing an absent name from a malformed one
    pub fn parse_opt(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => name.parse(),
            None => Err(MidiError::MissingArgument("chord name".to_string())),
        }
    }

    /// All built-in chord patterns
    pub fn patterns() -> &'static [ChordPattern] {
        &CHORD_PATTERNS
    }

    pub fn root(&self) -> Note {
        self.root
    }

    pub fn pattern(&self) -> &ChordPattern {
        &self.pattern
    }

    pub fn inversion(&self) -> usize {
        self.inversion
    }

    /// The lowest note once the inversion is applied
    pub fn bass(&self) -> Note {
        self.note_sequence[0]
    }

    /// Chord tones from the bass upwards
    pub fn note_sequence(&self) -> &[Note] {
        &self.note_sequence
    }

    /// Canonical name, e.g. `C`, `F#m`, `Cm/Eb`
    pub fn name(&self) -> String {
        if self.inversion == 0 {
            format!("{}{}", self.root, self.pattern.abbreviation)
        } else {
            format!("{}{}/{}", self.root, self.pattern.abbreviation, self.bass())
        }
    }

    /// True if the pitch's class is one of the chord tones, in any octave
    pub fn contains(&self, pitch: Pitch) -> bool {
        let position = pitch.position_in_octave();
        self.note_sequence
            .iter()
            .any(|n| n.position_in_octave() == position)
    }

    /// Every chord whose pitch-class set equals that of `pitches`
    ///
    /// Roots are tried in both their sharp and flat spellings, and every
    /// inversion of a matching pattern is returned. Chords whose bass is the
    /// pitch class of the lowest input pitch come first; otherwise the order
    /// follows the pattern list, then the root pitch class.
    pub fn find_matching_chords(pitches: &[Pitch]) -> Vec<Chord> {
        let lowest = match pitches.iter().min() {
            Some(p) => *p,
            None => return Vec::new(),
        };
        let wanted: BTreeSet<i32> = pitches.iter().map(|p| p.position_in_octave()).collect();

        let mut result = Vec::new();
        for pattern in Chord::patterns() {
            for root_class in 0..12 {
                if pattern.pitch_classes(root_class) != wanted {
                    continue;
                }
                let root_pitch = Pitch(root_class);
                let sharp = root_pitch.note_preferring_sharps();
                let flat = root_pitch.note_preferring_flats();
                let spellings = if sharp == flat { vec![sharp] } else { vec![sharp, flat] };
                for root in spellings {
                    for inversion in 0..pattern.len() {
                        if let Ok(chord) = Chord::new(root, pattern, inversion) {
                            result.push(chord);
                        }
                    }
                }
            }
        }

        let bass_class = lowest.position_in_octave();
        result.sort_by_key(|c| c.bass().position_in_octave() != bass_class);
        result
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Parses `<root><abbreviation>[/<bass>]`, e.g. `C`, `Cm`, `Fbdim`, `Ab/Eb`
impl FromStr for Chord {
    type Err = MidiError;

    fn from_str(s: &str) -> Result<Self> {
        let (root, rest) = Note::parse_prefix(s)?;
        let (abbreviation, bass) = match rest.split_once('/') {
            Some((abbreviation, bass)) => (abbreviation, Some(bass)),
            None => (rest, None),
        };

        let pattern = Chord::patterns()
            .iter()
            .find(|p| p.abbreviation == abbreviation)
            .ok_or_else(|| MidiError::parse(s, abbreviation, "unknown chord abbreviation"))?;

        let bass = match bass {
            None => return Chord::new(root, pattern, 0),
            Some(bass) => bass.parse::<Note>().map_err(|e| match e {
                MidiError::Parse { reason, .. } => MidiError::parse(s, bass, &reason),
                other => other,
            })?,
        };

        for inversion in 1..pattern.len() {
            let chord = Chord::new(root, pattern, inversion)?;
            if chord.bass() == bass {
                return Ok(chord);
            }
        }
        Err(MidiError::parse(s, &bass.to_string(), "bass note is not in the chord"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> Chord {
        s.parse().unwrap()
    }

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    fn sequence(c: &Chord) -> String {
        c.note_sequence()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn test_pattern_construction_errors() {
        assert!(matches!(
            ChordPattern::new("", "a", &[0, 1, 2, 3], &[0, 1, 2, 3]),
            Err(MidiError::MissingArgument(_))
        ));
        assert!(matches!(
            ChordPattern::new("a", "b", &[], &[0, 1, 2, 3]),
            Err(MidiError::MissingArgument(_))
        ));
        assert!(matches!(
            ChordPattern::new("a", "b", &[0, 1, 2, 3], &[]),
            Err(MidiError::MissingArgument(_))
        ));
        for (ascent, letters) in [
            (&[0, 1, 2, 3][..], &[0, 1, 2][..]),
            (&[1, 2, 3, 4][..], &[1, 2, 3, 4][..]),
            (&[0, 1, 2, 3, 3][..], &[0, 1, 2, 3, 3][..]),
            (&[0, 4, 7][..], &[0, 2, 7][..]),
        ] {
            assert!(matches!(
                ChordPattern::new("a", "b", ascent, letters),
                Err(MidiError::InvalidArgument(_))
            ));
        }
        // An empty abbreviation is legitimate (major chords)
        assert!(ChordPattern::new("a", "", &[0, 4, 7], &[0, 2, 4]).is_ok());
    }

    #[test]
    fn test_pattern_equality() {
        let p = |name: &str, ascent: &[i32], letters: &[i32]| {
            ChordPattern::new(name, "b", ascent, letters).unwrap()
        };
        assert_eq!(p("a", &[0, 1, 2], &[0, 1, 2]), p("a", &[0, 1, 2], &[0, 1, 2]));
        assert_ne!(p("a", &[0, 1, 2], &[0, 1, 2]), p("c", &[0, 1, 2], &[0, 1, 2]));
        assert_ne!(p("a", &[0, 1, 3], &[0, 1, 2]), p("a", &[0, 1, 2], &[0, 1, 2]));
        assert_ne!(p("a", &[0, 1, 2], &[0, 1, 3]), p("a", &[0, 1, 2], &[0, 1, 2]));
        assert_ne!(p("a", &[0, 1, 2, 3], &[0, 1, 2, 3]), p("a", &[0, 1, 2], &[0, 1, 2]));
    }

    #[test]
    fn test_pattern_properties() {
        let cp = ChordPattern::new("a", "b", &[0, 1, 2, 3], &[0, 1, 2, 3]).unwrap();
        assert_eq!(cp.name(), "a");
        assert_eq!(cp.abbreviation(), "b");
        assert_eq!(cp.ascent().len(), 4);
        assert_eq!(cp.letter_offsets().len(), 4);
    }

    #[test]
    fn test_construction() {
        let f = note("F");
        assert!(Chord::new(f, ChordPattern::major(), 3).is_err());
        assert!(Chord::new(f, ChordPattern::major(), 7).is_err());
        assert!(Chord::new(f, ChordPattern::seventh(), 3).is_ok());

        let c = note("C");
        assert_eq!(chord("C"), Chord::new(c, ChordPattern::major(), 0).unwrap());
        assert_eq!(chord("Cm"), Chord::new(c, ChordPattern::minor(), 0).unwrap());
        assert_eq!(chord("C#m"), Chord::new(note("C#"), ChordPattern::minor(), 0).unwrap());
        assert_eq!(
            chord("Fbdim"),
            Chord::new(note("Fb"), ChordPattern::diminished(), 0).unwrap()
        );
        assert_eq!(chord("C/E"), Chord::new(c, ChordPattern::major(), 1).unwrap());
        assert_eq!(chord("Cm/Eb"), Chord::new(c, ChordPattern::minor(), 1).unwrap());
        assert_eq!(chord("C/G"), Chord::new(c, ChordPattern::major(), 2).unwrap());
        assert_eq!(chord("Cm/G"), Chord::new(c, ChordPattern::minor(), 2).unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Chord::parse_opt(None), Err(MidiError::MissingArgument(_))));
        for bad in ["", "X", "Cx", "C#b", "C/X", "Fbdimx", "C/F", "C/Fb", "C/E/G"] {
            let err = bad.parse::<Chord>().unwrap_err();
            assert!(err.is_invalid_argument(), "{bad} gave {err:?}");
        }
        match "Fbdimx".parse::<Chord>() {
            Err(MidiError::Parse { token, .. }) => assert_eq!(token, "dimx"),
            other => panic!("Expected parse error, got {other:?}"),
        }
        match "C/X".parse::<Chord>() {
            Err(MidiError::Parse { input, token, .. }) => {
                assert_eq!(input, "C/X");
                assert_eq!(token, "X");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_properties() {
        let fm = chord("Fm/Ab");
        assert_eq!(fm.name(), "Fm/Ab");
        assert_eq!(fm.root(), note("F"));
        assert_eq!(fm.bass(), note("Ab"));
        assert_eq!(fm.pattern(), ChordPattern::minor());
        assert_eq!(fm.inversion(), 1);
        assert_eq!(fm.to_string(), "Fm/Ab");
    }

    #[test]
    fn test_note_sequences() {
        assert_eq!(sequence(&chord("C")), "C, E, G");
        assert_eq!(sequence(&chord("C#")), "C#, E#, G#");
        assert_eq!(sequence(&chord("Ab")), "Ab, C, Eb");
        assert_eq!(sequence(&chord("Ab/Eb")), "Eb, Ab, C");
        assert_eq!(sequence(&chord("Cm")), "C, Eb, G");
        assert_eq!(sequence(&chord("Ebm")), "Eb, Gb, Bb");
        assert_eq!(sequence(&chord("G#m")), "G#, B, D#");
        assert_eq!(sequence(&chord("G#m/B")), "B, D#, G#");
        assert_eq!(sequence(&chord("Abm")), "Ab, Cb, Eb");
        assert_eq!(sequence(&chord("Cdim")), "C, Eb, Gb");
        assert_eq!(sequence(&chord("Cdim/Eb")), "Eb, Gb, C");
        assert_eq!(sequence(&chord("G7/F")), "F, G, B, D");
    }

    #[test]
    fn test_contains() {
        let cmajor = chord("C");
        for p in [36, 40, 43, 48, 52, 55] {
            assert!(cmajor.contains(Pitch(p)), "C should contain {p}");
        }
        for p in [37, 38, 39, 41, 42, 44, 45, 46] {
            assert!(!cmajor.contains(Pitch(p)), "C should not contain {p}");
        }

        let bbminor = chord("Bbm");
        for p in [46, 49, 53] {
            assert!(bbminor.contains(Pitch(p)));
        }
        for p in [47, 48, 50, 51, 52, 55, 54, 56, 57] {
            assert!(!bbminor.contains(Pitch(p)));
        }
    }

    #[test]
    fn test_find_matching_chords() {
        // C4 E4 G4
        let found = Chord::find_matching_chords(&[Pitch(60), Pitch(64), Pitch(67)]);
        let names: Vec<String> = found.iter().map(|c| c.name()).collect();
        assert_eq!(names[0], "C");
        assert!(names.contains(&"C/E".to_string()));
        assert!(names.contains(&"C/G".to_string()));
        assert_eq!(names.len(), 3);

        // First inversion voicing puts the matching inversion first
        let found = Chord::find_matching_chords(&[Pitch(64), Pitch(67), Pitch(72)]);
        assert_eq!(found[0].name(), "C/E");

        // Octave doublings do not change the pitch-class set
        let found = Chord::find_matching_chords(&[Pitch(60), Pitch(64), Pitch(67), Pitch(72)]);
        assert_eq!(found.len(), 3);

        // Augmented triads are symmetric: every root spelling matches
        let found = Chord::find_matching_chords(&[Pitch(60), Pitch(64), Pitch(68)]);
        assert!(found.iter().any(|c| c.name() == "Caug"));
        assert!(found.iter().any(|c| c.name() == "Eaug"));
        assert!(found.iter().any(|c| c.name() == "Abaug"));
        assert!(found.iter().any(|c| c.name() == "G#aug"));

        assert!(Chord::find_matching_chords(&[]).is_empty());
        assert!(Chord::find_matching_chords(&[Pitch(60), Pitch(61)]).is_empty());
    }
}
