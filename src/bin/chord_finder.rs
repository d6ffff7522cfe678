// Chord Finder - Names the chords formed by the pitches given on the command line
// Usage: chord_finder C4 E4 G4   or   chord_finder 60 64 67

use mymusic_midi::{Chord, Pitch, Result};

fn parse_pitch(arg: &str) -> Result<Pitch> {
    match arg.parse::<i32>() {
        Ok(number) => Ok(Pitch(number)),
        Err(_) => arg.parse(),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: chord_finder <pitch>...  (e.g. C4 E4 G4 or 60 64 67)");
        std::process::exit(2);
    }

    let mut pitches = Vec::with_capacity(args.len());
    for arg in &args {
        match parse_pitch(arg) {
            Ok(pitch) => pitches.push(pitch),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    }

    let names: Vec<String> = pitches.iter().map(|p| p.to_string()).collect();
    println!("Pitches: {}", names.join(" "));

    let chords = Chord::find_matching_chords(&pitches);
    if chords.is_empty() {
        println!("No matching chord");
        return;
    }
    for chord in chords {
        let notes: Vec<String> = chord.note_sequence().iter().map(|n| n.to_string()).collect();
        println!("  {:<10} {} ({})", chord.name(), chord.pattern().name(), notes.join(", "));
    }
}
