// MyMusic MIDI - Scheduling demo
// Plays a melody with chords and a self-rescheduling drummer into a printing sink

use mymusic_midi::midi::{Channel, Control, MidiSink, Percussion};
use mymusic_midi::{Chord, Clock, ClockConfig, Message, Note, Pitch};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Sink that prints every call with the wall-clock offset since the demo started
struct ConsoleSink {
    started: Instant,
}

impl ConsoleSink {
    fn print(&self, text: String) {
        println!("[{:>7.3}s] {}", self.started.elapsed().as_secs_f64(), text);
    }
}

impl MidiSink for ConsoleSink {
    fn send_note_on(&self, channel: Channel, pitch: Pitch, velocity: u8) {
        self.print(format!("{} note on  {} velocity {}", channel, pitch, velocity));
    }

    fn send_note_off(&self, channel: Channel, pitch: Pitch, _velocity: u8) {
        self.print(format!("{} note off {}", channel, pitch));
    }

    fn send_control_change(&self, channel: Channel, control: Control, value: u8) {
        self.print(format!("{} {} = {}", channel, control, value));
    }

    fn send_pitch_bend(&self, channel: Channel, value: u16) {
        self.print(format!("{} pitch bend {}", channel, value));
    }

    fn send_percussion(&self, percussion: Percussion, velocity: u8) {
        self.print(format!("Percussion {} velocity {}", percussion, velocity));
    }
}

/// "Mary Had a Little Lamb": (pitch name, start beat, length in beats)
const MELODY: [(&str, f64, f64); 13] = [
    ("E4", 0.0, 1.0),
    ("D4", 1.0, 1.0),
    ("C4", 2.0, 1.0),
    ("D4", 3.0, 1.0),
    ("E4", 4.0, 1.0),
    ("E4", 5.0, 1.0),
    ("E4", 6.0, 2.0),
    ("D4", 8.0, 1.0),
    ("D4", 9.0, 1.0),
    ("D4", 10.0, 2.0),
    ("E4", 12.0, 1.0),
    ("G4", 13.0, 1.0),
    ("G4", 14.0, 2.0),
];

const CHORDS: [(&str, f64); 4] = [("C", 0.0), ("G/B", 4.0), ("G", 8.0), ("C/E", 12.0)];

const LENGTH_BEATS: f64 = 16.0;

fn build_song(sink: &Arc<dyn MidiSink>) -> mymusic_midi::Result<Vec<Message>> {
    let mut messages = Vec::new();

    for (name, start, length) in MELODY {
        let pitch: Pitch = name.parse()?;
        let notes = Message::note_on_off(
            sink.clone(),
            Channel::CHANNEL_1,
            pitch,
            90,
            start,
            length * 0.9,
        )?;
        messages.extend(notes);
    }

    for (name, start) in CHORDS {
        let chord: Chord = name.parse()?;
        let mut pitch = Pitch::named(chord.bass(), 3)?;
        for note in chord.note_sequence() {
            pitch = note.pitch_at_or_above(pitch);
            let notes =
                Message::note_on_off(sink.clone(), Channel::CHANNEL_2, pitch, 60, start, 3.9)?;
            messages.extend(notes);
        }
    }

    messages.push(Message::control_change(
        sink.clone(),
        Channel::CHANNEL_1,
        Control::SUSTAIN_PEDAL,
        127,
        12.0,
    )?);
    messages.push(Message::control_change(
        sink.clone(),
        Channel::CHANNEL_1,
        Control::SUSTAIN_PEDAL,
        0,
        LENGTH_BEATS,
    )?);

    Ok(messages)
}

/// Schedules a drum hit on every beat until the song ends, one callback at a time
fn schedule_drummer(clock: &Clock, sink: Arc<dyn MidiSink>, beat: f64) -> mymusic_midi::Result<()> {
    let drummer_clock = clock.clone();
    let callback = Message::callback(
        move |time| {
            let percussion = if time % 4.0 == 0.0 {
                Percussion::BASS_DRUM_1
            } else {
                Percussion::CLOSED_HI_HAT
            };
            let scheduled = Message::percussion(sink.clone(), percussion, 80, time)
                .and_then(|hit| drummer_clock.schedule(hit));
            if let Err(e) = scheduled {
                eprintln!("Drummer failed: {}", e);
                return;
            }
            if time + 1.0 < LENGTH_BEATS {
                if let Err(e) = schedule_drummer(&drummer_clock, sink.clone(), time + 1.0) {
                    eprintln!("Drummer failed: {}", e);
                }
            }
        },
        beat,
    )?;
    clock.schedule(callback)
}

fn run() -> mymusic_midi::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading clock configuration from {}", path);
            ClockConfig::load(path)?
        }
        None => ClockConfig {
            beats_per_minute: 180.0,
            ..ClockConfig::default()
        },
    };

    let sink: Arc<dyn MidiSink> = Arc::new(ConsoleSink {
        started: Instant::now(),
    });
    let clock = Clock::with_config(config)?;

    let song = build_song(&sink)?;
    println!("Scheduling {} messages at {}", song.len(), clock.tempo());
    clock.schedule_all(&song, 0.0)?;
    schedule_drummer(&clock, sink.clone(), 0.0)?;

    let tonic: Note = "C".parse()?;
    println!("Key: {}", mymusic_midi::Scale::new(tonic, mymusic_midi::ScalePattern::major()));

    clock.start()?;
    thread::sleep(clock.tempo().duration_for(8.0));

    // Halfway through, speed up
    let faster = clock.beats_per_minute() * 1.5;
    println!("Tempo change to {:.1} BPM at beat {:.2}", faster, clock.time());
    clock.set_beats_per_minute(faster)?;

    while clock.time() < LENGTH_BEATS + 0.5 {
        thread::sleep(Duration::from_millis(50));
    }
    clock.stop();
    sink.silence_all_notes();
    println!("Done at beat {:.2}, {} message(s) left", clock.time(), clock.pending_len());
    clock.clear();
    Ok(())
}

fn main() {
    println!("=== MyMusic MIDI ===");
    println!("Clock scheduling demo\n");

    if let Err(e) = run() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
