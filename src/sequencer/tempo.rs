// Tempo - Beats per minute and beat/wall-clock conversion

use crate::error::{MidiError, Result};
use std::fmt;
use std::time::Duration;

/// Tempo in BPM (Beats Per Minute), always finite and positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tempo {
    bpm: f32,
}

impl Tempo {
    /// Creates a new tempo; non-finite or non-positive BPM is `InvalidTempo`
    pub fn new(bpm: f32) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(MidiError::InvalidTempo(bpm));
        }
        Ok(Self { bpm })
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Beats elapsed over `elapsed` wall-clock time
    pub fn beats_for(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * self.bpm as f64 / 60.0
    }

    /// Wall-clock time spanned by `beats`
    ///
    /// Negative spans are zero; spans too long for a `Duration` saturate.
    pub fn duration_for(&self, beats: f64) -> Duration {
        let seconds = beats * self.beat_duration_seconds();
        if seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}
