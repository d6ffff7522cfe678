// Error types shared by the theory, midi and sequencer modules

/// Errors reported by note/chord construction, message validation and the clock
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: i64 },

    #[error("Beats per minute out of range: {0}")]
    InvalidTempo(f32),

    #[error("Cannot parse '{input}': {reason} at '{token}'")]
    Parse {
        input: String,
        token: String,
        reason: String,
    },

    #[error("Cannot schedule at beat {requested}, clock is already at beat {current}")]
    InvalidSchedule { requested: f64, current: f64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MidiError {
    pub(crate) fn out_of_range(what: &'static str, value: impl Into<i64>) -> Self {
        MidiError::OutOfRange {
            what,
            value: value.into(),
        }
    }

    pub(crate) fn parse(input: &str, token: &str, reason: &str) -> Self {
        MidiError::Parse {
            input: input.to_string(),
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Parse failures are a kind of invalid argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MidiError::InvalidArgument(_) | MidiError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MidiError>;
