// MIDI Input - Delivers incoming notes to registered handlers
// A device layer calls receive_note_on/receive_note_off from its own thread

use super::channel::Channel;
use crate::sequencer::Clock;
use crate::theory::Pitch;
use std::sync::{Arc, Mutex, MutexGuard};

/// An incoming note event stamped with the clock's beat-time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub channel: Channel,
    pub pitch: Pitch,
    pub velocity: u8,
    /// Beat-time of the attached clock, or 0 without one
    pub time: f64,
}

pub type NoteHandler = Arc<dyn Fn(&NoteEvent) + Send + Sync>;

#[derive(Default)]
struct InputState {
    receiving: bool,
    clock: Option<Clock>,
    note_on_handlers: Vec<NoteHandler>,
    note_off_handlers: Vec<NoteHandler>,
}

/// Observer lists for note-on and note-off events
///
/// Handlers run synchronously on the caller's thread, outside the internal
/// lock, so a handler may register handlers or schedule on a clock.
#[derive(Default)]
pub struct InputFeed {
    state: Mutex<InputState>,
}

impl InputFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InputState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn add_note_on_handler<F>(&self, handler: F)
    where
        F: Fn(&NoteEvent) + Send + Sync + 'static,
    {
        self.lock().note_on_handlers.push(Arc::new(handler));
    }

    pub fn add_note_off_handler<F>(&self, handler: F)
    where
        F: Fn(&NoteEvent) + Send + Sync + 'static,
    {
        self.lock().note_off_handlers.push(Arc::new(handler));
    }

    pub fn remove_all_handlers(&self) {
        let mut state = self.lock();
        state.note_on_handlers.clear();
        state.note_off_handlers.clear();
    }

    /// Starts delivering events, stamping them with `clock`'s beat-time if given
    pub fn start_receiving(&self, clock: Option<Clock>) {
        let mut state = self.lock();
        state.receiving = true;
        state.clock = clock;
        log::debug!("Input feed receiving");
    }

    pub fn stop_receiving(&self) {
        let mut state = self.lock();
        state.receiving = false;
        state.clock = None;
        log::debug!("Input feed stopped");
    }

    pub fn is_receiving(&self) -> bool {
        self.lock().receiving
    }

    /// Delivers a note-on; velocity 0 is treated as a note-off
    ///
    /// Returns false when the feed is not receiving and the event was dropped.
    pub fn receive_note_on(&self, channel: Channel, pitch: Pitch, velocity: u8) -> bool {
        if velocity == 0 {
            return self.receive_note_off(channel, pitch, 0);
        }
        self.deliver(channel, pitch, velocity, true)
    }

    pub fn receive_note_off(&self, channel: Channel, pitch: Pitch, velocity: u8) -> bool {
        self.deliver(channel, pitch, velocity, false)
    }

    fn deliver(&self, channel: Channel, pitch: Pitch, velocity: u8, note_on: bool) -> bool {
        let (handlers, clock) = {
            let state = self.lock();
            if !state.receiving {
                return false;
            }
            let handlers = if note_on {
                state.note_on_handlers.clone()
            } else {
                state.note_off_handlers.clone()
            };
            (handlers, state.clock.clone())
        };

        let event = NoteEvent {
            channel,
            pitch,
            velocity,
            time: clock.map_or(0.0, |c| c.time()),
        };
        for handler in &handlers {
            handler(&event);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_events_dropped_until_receiving() {
        let feed = InputFeed::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        feed.add_note_on_handler(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!feed.receive_note_on(Channel::CHANNEL_1, Pitch(60), 100));
        feed.start_receiving(None);
        assert!(feed.receive_note_on(Channel::CHANNEL_1, Pitch(60), 100));
        feed.stop_receiving();
        assert!(!feed.receive_note_on(Channel::CHANNEL_1, Pitch(60), 100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_note_off_handlers_and_velocity_zero() {
        let feed = InputFeed::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        feed.add_note_off_handler(move |e| s.lock().unwrap().push(*e));
        feed.start_receiving(None);

        feed.receive_note_on(Channel::CHANNEL_3, Pitch(62), 0);
        feed.receive_note_off(Channel::CHANNEL_3, Pitch(64), 40);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].pitch, Pitch(62));
        assert_eq!(seen[1].velocity, 40);
        assert_eq!(seen[1].time, 0.0);
    }

    #[test]
    fn test_remove_all_handlers() {
        let feed = InputFeed::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        feed.add_note_on_handler(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        feed.start_receiving(None);
        feed.remove_all_handlers();
        assert!(feed.receive_note_on(Channel::CHANNEL_1, Pitch(60), 100));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_events_stamped_with_clock_time() {
        let clock = Clock::new(120.0).unwrap();
        let feed = InputFeed::new();
        let times = Arc::new(Mutex::new(Vec::new()));
        let t = times.clone();
        feed.add_note_on_handler(move |e| t.lock().unwrap().push(e.time));
        feed.start_receiving(Some(clock.clone()));

        feed.receive_note_on(Channel::CHANNEL_1, Pitch(60), 100);
        assert_eq!(times.lock().unwrap()[0], clock.time());
    }
}
