// Clock - Tempo-mutable scheduler dispatching messages in beat-time order
// One mutex guards all scheduler state; a timing thread dispatches while running

use super::config::ClockConfig;
use super::message::Message;
use super::tempo::Tempo;
use crate::error::{MidiError, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Whether the clock's beat-time is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockStatus {
    #[default]
    Stopped,
    Running,
}

/// A queued message; the heap pops the earliest time first, FIFO among equal times
struct Pending {
    time: f64,
    seq: u64,
    message: Message,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct SchedulerState {
    tempo: Tempo,
    running: bool,
    /// Beat-time at `anchor_instant`; the whole beat-time while stopped
    anchor_beat: f64,
    anchor_instant: Instant,
    queue: BinaryHeap<Pending>,
    next_seq: u64,
    /// Bumped on every start/stop so a stale timing thread exits
    generation: u64,
    /// Due time of the message being dispatched and the thread sending it
    dispatch: Option<(f64, ThreadId)>,
    worker: Option<JoinHandle<()>>,
    shutdown: bool,
}

impl SchedulerState {
    fn current_time(&self) -> f64 {
        if self.running {
            self.anchor_beat + self.tempo.beats_for(self.anchor_instant.elapsed())
        } else {
            self.anchor_beat
        }
    }

    /// Earliest time a message may be scheduled at
    ///
    /// The dispatching thread may schedule at the due time of the message it
    /// is sending; every other thread is held to the live beat-time.
    fn schedule_floor(&self) -> f64 {
        match self.dispatch {
            Some((time, sender)) if sender == thread::current().id() => time,
            _ => self.current_time(),
        }
    }

    fn push(&mut self, message: Message) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Pending {
            time: message.time(),
            seq,
            message,
        });
    }

    fn take_worker(&mut self) -> Option<JoinHandle<()>> {
        self.worker.take()
    }
}

struct ClockInner {
    state: Mutex<SchedulerState>,
    wake: Condvar,
    config: ClockConfig,
}

impl ClockInner {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Owner of the timing thread; dropped when the last `Clock` handle goes away
struct ClockHandle {
    inner: Arc<ClockInner>,
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        let (worker, discarded) = {
            let mut state = self.inner.lock();
            state.shutdown = true;
            state.running = false;
            state.generation += 1;
            (state.take_worker(), std::mem::take(&mut state.queue))
        };
        self.inner.wake.notify_all();
        drop(discarded);
        join_worker(worker);
    }
}

/// Joins a timing thread unless called from that thread itself
fn join_worker(worker: Option<JoinHandle<()>>) {
    if let Some(worker) = worker {
        let current: ThreadId = thread::current().id();
        if worker.thread().id() != current && worker.join().is_err() {
            log::warn!("Clock timing thread panicked");
        }
    }
}

/// Scheduler converting beat-time into wall-clock dispatch
///
/// `Clock` is a cheap handle: clones share the same scheduler, so a callback
/// message can capture a clone and reschedule itself. The clock starts
/// stopped at beat 0. While running, beat-time advances at
/// `elapsed_seconds * bpm / 60` and every queued message whose time has been
/// reached is sent, earliest first and in scheduling order among equal times.
///
/// Messages are sent outside the internal lock, so sinks and callbacks may
/// call back into the clock. A callback that holds a clone of the clock
/// while queued keeps the clock alive until it runs or is removed.
#[derive(Clone)]
pub struct Clock {
    handle: Arc<ClockHandle>,
}

impl Clock {
    /// Creates a stopped clock at beat 0 with default configuration
    pub fn new(beats_per_minute: f32) -> Result<Clock> {
        Clock::with_config(ClockConfig {
            beats_per_minute,
            ..ClockConfig::default()
        })
    }

    pub fn with_config(config: ClockConfig) -> Result<Clock> {
        config.validate()?;
        let tempo = Tempo::new(config.beats_per_minute)?;
        let state = SchedulerState {
            tempo,
            running: false,
            anchor_beat: 0.0,
            anchor_instant: Instant::now(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            generation: 0,
            dispatch: None,
            worker: None,
            shutdown: false,
        };
        Ok(Clock {
            handle: Arc::new(ClockHandle {
                inner: Arc::new(ClockInner {
                    state: Mutex::new(state),
                    wake: Condvar::new(),
                    config,
                }),
            }),
        })
    }

    fn inner(&self) -> &Arc<ClockInner> {
        &self.handle.inner
    }

    pub fn config(&self) -> &ClockConfig {
        &self.inner().config
    }

    /// Current beat-time
    pub fn time(&self) -> f64 {
        self.inner().lock().current_time()
    }

    pub fn is_running(&self) -> bool {
        self.inner().lock().running
    }

    pub fn status(&self) -> ClockStatus {
        if self.is_running() {
            ClockStatus::Running
        } else {
            ClockStatus::Stopped
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.inner().lock().tempo
    }

    pub fn beats_per_minute(&self) -> f32 {
        self.tempo().bpm()
    }

    /// Changes the tempo from now on; beats already elapsed are kept
    pub fn set_beats_per_minute(&self, beats_per_minute: f32) -> Result<()> {
        let tempo = Tempo::new(beats_per_minute)?;
        {
            let mut state = self.inner().lock();
            if state.running {
                let now = Instant::now();
                let elapsed = state.tempo.beats_for(now - state.anchor_instant);
                state.anchor_beat += elapsed;
                state.anchor_instant = now;
            }
            state.tempo = tempo;
            log::debug!("Clock tempo set to {} at beat {:.3}", tempo, state.anchor_beat);
        }
        self.inner().wake.notify_all();
        Ok(())
    }

    /// Starts advancing beat-time; a no-op if already running
    pub fn start(&self) -> Result<()> {
        let inner = self.inner();
        let mut state = inner.lock();
        if state.running {
            return Ok(());
        }
        state.running = true;
        state.anchor_instant = Instant::now();
        state.generation += 1;
        let generation = state.generation;

        let worker_inner = Arc::clone(inner);
        let spawned = thread::Builder::new()
            .name("mymusic-clock".to_string())
            .spawn(move || run_timing_loop(worker_inner, generation));
        match spawned {
            Ok(worker) => {
                // A previous worker detached by a stop from inside a callback exits on its own
                state.worker = Some(worker);
                log::debug!(
                    "Clock started at beat {:.3} ({})",
                    state.anchor_beat,
                    state.tempo
                );
                Ok(())
            }
            Err(e) => {
                state.running = false;
                Err(MidiError::Io(e))
            }
        }
    }

    /// Freezes beat-time; a no-op if already stopped
    ///
    /// Messages not yet due stay queued and fire after a later `start`, unless
    /// the clock was configured with `discard_pending_on_stop`.
    pub fn stop(&self) {
        let inner = self.inner();
        let (worker, discarded) = {
            let mut state = inner.lock();
            if !state.running {
                return;
            }
            state.anchor_beat = state.current_time();
            state.running = false;
            state.generation += 1;
            state.dispatch = None;
            let discarded = if inner.config.discard_pending_on_stop {
                std::mem::take(&mut state.queue)
            } else {
                BinaryHeap::new()
            };
            log::debug!(
                "Clock stopped at beat {:.3}, {} message(s) pending, {} discarded",
                state.anchor_beat,
                state.queue.len(),
                discarded.len()
            );
            (state.take_worker(), discarded)
        };
        inner.wake.notify_all();
        drop(discarded);
        join_worker(worker);
    }

    /// Rewinds to beat 0 and empties the queue; only legal while stopped
    pub fn reset(&self) -> Result<()> {
        let discarded = {
            let mut state = self.inner().lock();
            if state.running {
                return Err(MidiError::InvalidState(
                    "cannot reset a running clock".to_string(),
                ));
            }
            state.anchor_beat = 0.0;
            log::debug!("Clock reset, {} message(s) discarded", state.queue.len());
            std::mem::take(&mut state.queue)
        };
        drop(discarded);
        Ok(())
    }

    /// Queues `message` at its own time
    ///
    /// Fails with `InvalidSchedule` if that time is before the current
    /// beat-time. A sink or callback called by the timing thread may schedule
    /// at the due time of the message being sent.
    pub fn schedule(&self, message: Message) -> Result<()> {
        {
            let mut state = self.inner().lock();
            let floor = state.schedule_floor();
            if message.time() < floor {
                return Err(MidiError::InvalidSchedule {
                    requested: message.time(),
                    current: floor,
                });
            }
            log::trace!("Scheduled {}", message);
            state.push(message);
        }
        self.inner().wake.notify_all();
        Ok(())
    }

    /// Queues a copy of `message` due at `beat_time`
    pub fn schedule_at(&self, message: &Message, beat_time: f64) -> Result<()> {
        self.schedule(message.with_time(beat_time)?)
    }

    /// Queues copies of `messages` shifted `offset` beats later
    ///
    /// The batch is validated first: if any message would land in the past,
    /// nothing is queued.
    pub fn schedule_all(&self, messages: &[Message], offset: f64) -> Result<()> {
        if !offset.is_finite() {
            return Err(MidiError::InvalidArgument(format!(
                "offset must be finite, got {}",
                offset
            )));
        }
        let shifted = messages
            .iter()
            .map(|m| m.time_shifted(offset))
            .collect::<Result<Vec<Message>>>()?;
        {
            let mut state = self.inner().lock();
            let floor = state.schedule_floor();
            if let Some(early) = shifted.iter().find(|m| m.time() < floor) {
                return Err(MidiError::InvalidSchedule {
                    requested: early.time(),
                    current: floor,
                });
            }
            for message in shifted {
                state.push(message);
            }
        }
        self.inner().wake.notify_all();
        Ok(())
    }

    /// Removes every queued message matching `predicate`, returning how many
    pub fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Message) -> bool,
    {
        let removed = {
            let mut state = self.inner().lock();
            let entries = std::mem::take(&mut state.queue).into_vec();
            let (removed, kept): (Vec<Pending>, Vec<Pending>) =
                entries.into_iter().partition(|p| predicate(&p.message));
            state.queue = kept.into();
            removed
        };
        removed.len()
    }

    /// Removes every queued message
    pub fn clear(&self) {
        let discarded = std::mem::take(&mut self.inner().lock().queue);
        drop(discarded);
    }

    pub fn pending_len(&self) -> usize {
        self.inner().lock().queue.len()
    }
}

/// Body of the timing thread for one running interval
fn run_timing_loop(inner: Arc<ClockInner>, generation: u64) {
    let max_sleep = Duration::from_millis(inner.config.max_sleep_ms);
    let mut state = inner.lock();
    loop {
        if state.shutdown || !state.running || state.generation != generation {
            break;
        }

        let now = state.current_time();
        let due = state.queue.peek().is_some_and(|p| p.time <= now);
        if due {
            if let Some(pending) = state.queue.pop() {
                state.dispatch = Some((pending.time, thread::current().id()));
                let lateness = now - pending.time;
                if lateness > inner.config.late_warning_beats {
                    log::warn!(
                        "Clock dispatch late by {:.3} beats: {}",
                        lateness,
                        pending.message
                    );
                }
                drop(state);

                log::trace!("Dispatching {}", pending.message);
                let sent = panic::catch_unwind(AssertUnwindSafe(|| pending.message.send()));
                if sent.is_err() {
                    log::error!("Clock dispatch panicked: {}", pending.message);
                }
                drop(pending);

                state = inner.lock();
            }
            continue;
        }

        state.dispatch = None;
        let wait = match state.queue.peek() {
            Some(next) => state.tempo.duration_for(next.time - now).min(max_sleep),
            None => max_sleep,
        };
        state = match inner.wake.wait_timeout(state, wait) {
            Ok((state, _)) => state,
            Err(poisoned) => poisoned.into_inner().0,
        };
    }
    if state.generation == generation {
        state.dispatch = None;
    }
}
