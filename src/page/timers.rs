//! Deterministic timer queue driven by the page clock.
//!
//! Time is a [`Duration`] since page load. Nothing fires on its own; the owner calls
//! [`TimerQueue::pop_due`] with the current time and handles what comes out.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer taken off the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// When the timer was due, which may be earlier than the time passed to `pop_due`.
    pub due: Duration,
    pub event: E,
}

#[derive(Debug)]
struct Timer<E> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// One-shot and repeating timers, fired in due order (ties in scheduling order).
#[derive(Debug)]
pub struct TimerQueue<E> {
    timers: Vec<Timer<E>>,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `event` once, `delay` after `now`.
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, event: E) -> TimerId {
        self.insert(now + delay, None, event)
    }

    /// Fires `event` every `period`, first at `now + period`.
    ///
    /// A zero period would fire forever within a single `pop_due` loop, so it is bumped to
    /// one millisecond.
    pub fn schedule_every(&mut self, now: Duration, period: Duration, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, Some(period), event)
    }

    fn insert(&mut self, due: Duration, period: Option<Duration>, event: E) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            due,
            period,
            event,
        });
        id
    }

    /// Cancels a timer. Returns `false` if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    /// Due time of the earliest timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Removes and returns the earliest timer due at `now`. Repeating timers are
    /// rescheduled one period after their due time.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<E>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index)?;

        match self.timers[index].period {
            Some(period) => {
                let timer = &mut self.timers[index];
                let fired = Fired {
                    id: timer.id,
                    due: timer.due,
                    event: timer.event.clone(),
                };
                timer.due += period;
                Some(fired)
            }
            None => {
                let timer = self.timers.remove(index);
                Some(Fired {
                    id: timer.id,
                    due: timer.due,
                    event: timer.event,
                })
            }
        }
    }
}
