use std::time::Duration;

use crate::page::timers::{TimerId, TimerQueue};

/// Leading-edge throttle with a trailing call.
///
/// A call more than `delay` after the last execution runs immediately. A call inside the
/// window replaces any pending trailing call with one scheduled for the rest of the window.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    last_run: Option<Duration>,
    trailing: Option<TimerId>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_run: None,
            trailing: None,
        }
    }

    /// Returns `true` when the caller should run the throttled action now. Otherwise
    /// `trailing_event` is scheduled on `timers`.
    pub fn call<E: Clone>(
        &mut self,
        now: Duration,
        timers: &mut TimerQueue<E>,
        trailing_event: E,
    ) -> bool {
        let elapsed = self.last_run.map(|last| now.saturating_sub(last));
        match elapsed {
            Some(elapsed) if elapsed <= self.delay => {
                if let Some(id) = self.trailing.take() {
                    timers.cancel(id);
                }
                let remaining = self.delay - elapsed;
                self.trailing = Some(timers.schedule_once(now, remaining, trailing_event));
                false
            }
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }

    /// Records that the trailing call fired at `now`; the caller runs the action.
    pub fn trailing_fired(&mut self, now: Duration) {
        self.trailing = None;
        self.last_run = Some(now);
    }

    pub fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }
}
