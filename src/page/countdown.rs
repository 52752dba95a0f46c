use std::time::Duration;

/// What a one-second step of the countdown did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownStep {
    /// One second elapsed; the tick sound should play.
    Ticked,
    /// The countdown was already at zero and is now stopped.
    Expired,
    /// The countdown had stopped earlier.
    Idle,
}

/// The offer countdown, stepped once per second.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_secs: u32,
    running: bool,
}

impl Countdown {
    pub fn new(start: Duration) -> Self {
        Self {
            remaining_secs: u32::try_from(start.as_secs()).unwrap_or(u32::MAX),
            running: true,
        }
    }

    /// Advances by one second.
    ///
    /// Reaching zero still counts as a tick. Expiry is reported on the following step, so
    /// the display rests on `00:00` for a second before the countdown stops.
    pub fn step(&mut self) -> CountdownStep {
        if !self.running {
            return CountdownStep::Idle;
        }

        if self.remaining_secs == 0 {
            self.running = false;
            log::info!("Countdown finished");
            return CountdownStep::Expired;
        }

        self.remaining_secs -= 1;
        CountdownStep::Ticked
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    pub fn remaining(&self) -> Duration {
        Duration::from_secs(u64::from(self.remaining_secs))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
