//! In-memory resource used by orchestrator and page tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::orchestrator::resource::{AudioResource, PlayError};

#[derive(Debug)]
pub struct FakeState {
    pub play_calls: usize,
    pub pause_calls: usize,
    pub rewind_calls: usize,
    pub volume: f32,
    pub looping: bool,
    pub muted: bool,
    pub paused: bool,
    pub position_s: f32,
    queued: VecDeque<Result<(), PlayError>>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            play_calls: 0,
            pause_calls: 0,
            rewind_calls: 0,
            volume: 1.0,
            looping: false,
            muted: false,
            paused: true,
            position_s: 0.0,
            queued: VecDeque::new(),
        }
    }
}

/// A resource whose clones share one call log.
#[derive(Debug, Clone, Default)]
pub struct FakeResource {
    state: Rc<RefCell<FakeState>>,
}

impl FakeResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next `play` call. Unqueued calls succeed.
    pub fn queue_play_result(&self, result: Result<(), PlayError>) {
        self.state.borrow_mut().queued.push_back(result);
    }

    /// Simulates playback progress.
    pub fn advance(&self, seconds: f32) {
        self.state.borrow_mut().position_s += seconds;
    }

    pub fn plays(&self) -> usize {
        self.state.borrow().play_calls
    }

    pub fn pauses(&self) -> usize {
        self.state.borrow().pause_calls
    }

    pub fn rewinds(&self) -> usize {
        self.state.borrow().rewind_calls
    }

    pub fn is_muted(&self) -> bool {
        self.state.borrow().muted
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn is_looping(&self) -> bool {
        self.state.borrow().looping
    }

    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    pub fn position(&self) -> f32 {
        self.state.borrow().position_s
    }
}

impl AudioResource for FakeResource {
    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().looping = looping;
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn play(&mut self) -> Result<(), PlayError> {
        let mut state = self.state.borrow_mut();
        state.play_calls += 1;
        let result = state.queued.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            state.paused = false;
        }
        result
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pause_calls += 1;
        state.paused = true;
    }

    fn rewind(&mut self) {
        let mut state = self.state.borrow_mut();
        state.rewind_calls += 1;
        state.position_s = 0.0;
    }
}

/// Three fake resources plus the handles tests inspect.
pub struct FakeChannels {
    pub background: FakeResource,
    pub tick: FakeResource,
    pub section: FakeResource,
}

impl FakeChannels {
    pub fn new() -> Self {
        Self {
            background: FakeResource::new(),
            tick: FakeResource::new(),
            section: FakeResource::new(),
        }
    }

    pub fn resources(&self) -> crate::orchestrator::ChannelResources<FakeResource> {
        crate::orchestrator::ChannelResources {
            background: Some(self.background.clone()),
            tick: Some(self.tick.clone()),
            section: Some(self.section.clone()),
        }
    }
}
