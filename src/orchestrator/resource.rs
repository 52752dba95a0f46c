//! The playable resource seam between the orchestrator and a playback backend.

use thiserror::Error;

/// Reason a resource refused to start playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    /// Playback requires a prior user gesture.
    #[error("playback is not allowed before a user gesture")]
    NotAllowed,

    /// Any other playback failure.
    #[error("{0}")]
    Failed(String),
}

/// A single playable audio resource (one per channel).
///
/// `play` only reports whether the attempt was accepted; actual state changes arrive later
/// as [`ResourceSignal`](crate::orchestrator::ResourceSignal)s.
pub trait AudioResource {
    fn set_volume(&mut self, volume: f32);

    fn set_looping(&mut self, looping: bool);

    fn set_muted(&mut self, muted: bool);

    /// Attempts to start playback from the current position.
    fn play(&mut self) -> Result<(), PlayError>;

    fn pause(&mut self);

    /// Resets the playback position to the start.
    fn rewind(&mut self);
}

impl<R: AudioResource + ?Sized> AudioResource for Box<R> {
    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn set_looping(&mut self, looping: bool) {
        (**self).set_looping(looping)
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }

    fn play(&mut self) -> Result<(), PlayError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn rewind(&mut self) {
        (**self).rewind()
    }
}
