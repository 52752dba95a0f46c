//! Message definitions for communication between the page thread and the audio threads.
//!
//! This module defines the enums that serve as the wire format for messages passed through the
//! ring buffers between the page thread and the real-time audio thread, and for events sent back
//! from asset loader threads.

use std::sync::Arc;

use crate::orchestrator::{ChannelId, ResourceSignal};

#[derive(Debug, Clone)]
pub(crate) struct SampleBuffer {
    pub channels: usize,
    pub samples: Arc<[f32]>,
}

impl SampleBuffer {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }
}

/// Message that is emitted from the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AudioMessage {
    /// Playback of the channel started.
    Playing { channel: ChannelId },

    /// Playback of the channel was paused.
    Paused { channel: ChannelId },

    /// A non-looping channel reached the end of its sample.
    Ended { channel: ChannelId },
}

impl AudioMessage {
    pub fn into_signal(self) -> (ChannelId, ResourceSignal) {
        match self {
            AudioMessage::Playing { channel } => (channel, ResourceSignal::Playing),
            AudioMessage::Paused { channel } => (channel, ResourceSignal::Paused),
            AudioMessage::Ended { channel } => (channel, ResourceSignal::Ended),
        }
    }
}

/// Message that is emitted from the page side.
#[derive(Debug, Clone)]
pub(crate) enum ControlMessage {
    /// Publish a decoded sample into a channel slot.
    ///
    /// # Parameters
    /// * `channel` - Channel slot receiving the sample
    /// * `sample` - Pre-decoded immutable sample buffer (shared handle)
    LoadSample {
        channel: ChannelId,
        sample: SampleBuffer,
    },

    /// Start or resume playback from the current position.
    Play { channel: ChannelId },

    /// Pause playback, keeping the position.
    Pause { channel: ChannelId },

    /// Reset the playback position to the start.
    Rewind { channel: ChannelId },

    /// Set the channel volume (0.0 to 1.0).
    SetVolume { channel: ChannelId, volume: f32 },

    /// Enable or disable looping.
    SetLooping { channel: ChannelId, looping: bool },

    /// Mute or unmute the channel without pausing it.
    SetMuted { channel: ChannelId, muted: bool },
}

/// Events emitted from background asset loading.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoaderEvent {
    /// Loading started for the given channel.
    Started { channel: ChannelId },

    /// The sample was decoded and published to the audio thread.
    Success {
        channel: ChannelId,
        duration_sec: f32,
    },

    /// Loading failed.
    Error { channel: ChannelId, error: String },
}

impl LoaderEvent {
    /// Translates the event into the resource signals a browser media element would fire.
    pub fn into_signals(self) -> (ChannelId, Vec<ResourceSignal>) {
        match self {
            LoaderEvent::Started { channel } => (channel, vec![ResourceSignal::LoadStart]),
            LoaderEvent::Success { channel, .. } => (
                channel,
                vec![ResourceSignal::LoadedData, ResourceSignal::CanPlayThrough],
            ),
            LoaderEvent::Error { channel, error } => {
                (channel, vec![ResourceSignal::Failed(error)])
            }
        }
    }
}
