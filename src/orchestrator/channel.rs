//! Channel identifiers, per-channel state and the resource signal mapping.

use std::fmt;

use crate::orchestrator::config::ChannelSettings;
use crate::orchestrator::resource::AudioResource;

/// One of the three independently controlled audio sources on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Looping background music.
    Background,
    /// Countdown tick, once per second.
    Tick,
    /// Section-change transition effect.
    Section,
}

impl ChannelId {
    /// Number of channels.
    pub const COUNT: usize = 3;

    /// Every channel, in slot order.
    pub const ALL: [ChannelId; Self::COUNT] =
        [ChannelId::Background, ChannelId::Tick, ChannelId::Section];

    /// Slot index of the channel.
    pub fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Tick => 1,
            Self::Section => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Asset/element name used in logs and status messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "bg-music",
            Self::Tick => "tick-sound",
            Self::Section => "section-sound",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State signals reported by an audio resource.
///
/// Every signal has a defined [`SignalEffect`], including "log only".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSignal {
    /// Loading of the asset started.
    LoadStart,
    /// The first frame of audio data is available.
    LoadedData,
    /// Enough data is buffered to begin playback.
    CanPlay,
    /// The whole asset is buffered.
    CanPlayThrough,
    /// Playback is running.
    Playing,
    /// Playback was paused.
    Paused,
    /// A non-looping resource reached its end.
    Ended,
    /// The resource failed to load or play.
    Failed(String),
    /// Loading stopped making progress.
    Stalled,
    /// Playback is waiting for more data.
    Waiting,
}

/// Effect a [`ResourceSignal`] has on the owning channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SignalEffect {
    Loading,
    Ready,
    Started,
    Stopped,
    Failed(String),
    LogOnly,
}

impl ResourceSignal {
    pub(crate) fn effect(&self) -> SignalEffect {
        match self {
            Self::LoadStart => SignalEffect::Loading,
            Self::CanPlay | Self::CanPlayThrough => SignalEffect::Ready,
            Self::Playing => SignalEffect::Started,
            Self::Paused => SignalEffect::Stopped,
            Self::Failed(reason) => SignalEffect::Failed(reason.clone()),
            Self::LoadedData | Self::Ended | Self::Stalled | Self::Waiting => SignalEffect::LogOnly,
        }
    }
}

/// A registered channel: its resource plus readiness and mute flags.
pub(crate) struct AudioChannel<R> {
    pub resource: R,
    pub ready: bool,
    pub muted: bool,
}

impl<R: AudioResource> AudioChannel<R> {
    /// Applies the fixed settings to the resource and wraps it.
    pub fn new(mut resource: R, settings: ChannelSettings) -> Self {
        resource.set_volume(settings.volume);
        resource.set_looping(settings.looping);
        Self {
            resource,
            ready: false,
            muted: false,
        }
    }
}
