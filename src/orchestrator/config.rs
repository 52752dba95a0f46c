//! Orchestrator configuration: the channel table and the page-variant policies.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::orchestrator::channel::ChannelId;

/// Allowed background music volume.
pub const BACKGROUND_VOLUME_RANGE: RangeInclusive<f32> = 0.05..=0.15;

/// Allowed tick volume.
pub const TICK_VOLUME_RANGE: RangeInclusive<f32> = 0.08..=0.3;

/// Allowed section transition volume.
pub const SECTION_VOLUME_RANGE: RangeInclusive<f32> = 0.05..=0.2;

/// Delay before the timed autoplay retry of the classic page.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2_000);

/// Which channels the mute toggle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutePolicy {
    /// Mute silences every channel, tick and section included.
    AllChannels,
    /// Mute only silences the background music.
    BackgroundOnly,
    /// Mute silences background and section; the tick stays audible.
    KeepTickAudible,
}

impl MutePolicy {
    pub fn covers(self, channel: ChannelId) -> bool {
        match self {
            Self::AllChannels => true,
            Self::BackgroundOnly => channel == ChannelId::Background,
            Self::KeepTickAudible => channel != ChannelId::Tick,
        }
    }
}

/// How a rejected background autoplay is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry once on the next user interaction anywhere on the page.
    NextInteraction,
    /// Retry once after a fixed delay. A rejected retry is not rescheduled.
    AfterDelay(Duration),
}

/// Where the "consent previously granted" flag lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentPersistence {
    /// Consent lasts for the current session only.
    Session,
    /// Consent is persisted to a flag file and restored on the next visit.
    Persisted(PathBuf),
}

/// Fixed playback settings of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSettings {
    pub volume: f32,
    pub looping: bool,
}

/// One row of the channel configuration table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelEntry {
    pub volume: f32,
    pub looping: bool,
    /// Whether the mute toggle covers this channel.
    pub mute_member: bool,
}

/// Per-channel volume and loop settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTable {
    settings: [ChannelSettings; ChannelId::COUNT],
}

impl ChannelTable {
    /// Builds a table from the three volumes, clamping each into its channel's range.
    pub fn new(background: f32, tick: f32, section: f32) -> Self {
        let mut table = Self {
            settings: [
                ChannelSettings {
                    volume: *BACKGROUND_VOLUME_RANGE.start(),
                    looping: true,
                },
                ChannelSettings {
                    volume: *TICK_VOLUME_RANGE.start(),
                    looping: false,
                },
                ChannelSettings {
                    volume: *SECTION_VOLUME_RANGE.start(),
                    looping: false,
                },
            ],
        };
        table.set_volume(ChannelId::Background, background);
        table.set_volume(ChannelId::Tick, tick);
        table.set_volume(ChannelId::Section, section);
        table
    }

    pub fn get(&self, channel: ChannelId) -> ChannelSettings {
        self.settings[channel.index()]
    }

    /// Sets a channel volume. Non-finite values are ignored; others are clamped.
    pub fn set_volume(&mut self, channel: ChannelId, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let range = volume_range(channel);
        self.settings[channel.index()].volume = volume.clamp(*range.start(), *range.end());
    }
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new(0.15, 0.08, 0.05)
    }
}

/// Volume range allowed for a channel.
pub fn volume_range(channel: ChannelId) -> RangeInclusive<f32> {
    match channel {
        ChannelId::Background => BACKGROUND_VOLUME_RANGE,
        ChannelId::Tick => TICK_VOLUME_RANGE,
        ChannelId::Section => SECTION_VOLUME_RANGE,
    }
}

/// Complete orchestrator configuration, selected per page variant.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub channels: ChannelTable,
    pub mute_policy: MutePolicy,
    pub retry_policy: RetryPolicy,
    pub consent: ConsentPersistence,
}

impl OrchestratorConfig {
    /// The original page: mute covers everything, a rejected start is retried after 2 s.
    pub fn classic() -> Self {
        Self {
            channels: ChannelTable::default(),
            mute_policy: MutePolicy::AllChannels,
            retry_policy: RetryPolicy::AfterDelay(DEFAULT_RETRY_DELAY),
            consent: ConsentPersistence::Session,
        }
    }

    /// Variant where the countdown tick is audible even while muted.
    pub fn tick_always_on() -> Self {
        Self {
            channels: ChannelTable::new(0.1, 0.3, 0.2),
            mute_policy: MutePolicy::KeepTickAudible,
            retry_policy: RetryPolicy::NextInteraction,
            consent: ConsentPersistence::Session,
        }
    }

    /// Variant that remembers consent so returning visitors skip the banner.
    pub fn returning_visitor(consent_flag: impl Into<PathBuf>) -> Self {
        Self {
            channels: ChannelTable::new(0.05, 0.15, 0.1),
            mute_policy: MutePolicy::BackgroundOnly,
            retry_policy: RetryPolicy::NextInteraction,
            consent: ConsentPersistence::Persisted(consent_flag.into()),
        }
    }

    pub fn with_mute_policy(mut self, policy: MutePolicy) -> Self {
        self.mute_policy = policy;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_consent(mut self, consent: ConsentPersistence) -> Self {
        self.consent = consent;
        self
    }

    pub fn entry(&self, channel: ChannelId) -> ChannelEntry {
        let settings = self.channels.get(channel);
        ChannelEntry {
            volume: settings.volume,
            looping: settings.looping,
            mute_member: self.mute_policy.covers(channel),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::classic()
    }
}
