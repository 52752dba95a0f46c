//! Audio Orchestrator Module
//!
//! Consent-gated playback of the page's three audio channels. It is organized into
//! sub-modules, each with a specific responsibility:
//!
//! - [`channel`]: channel identifiers, resource signals and per-channel state
//! - [`config`]: the channel table and the page-variant policies
//! - [`consent`]: storage for the persisted consent flag
//! - [`errors`]: orchestrator error taxonomy
//! - [`resource`]: the [`AudioResource`] trait implemented by playback backends
//! - [`status`]: status strings for the transient readout
//!
//! The main [`AudioOrchestrator`] owns the channels and the consent gate. Collaborators
//! (countdown, section observer, consent banner) call into it fire-and-forget; playback
//! failures are logged and never propagated to them.

use std::time::Duration;

use crate::orchestrator::channel::{AudioChannel, SignalEffect};
use crate::orchestrator::consent::ConsentStore;
use crate::orchestrator::resource::PlayError;

pub mod channel;
pub mod config;
pub mod consent;
pub mod errors;
pub mod resource;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{ChannelId, ResourceSignal};
pub use config::{
    ChannelEntry, ChannelSettings, ChannelTable, ConsentPersistence, MutePolicy,
    OrchestratorConfig, RetryPolicy,
};
pub use consent::{FileConsentStore, SessionConsent};
pub use errors::{AudioError, ConsentStoreError};
pub use resource::AudioResource;
pub use status::{StatusKind, StatusUpdate};

/// Result of a background music start attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundOutcome {
    /// Music is playing (or already was).
    Started,
    /// Consent is missing or the background channel is not ready.
    Blocked,
    /// The platform refused or failed the attempt.
    Failed,
}

/// A single armed retry of the background start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    /// Generation of the arming; a re-arm gets a new id and replaces the old retry.
    pub id: u64,
    pub trigger: RetryPolicy,
}

/// The resources backing each channel. `None` marks a missing asset.
pub struct ChannelResources<R> {
    pub background: Option<R>,
    pub tick: Option<R>,
    pub section: Option<R>,
}

impl<R> ChannelResources<R> {
    pub fn empty() -> Self {
        Self {
            background: None,
            tick: None,
            section: None,
        }
    }

    fn into_array(self) -> [Option<R>; ChannelId::COUNT] {
        [self.background, self.tick, self.section]
    }
}

/// Snapshot of one channel for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDebug {
    pub present: bool,
    pub ready: bool,
    pub muted: bool,
}

/// Snapshot of the orchestrator for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    pub consent_granted: bool,
    pub muted: bool,
    pub background_playing: bool,
    pub all_ready: bool,
    pub pending_retry: Option<PendingRetry>,
    pub channels: [ChannelDebug; ChannelId::COUNT],
}

/// Owns the audio channels and the consent gate of one page instance.
pub struct AudioOrchestrator<R: AudioResource> {
    config: OrchestratorConfig,
    consent_store: Box<dyn ConsentStore>,
    consent_granted: bool,
    channels: [Option<AudioChannel<R>>; ChannelId::COUNT],
    muted: bool,
    background_playing: bool,
    all_ready: bool,
    start_when_ready: bool,
    last_outcome: Option<BackgroundOutcome>,
    pending_retry: Option<PendingRetry>,
    retry_generation: u64,
    scheduled_retry: Option<(u64, Duration)>,
    firing_delayed_retry: bool,
    status_updates: Vec<StatusUpdate>,
}

impl<R: AudioResource> AudioOrchestrator<R> {
    /// Registers the channel resources and restores a previously granted consent.
    pub fn new(config: OrchestratorConfig, resources: ChannelResources<R>) -> Self {
        let consent_store = config.consent.open_store();
        Self::with_consent_store(config, resources, consent_store)
    }

    pub fn with_consent_store(
        config: OrchestratorConfig,
        resources: ChannelResources<R>,
        consent_store: Box<dyn ConsentStore>,
    ) -> Self {
        let consent_granted = match consent_store.load() {
            Ok(granted) => granted,
            Err(err) => {
                log::warn!("Could not read consent flag, assuming not granted: {err}");
                false
            }
        };

        let mut slots = resources.into_array().into_iter();
        let channels = std::array::from_fn(|index| {
            let channel = ChannelId::ALL[index];
            match slots.next().flatten() {
                Some(resource) => Some(AudioChannel::new(resource, config.channels.get(channel))),
                None => {
                    log::warn!("{}", AudioError::ResourceMissing(channel));
                    None
                }
            }
        });

        let mut orchestrator = Self {
            config,
            consent_store,
            consent_granted,
            channels,
            muted: false,
            background_playing: false,
            all_ready: false,
            start_when_ready: consent_granted,
            last_outcome: None,
            pending_retry: None,
            retry_generation: 0,
            scheduled_retry: None,
            firing_delayed_retry: false,
            status_updates: Vec::new(),
        };

        if consent_granted {
            log::info!("Consent restored from a previous visit");
        } else {
            orchestrator.publish("Waiting for cookie consent...", StatusKind::Loading);
        }
        log::info!(
            "AudioOrchestrator initialized (mute policy {:?}, retry policy {:?})",
            orchestrator.config.mute_policy,
            orchestrator.config.retry_policy
        );

        orchestrator
    }

    /// Unlocks playback for the session and tries to start the background music.
    ///
    /// Calling it again after consent was granted is a no-op.
    pub fn grant_consent(&mut self) {
        if self.consent_granted {
            return;
        }

        self.consent_granted = true;
        log::info!("Cookies accepted, starting audio");
        if let Err(err) = self.consent_store.save() {
            log::warn!("Could not persist consent flag: {err}");
        }
        self.publish("Initializing audio...", StatusKind::Loading);
        self.start_background();
    }

    /// Attempts to start the background music.
    pub fn start_background(&mut self) -> BackgroundOutcome {
        let outcome = self.try_start_background();
        self.last_outcome = Some(outcome);
        outcome
    }

    fn try_start_background(&mut self) -> BackgroundOutcome {
        if !self.consent_granted {
            log::debug!("Background music blocked: no consent yet");
            return BackgroundOutcome::Blocked;
        }

        let Some(channel) = self.channels[ChannelId::Background.index()].as_mut() else {
            return BackgroundOutcome::Blocked;
        };

        if !channel.ready {
            log::warn!("Background music is not ready yet");
            self.start_when_ready = true;
            return BackgroundOutcome::Blocked;
        }

        if self.background_playing {
            return BackgroundOutcome::Started;
        }

        match channel.resource.play() {
            Ok(()) => {
                log::info!("Background music started");
                self.background_playing = true;
                self.start_when_ready = false;
                self.clear_retry();
                BackgroundOutcome::Started
            }
            Err(err) => {
                let rejected = matches!(err, PlayError::NotAllowed);
                log::error!("{}", AudioError::from_play(ChannelId::Background, err));
                self.publish("Playback error", StatusKind::Error);
                // A delayed retry is the last attempt; it never re-arms itself.
                if rejected && !self.firing_delayed_retry {
                    self.arm_retry();
                }
                BackgroundOutcome::Failed
            }
        }
    }

    fn arm_retry(&mut self) {
        self.retry_generation += 1;
        let retry = PendingRetry {
            id: self.retry_generation,
            trigger: self.config.retry_policy,
        };
        self.scheduled_retry = match retry.trigger {
            RetryPolicy::AfterDelay(delay) => Some((retry.id, delay)),
            RetryPolicy::NextInteraction => None,
        };
        log::debug!("Armed background retry {retry:?}");
        self.pending_retry = Some(retry);
    }

    fn clear_retry(&mut self) {
        self.pending_retry = None;
        self.scheduled_retry = None;
    }

    /// Feeds a user interaction (click, key press) anywhere on the page.
    ///
    /// Fires the pending retry when it is bound to the next interaction.
    pub fn on_user_interaction(&mut self) -> Option<BackgroundOutcome> {
        match self.pending_retry {
            Some(PendingRetry {
                trigger: RetryPolicy::NextInteraction,
                ..
            }) => {
                self.pending_retry = None;
                log::info!("Retrying background music after user interaction");
                Some(self.start_background())
            }
            _ => None,
        }
    }

    /// Fires a delayed retry. Stale or replaced retries are ignored.
    pub fn fire_retry(&mut self, id: u64) -> Option<BackgroundOutcome> {
        match self.pending_retry {
            Some(retry) if retry.id == id => {
                self.pending_retry = None;
                log::info!("Retrying background music");
                self.firing_delayed_retry = true;
                let outcome = self.start_background();
                self.firing_delayed_retry = false;
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Takes a newly armed delayed retry that still needs a timer.
    pub fn take_scheduled_retry(&mut self) -> Option<(u64, Duration)> {
        self.scheduled_retry.take()
    }

    /// Plays the countdown tick.
    pub fn play_tick(&mut self) {
        self.play_effect(ChannelId::Tick);
    }

    /// Plays the section-change sound.
    pub fn play_section_transition(&mut self) {
        self.play_effect(ChannelId::Section);
    }

    fn play_effect(&mut self, id: ChannelId) {
        if !self.consent_granted {
            return;
        }

        let Some(channel) = self.channels[id.index()].as_mut() else {
            return;
        };

        if channel.muted {
            return;
        }

        channel.resource.rewind();
        if let Err(err) = channel.resource.play() {
            log::warn!("{}", AudioError::from_play(id, err));
        }
    }

    /// Flips mute on the channels covered by the mute policy and returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;

        for id in ChannelId::ALL {
            if !self.config.mute_policy.covers(id) {
                continue;
            }
            if let Some(channel) = self.channels[id.index()].as_mut() {
                channel.muted = self.muted;
                channel.resource.set_muted(self.muted);
            }
        }

        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        if self.muted {
            self.publish("Audio muted", StatusKind::Error);
        } else {
            self.publish("Audio active", StatusKind::Playing);
            if self.background_eligible() && !self.background_playing {
                self.start_background();
            }
        }

        self.muted
    }

    fn background_eligible(&self) -> bool {
        self.consent_granted
            && self.channels[ChannelId::Background.index()]
                .as_ref()
                .is_some_and(|channel| channel.ready)
    }

    /// Pauses the background music from outside, e.g. when the countdown expires.
    pub fn pause_background(&mut self) {
        if let Some(channel) = self.channels[ChannelId::Background.index()].as_mut() {
            channel.resource.pause();
            log::info!("Background music paused");
        }
        self.background_playing = false;
        self.start_when_ready = false;
        self.clear_retry();
    }

    /// Pauses and rewinds every channel. Used once, at page teardown.
    pub fn stop_all(&mut self) {
        for channel in self.channels.iter_mut().flatten() {
            channel.resource.pause();
            channel.resource.rewind();
        }
        self.background_playing = false;
        self.start_when_ready = false;
        self.clear_retry();
        log::info!("All audio stopped");
    }

    /// Dispatches a resource signal into the channel's state.
    pub fn handle_signal(&mut self, id: ChannelId, signal: ResourceSignal) {
        let Some(channel) = self.channels[id.index()].as_mut() else {
            log::debug!("Ignoring {signal:?} for missing channel {id}");
            return;
        };

        match signal.effect() {
            SignalEffect::Loading => {
                log::debug!("{id}: loading started");
                self.publish(format!("Loading {id}..."), StatusKind::Loading);
            }
            SignalEffect::Ready => {
                log::debug!("{id}: can play ({signal:?})");
                channel.ready = true;
                self.check_all_ready();
                if id == ChannelId::Background && self.start_when_ready {
                    self.start_background();
                }
            }
            SignalEffect::Started => {
                log::debug!("{id}: playing");
                if id == ChannelId::Background {
                    self.background_playing = true;
                    self.clear_retry();
                    self.publish("Music playing", StatusKind::Playing);
                }
            }
            SignalEffect::Stopped => {
                log::debug!("{id}: paused");
                if id == ChannelId::Background {
                    self.background_playing = false;
                }
            }
            SignalEffect::Failed(reason) => {
                log::error!("{id}: {reason}");
                channel.ready = false;
                if id == ChannelId::Background {
                    self.background_playing = false;
                }
                self.publish(format!("Error in {id}"), StatusKind::Error);
            }
            SignalEffect::LogOnly => match signal {
                ResourceSignal::Stalled => log::warn!("{id}: loading stalled"),
                other => log::debug!("{id}: {other:?}"),
            },
        }
    }

    fn check_all_ready(&mut self) {
        if self.all_ready {
            return;
        }
        let all_ready = self
            .channels
            .iter()
            .all(|slot| slot.as_ref().is_some_and(|channel| channel.ready));
        if all_ready {
            self.all_ready = true;
            log::info!("All audio channels are ready");
            self.publish("Audio ready!", StatusKind::Playing);
        }
    }

    fn publish(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status_updates.push(StatusUpdate::new(message, kind));
    }

    /// Drains the status updates published since the last call.
    pub fn take_status_updates(&mut self) -> Vec<StatusUpdate> {
        std::mem::take(&mut self.status_updates)
    }

    pub fn consent_granted(&self) -> bool {
        self.consent_granted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn background_playing(&self) -> bool {
        self.background_playing
    }

    /// Outcome of the most recent background start attempt.
    pub fn background_outcome(&self) -> Option<BackgroundOutcome> {
        self.last_outcome
    }

    pub fn pending_retry(&self) -> Option<PendingRetry> {
        self.pending_retry
    }

    pub fn all_ready(&self) -> bool {
        self.all_ready
    }

    pub fn has_channel(&self, id: ChannelId) -> bool {
        self.channels[id.index()].is_some()
    }

    pub fn is_ready(&self, id: ChannelId) -> bool {
        self.channels[id.index()]
            .as_ref()
            .is_some_and(|channel| channel.ready)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            consent_granted: self.consent_granted,
            muted: self.muted,
            background_playing: self.background_playing,
            all_ready: self.all_ready,
            pending_retry: self.pending_retry,
            channels: std::array::from_fn(|index| match &self.channels[index] {
                Some(channel) => ChannelDebug {
                    present: true,
                    ready: channel.ready,
                    muted: channel.muted,
                },
                None => ChannelDebug {
                    present: false,
                    ready: false,
                    muted: false,
                },
            }),
        }
    }
}
