//! [`AudioResource`] implementation backed by the real-time mixer.

use rtrb::Producer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::messages::ControlMessage;
use crate::orchestrator::ChannelId;
use crate::orchestrator::resource::{AudioResource, PlayError};

/// Whether playback may start before the user interacted with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayPolicy {
    /// `play()` is rejected until a user gesture was registered, like a browser.
    #[default]
    GestureRequired,
    /// Playback may start at any time.
    Allowed,
}

/// Shared flag recording that the user interacted with the page.
#[derive(Debug, Clone, Default)]
pub struct GestureGate(Arc<AtomicBool>);

impl GestureGate {
    pub fn register(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn has_gesture(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle to one mixer channel.
pub struct EngineChannel {
    channel: ChannelId,
    producer: Arc<Mutex<Producer<ControlMessage>>>,
    autoplay: AutoplayPolicy,
    gesture: GestureGate,
}

impl EngineChannel {
    pub(crate) fn new(
        channel: ChannelId,
        producer: Arc<Mutex<Producer<ControlMessage>>>,
        autoplay: AutoplayPolicy,
        gesture: GestureGate,
    ) -> Self {
        Self {
            channel,
            producer,
            autoplay,
            gesture,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    fn send(&self, message: ControlMessage) -> Result<(), String> {
        let mut producer_guard = self
            .producer
            .lock()
            .map_err(|_| "Failed to acquire producer lock".to_string())?;

        producer_guard
            .push(message)
            .map_err(|_| "Failed to send control message - buffer may be full".to_string())
    }

    fn send_or_warn(&self, message: ControlMessage) {
        if let Err(err) = self.send(message) {
            log::warn!("{}: {err}", self.channel);
        }
    }
}

impl AudioResource for EngineChannel {
    fn set_volume(&mut self, volume: f32) {
        self.send_or_warn(ControlMessage::SetVolume {
            channel: self.channel,
            volume,
        });
    }

    fn set_looping(&mut self, looping: bool) {
        self.send_or_warn(ControlMessage::SetLooping {
            channel: self.channel,
            looping,
        });
    }

    fn set_muted(&mut self, muted: bool) {
        self.send_or_warn(ControlMessage::SetMuted {
            channel: self.channel,
            muted,
        });
    }

    fn play(&mut self) -> Result<(), PlayError> {
        if self.autoplay == AutoplayPolicy::GestureRequired && !self.gesture.has_gesture() {
            return Err(PlayError::NotAllowed);
        }

        self.send(ControlMessage::Play {
            channel: self.channel,
        })
        .map_err(PlayError::Failed)
    }

    fn pause(&mut self) {
        self.send_or_warn(ControlMessage::Pause {
            channel: self.channel,
        });
    }

    fn rewind(&mut self) {
        self.send_or_warn(ControlMessage::Rewind {
            channel: self.channel,
        });
    }
}

#[cfg(test)]
mod tests {
    use rtrb::RingBuffer;

    use super::*;

    fn channel_with_ring(
        autoplay: AutoplayPolicy,
        capacity: usize,
    ) -> (EngineChannel, rtrb::Consumer<ControlMessage>, GestureGate) {
        let (producer, consumer) = RingBuffer::new(capacity);
        let gesture = GestureGate::default();
        let channel = EngineChannel::new(
            ChannelId::Background,
            Arc::new(Mutex::new(producer)),
            autoplay,
            gesture.clone(),
        );
        (channel, consumer, gesture)
    }

    #[test]
    fn test_play_rejected_before_gesture() {
        let (mut channel, mut consumer, gesture) =
            channel_with_ring(AutoplayPolicy::GestureRequired, 8);

        assert_eq!(channel.play(), Err(PlayError::NotAllowed));
        assert!(consumer.pop().is_err());

        gesture.register();
        assert_eq!(channel.play(), Ok(()));
        assert!(matches!(
            consumer.pop(),
            Ok(ControlMessage::Play {
                channel: ChannelId::Background
            })
        ));
    }

    #[test]
    fn test_play_allowed_policy_skips_gesture() {
        let (mut channel, mut consumer, _) = channel_with_ring(AutoplayPolicy::Allowed, 8);
        assert_eq!(channel.play(), Ok(()));
        assert!(consumer.pop().is_ok());
    }

    #[test]
    fn test_full_ring_fails_play() {
        let (mut channel, _consumer, _) = channel_with_ring(AutoplayPolicy::Allowed, 1);
        channel.rewind();

        assert!(matches!(channel.play(), Err(PlayError::Failed(_))));
    }

    #[test]
    fn test_settings_are_forwarded() {
        let (mut channel, mut consumer, _) = channel_with_ring(AutoplayPolicy::Allowed, 8);
        channel.set_volume(0.15);
        channel.set_looping(true);
        channel.set_muted(true);

        assert!(matches!(
            consumer.pop(),
            Ok(ControlMessage::SetVolume { volume, .. }) if (volume - 0.15).abs() < f32::EPSILON
        ));
        assert!(matches!(
            consumer.pop(),
            Ok(ControlMessage::SetLooping { looping: true, .. })
        ));
        assert!(matches!(
            consumer.pop(),
            Ok(ControlMessage::SetMuted { muted: true, .. })
        ));
    }
}
