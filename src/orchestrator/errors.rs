//! Orchestrator error types.
//!
//! None of these are fatal: the orchestrator logs them and keeps the rest of the page running.

use thiserror::Error;

use crate::orchestrator::channel::ChannelId;
use crate::orchestrator::resource::PlayError;

/// Audio failures handled locally by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The channel's resource was absent at init; the channel is a permanent no-op.
    #[error("audio resource {0} not found")]
    ResourceMissing(ChannelId),

    /// The platform refused playback without a prior user gesture.
    #[error("autoplay rejected for {channel}: {reason}")]
    AutoplayRejected { channel: ChannelId, reason: String },

    /// Any other runtime playback error.
    #[error("playback failed for {channel}: {reason}")]
    PlaybackFailed { channel: ChannelId, reason: String },
}

impl AudioError {
    pub fn from_play(channel: ChannelId, error: PlayError) -> Self {
        match error {
            PlayError::NotAllowed => Self::AutoplayRejected {
                channel,
                reason: error.to_string(),
            },
            PlayError::Failed(reason) => Self::PlaybackFailed { channel, reason },
        }
    }

    /// Whether the failure can be recovered by retrying after a user gesture.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AutoplayRejected { .. })
    }
}

/// Errors reading or writing the persisted consent flag.
#[derive(Debug, Error)]
pub enum ConsentStoreError {
    #[error("failed to access consent flag: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_play_classifies_rejection() {
        let err = AudioError::from_play(ChannelId::Background, PlayError::NotAllowed);
        assert!(err.is_recoverable());
        assert!(matches!(err, AudioError::AutoplayRejected { .. }));

        let err = AudioError::from_play(ChannelId::Tick, PlayError::Failed("device lost".into()));
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "playback failed for tick-sound: device lost");
    }

    #[test]
    fn test_missing_message() {
        assert_eq!(
            AudioError::ResourceMissing(ChannelId::Section).to_string(),
            "audio resource section-sound not found"
        );
    }
}
