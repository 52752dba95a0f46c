//! Real-time audio mixer implementation.
//!
//! This module provides the [`RtMixer`] struct which mixes the page's audio channels on the
//! audio thread. Each channel owns one [`VoiceSlot`](crate::audio_engine::voice_slot::VoiceSlot)
//! holding a [`SampleBuffer`](crate::messages::SampleBuffer) loaded via
//! [`decode_audio_file_to_sample_buffer`](crate::audio_engine::sample_loader::decode_audio_file_to_sample_buffer).

use cpal::Sample;

use crate::audio_engine::voice_slot::VoiceSlot;
use crate::messages::{AudioMessage, ControlMessage, SampleBuffer};
use crate::orchestrator::ChannelId;

/// Real-time mixer with one slot per page channel.
///
/// All operations are allocation-free and real-time safe.
pub struct RtMixer {
    /// Number of output channels (1 for mono, 2 for stereo).
    channels: usize,

    slots: [VoiceSlot; ChannelId::COUNT],
}

impl RtMixer {
    /// Creates a new RtMixer with the specified number of output channels.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            slots: std::array::from_fn(|_| VoiceSlot::default()),
        }
    }

    /// Applies a control message. Returns the state change to report, if any.
    pub fn apply(&mut self, message: ControlMessage) -> Option<AudioMessage> {
        match message {
            ControlMessage::LoadSample { channel, sample } => {
                self.load_sample(channel, sample);
                None
            }
            ControlMessage::Play { channel } => self.play(channel),
            ControlMessage::Pause { channel } => self.pause(channel),
            ControlMessage::Rewind { channel } => {
                self.slot_mut(channel).rewind();
                None
            }
            ControlMessage::SetVolume { channel, volume } => {
                self.slot_mut(channel).set_volume(volume);
                None
            }
            ControlMessage::SetLooping { channel, looping } => {
                self.slot_mut(channel).looping = looping;
                None
            }
            ControlMessage::SetMuted { channel, muted } => {
                self.slot_mut(channel).muted = muted;
                None
            }
        }
    }

    /// Loads a sample into a channel slot.
    ///
    /// Samples whose channel count differs from the mixer's are ignored.
    pub fn load_sample(&mut self, channel: ChannelId, sample: SampleBuffer) {
        if sample.channels != self.channels {
            return;
        }
        self.slot_mut(channel).load(sample);
    }

    pub fn play(&mut self, channel: ChannelId) -> Option<AudioMessage> {
        self.slot_mut(channel)
            .start()
            .then_some(AudioMessage::Playing { channel })
    }

    pub fn pause(&mut self, channel: ChannelId) -> Option<AudioMessage> {
        self.slot_mut(channel)
            .pause()
            .then_some(AudioMessage::Paused { channel })
    }

    /// Renders audio frames to the output buffer.
    ///
    /// Returns, per channel, whether a non-looping sample ended during this block.
    pub fn render(&mut self, output: &mut [f32]) -> [bool; ChannelId::COUNT] {
        output.fill(Sample::EQUILIBRIUM);

        let mut ended = [false; ChannelId::COUNT];
        for (index, slot) in self.slots.iter_mut().enumerate() {
            ended[index] = slot.mix_into(output, self.channels);
        }
        ended
    }

    pub fn is_playing(&self, channel: ChannelId) -> bool {
        self.slots[channel.index()].playing
    }

    /// Gets the number of channels configured for this mixer.
    pub fn channels(&self) -> usize {
        self.channels
    }

    fn slot_mut(&mut self, channel: ChannelId) -> &mut VoiceSlot {
        &mut self.slots[channel.index()]
    }
}
