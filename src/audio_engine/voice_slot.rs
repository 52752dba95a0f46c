//! Per-channel playback state on the audio thread.

use crate::audio_engine::constants::{VOLUME_MAX, VOLUME_MIN};
use crate::messages::SampleBuffer;

/// Playback state of one channel: its sample, position and mix settings.
#[derive(Debug)]
pub struct VoiceSlot {
    pub sample: Option<SampleBuffer>,
    /// Current playback position in frames.
    pub frame_pos: usize,
    pub volume: f32,
    pub looping: bool,
    pub muted: bool,
    pub playing: bool,
}

impl Default for VoiceSlot {
    fn default() -> Self {
        Self {
            sample: None,
            frame_pos: 0,
            volume: VOLUME_MAX,
            looping: false,
            muted: false,
            playing: false,
        }
    }
}

impl VoiceSlot {
    pub fn load(&mut self, sample: SampleBuffer) {
        self.sample = Some(sample);
        self.frame_pos = 0;
        self.playing = false;
    }

    /// Starts playback. Returns `false` when there is nothing to play or it already plays.
    pub fn start(&mut self) -> bool {
        let Some(sample) = self.sample.as_ref() else {
            return false;
        };
        if self.playing {
            return false;
        }
        // An ended sample restarts from the top, like a media element.
        if self.frame_pos >= sample.frames() {
            self.frame_pos = 0;
        }
        self.playing = true;
        true
    }

    /// Pause playback: clears the playing flag. Does not change frame_pos.
    /// Returns `true` when the slot was playing.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    pub fn rewind(&mut self) {
        self.frame_pos = 0;
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
            return;
        }
        self.volume = volume;
    }

    /// Mixes this slot into `output` and advances the position.
    ///
    /// Returns `true` when a non-looping sample reached its end during this block.
    pub fn mix_into(&mut self, output: &mut [f32], channels: usize) -> bool {
        if !self.playing || channels == 0 {
            return false;
        }

        let Some(sample) = self.sample.as_ref() else {
            self.playing = false;
            return false;
        };

        let sample_frames = sample.frames();
        if sample_frames == 0 || sample.channels != channels {
            self.playing = false;
            return false;
        }

        let gain = if self.muted { 0.0 } else { self.volume };
        let frames = output.len() / channels;
        for frame in 0..frames {
            if self.frame_pos >= sample_frames {
                if self.looping {
                    self.frame_pos = 0;
                } else {
                    self.playing = false;
                    return true;
                }
            }

            let src = self.frame_pos * channels;
            let dst = frame * channels;
            for channel in 0..channels {
                output[dst + channel] += sample.samples[src + channel] * gain;
            }
            self.frame_pos += 1;
        }

        if !self.looping && self.frame_pos >= sample_frames {
            self.playing = false;
            return true;
        }

        false
    }
}
