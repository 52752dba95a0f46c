//! Audio Stream Module
//!
//! This module handles CPAL audio stream management including:
//! - Stream initialization and configuration
//! - Audio callback setup
//! - Real-time message processing
//! - Error handling for audio stream operations

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::{Arc, Mutex};

use crate::audio_engine::constants::{
    CONTROL_RING_CAPACITY, OUTPUT_BUFFER_FRAMES, SIGNAL_RING_CAPACITY,
};
use crate::audio_engine::errors::EngineError;
use crate::audio_engine::mixer::RtMixer;
use crate::messages::{AudioMessage, ControlMessage};
use crate::orchestrator::ChannelId;

/// Handle to the audio stream with associated message channels
pub struct AudioStreamHandle {
    pub stream: Stream,
    pub producer: Arc<Mutex<Producer<ControlMessage>>>,
    pub consumer: Consumer<AudioMessage>,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Setup and configure the logger.
pub fn setup_logger() {
    // Default to `info`; override via `RUST_LOG`, e.g. `RUST_LOG=debug` to trace every
    // resource signal.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

/// Create and configure the audio stream
///
/// This function:
/// 1. Sets up the default audio device
/// 2. Configures the stream with appropriate parameters
/// 3. Creates ring buffers for message passing
/// 4. Initializes the mixer
/// 5. Builds and returns the audio stream
pub fn create_audio_stream() -> Result<AudioStreamHandle, EngineError> {
    setup_logger();

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(EngineError::NoDevice)?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!(
        "Starting AudioEngine... ({} ch@{} Hz)",
        channels,
        sample_rate
    );

    // Control messages (page -> audio thread)
    let (producer_in, mut consumer_in) = RingBuffer::new(CONTROL_RING_CAPACITY);

    // State changes (audio thread -> page)
    let (mut producer_out, consumer_out) = RingBuffer::new(SIGNAL_RING_CAPACITY);

    let mut mixer = RtMixer::new(channels as usize);

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(OUTPUT_BUFFER_FRAMES),
    };

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            while let Ok(message) = consumer_in.pop() {
                if let Some(reply) = mixer.apply(message) {
                    let _ = producer_out.push(reply);
                }
            }

            let ended = mixer.render(data);
            for (index, ended) in ended.into_iter().enumerate() {
                if !ended {
                    continue;
                }
                if let Some(channel) = ChannelId::from_index(index) {
                    // A media element pauses before it reports the end.
                    let _ = producer_out.push(AudioMessage::Paused { channel });
                    let _ = producer_out.push(AudioMessage::Ended { channel });
                }
            }
        },
        |err| {
            log::error!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(AudioStreamHandle {
        stream,
        producer: Arc::new(Mutex::new(producer_in)),
        consumer: consumer_out,
        output_channels: channels as usize,
        output_sample_rate: sample_rate,
    })
}

/// Start playing the audio stream
pub fn start_stream(stream: &Stream) -> Result<(), EngineError> {
    stream.play()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_setup() {
        // Multiple calls should be safe (though only the first takes effect)
        setup_logger();
        setup_logger();
    }

    #[test]
    fn test_audio_stream_creation() {
        // Actual stream creation requires audio hardware
        if cpal::default_host().default_output_device().is_none() {
            return;
        }

        // May still fail in test environments; only the signature is checked here.
        let _ = create_audio_stream();
    }
}
