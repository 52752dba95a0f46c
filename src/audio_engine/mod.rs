//! Audio Engine Module
//!
//! This module provides native playback for the page's audio channels.
//! It is organized into sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management and real-time callback
//! - [`channels`]: channel layout conversion for decoded assets
//! - [`constants`]: Configuration constants and limits
//! - [`engine_channel`]: the [`AudioResource`](crate::orchestrator::AudioResource) handle per channel
//! - [`errors`]: Audio-specific error types
//! - [`mixer`]: Real-time mixing engine
//! - [`sample_loader`]: Audio file loading, decoding and resampling
//! - [`voice_slot`]: Per-channel playback state
//!
//! The main [`AudioEngine`] struct opens the output stream, loads assets on background threads
//! and hands out one [`EngineChannel`] per asset for the orchestrator to drive.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::audio_engine::audio_stream::{AudioStreamHandle, create_audio_stream, start_stream};
use crate::audio_engine::sample_loader::decode_audio_file_to_sample_buffer;
use crate::messages::{ControlMessage, LoaderEvent};
use crate::orchestrator::{ChannelId, ChannelResources, ResourceSignal};

mod audio_stream;
mod channels;
pub mod constants;
pub mod engine_channel;
pub mod errors;
mod mixer;
mod sample_loader;
mod voice_slot;

pub use audio_stream::setup_logger;
pub use engine_channel::{AutoplayPolicy, EngineChannel, GestureGate};
pub use errors::{EngineError, SampleLoadError};

/// File locations of the three audio assets. `None` marks an asset the page does not ship.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioAssets {
    pub background: Option<PathBuf>,
    pub tick: Option<PathBuf>,
    pub section: Option<PathBuf>,
}

impl AudioAssets {
    /// Assets named after their channel (`bg-music.mp3`, ...) inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            background: Some(dir.join("bg-music.mp3")),
            tick: Some(dir.join("tick-sound.mp3")),
            section: Some(dir.join("section-sound.mp3")),
        }
    }

    pub fn path(&self, channel: ChannelId) -> Option<&Path> {
        match channel {
            ChannelId::Background => self.background.as_deref(),
            ChannelId::Tick => self.tick.as_deref(),
            ChannelId::Section => self.section.as_deref(),
        }
    }
}

/// AudioEngine plays the page's channels on the default output device using cpal.
pub struct AudioEngine {
    stream_handle: AudioStreamHandle,
    autoplay: AutoplayPolicy,
    gesture: GestureGate,
    loader_tx: Sender<LoaderEvent>,
    loader_rx: Receiver<LoaderEvent>,
}

impl AudioEngine {
    /// Opens the default output device and starts the (initially silent) stream.
    pub fn new(autoplay: AutoplayPolicy) -> Result<Self, EngineError> {
        let stream_handle = create_audio_stream()?;
        start_stream(&stream_handle.stream)?;

        let (loader_tx, loader_rx) = std::sync::mpsc::channel();

        Ok(AudioEngine {
            stream_handle,
            autoplay,
            gesture: GestureGate::default(),
            loader_tx,
            loader_rx,
        })
    }

    /// Records a user gesture, lifting the autoplay restriction.
    pub fn register_gesture(&self) {
        self.gesture.register();
    }

    /// A handle the page controller can use to record gestures.
    pub fn gesture_gate(&self) -> GestureGate {
        self.gesture.clone()
    }

    /// Opens a channel backed by the asset at `path`, loading it on a background thread.
    ///
    /// Returns `None` when the asset does not exist.
    pub fn open_channel(&self, channel: ChannelId, path: &Path) -> Option<EngineChannel> {
        if !path.is_file() {
            log::debug!("{channel}: no asset at {}", path.display());
            return None;
        }

        self.load_channel_async(channel, path.to_path_buf());

        Some(EngineChannel::new(
            channel,
            self.stream_handle.producer.clone(),
            self.autoplay,
            self.gesture.clone(),
        ))
    }

    /// Opens every channel that has an asset.
    pub fn open_channels(&self, assets: &AudioAssets) -> ChannelResources<EngineChannel> {
        let open = |channel| {
            assets
                .path(channel)
                .and_then(|path| self.open_channel(channel, path))
        };
        ChannelResources {
            background: open(ChannelId::Background),
            tick: open(ChannelId::Tick),
            section: open(ChannelId::Section),
        }
    }

    fn load_channel_async(&self, channel: ChannelId, path: PathBuf) {
        let loader_tx = self.loader_tx.clone();
        let producer = self.stream_handle.producer.clone();
        let output_channels = self.stream_handle.output_channels;
        let output_sample_rate = self.stream_handle.output_sample_rate;

        thread::spawn(move || {
            let _ = loader_tx.send(LoaderEvent::Started { channel });

            let sample = match decode_audio_file_to_sample_buffer(
                &path,
                output_channels,
                output_sample_rate,
            ) {
                Ok(sample) => sample,
                Err(SampleLoadError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                    let _ = loader_tx.send(LoaderEvent::Error {
                        channel,
                        error: format!("File not found: {}", path.display()),
                    });
                    return;
                }
                Err(err) => {
                    let _ = loader_tx.send(LoaderEvent::Error {
                        channel,
                        error: err.to_string(),
                    });
                    return;
                }
            };

            let duration_sec = sample.frames() as f32 / output_sample_rate as f32;

            let mut producer_guard = match producer.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    let _ = loader_tx.send(LoaderEvent::Error {
                        channel,
                        error: "Failed to acquire producer lock".to_string(),
                    });
                    return;
                }
            };

            if producer_guard
                .push(ControlMessage::LoadSample { channel, sample })
                .is_err()
            {
                let _ = loader_tx.send(LoaderEvent::Error {
                    channel,
                    error: "Failed to send LoadSample - buffer may be full".to_string(),
                });
                return;
            }

            log::info!("{channel}: loaded ({duration_sec:.2}s)");
            let _ = loader_tx.send(LoaderEvent::Success {
                channel,
                duration_sec,
            });
        });
    }

    /// Drains pending loader and playback signals, in arrival order per source.
    pub fn poll_signals(&mut self) -> Vec<(ChannelId, ResourceSignal)> {
        let mut signals = Vec::new();

        loop {
            match self.loader_rx.try_recv() {
                Ok(event) => {
                    let (channel, loader_signals) = event.into_signals();
                    signals.extend(loader_signals.into_iter().map(|signal| (channel, signal)));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        while let Ok(message) = self.stream_handle.consumer.pop() {
            signals.push(message.into_signal());
        }

        signals
    }

    pub fn output_channels(&self) -> usize {
        self.stream_handle.output_channels
    }

    pub fn output_sample_rate(&self) -> u32 {
        self.stream_handle.output_sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::traits::HostTrait;

    #[test]
    fn test_assets_in_dir() {
        let assets = AudioAssets::in_dir("static/audio");
        assert_eq!(
            assets.path(ChannelId::Tick),
            Some(Path::new("static/audio/tick-sound.mp3"))
        );
        assert_eq!(AudioAssets::default().path(ChannelId::Background), None);
    }

    #[test]
    fn test_engine_missing_asset_is_none() {
        // Engine creation requires audio hardware
        if cpal::default_host().default_output_device().is_none() {
            return;
        }
        let Ok(engine) = AudioEngine::new(AutoplayPolicy::Allowed) else {
            return;
        };

        let tmp = tempfile::tempdir().unwrap();
        let resources = engine.open_channels(&AudioAssets::in_dir(tmp.path()));
        assert!(resources.background.is_none());
        assert!(resources.tick.is_none());
        assert!(resources.section.is_none());
    }
}
