//! Audio engine configuration constants and limits.

/// Minimum volume level (silence).
pub const VOLUME_MIN: f32 = 0.0;

/// Maximum volume level (100%).
pub const VOLUME_MAX: f32 = 1.0;

/// Capacity of the page → audio thread control ring.
pub const CONTROL_RING_CAPACITY: usize = 256;

/// Capacity of the audio thread → page signal ring.
pub const SIGNAL_RING_CAPACITY: usize = 256;

/// Fixed output buffer size in frames.
pub const OUTPUT_BUFFER_FRAMES: u32 = 512;

/// Input chunk size, in frames, fed to the resampler.
pub const RESAMPLE_CHUNK_FRAMES: usize = 1024;

/// Sub-chunks used by the FFT resampler.
pub const RESAMPLE_SUB_CHUNKS: usize = 2;
