//! Audio file loading and decoding functionality.
//!
//! This module provides functions for loading and decoding the page's audio assets into sample
//! buffers that can be used by the real-time mixer.

use rubato::{FftFixedIn, Resampler};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::channels::map_channels;
use crate::audio_engine::constants::{RESAMPLE_CHUNK_FRAMES, RESAMPLE_SUB_CHUNKS};
use crate::audio_engine::errors::SampleLoadError;
use crate::messages::SampleBuffer;

/// Decodes an audio file into a sample buffer with the specified output configuration.
///
/// This function loads an audio file from disk, decodes it using the Symphonia library,
/// resamples it to the output rate when the rates differ, and converts it to the requested
/// channel count.
///
/// # Errors
///
/// This function may return errors for various conditions:
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Unsupported channel count
/// - Resampler construction or processing failure
pub fn decode_audio_file_to_sample_buffer(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<SampleBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder.decode(&packet)?;
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    let resampled = if file_rate_hz != output_rate_hz {
        log::debug!(
            "Resampling {} from {file_rate_hz} Hz to {output_rate_hz} Hz",
            path.display()
        );
        resample_interleaved(&decoded, file_channels, file_rate_hz, output_rate_hz)?
    } else {
        decoded
    };

    let mapped = map_channels(resampled, file_channels, output_channels)?;

    Ok(SampleBuffer {
        channels: output_channels,
        samples: Arc::from(mapped.into_boxed_slice()),
    })
}

/// Resamples interleaved audio from `from_hz` to `to_hz`.
///
/// The resampler delay is trimmed so the output is aligned with the input and holds
/// `frames * to_hz / from_hz` frames.
pub fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    from_hz: u32,
    to_hz: u32,
) -> Result<Vec<f32>, SampleLoadError> {
    if channels == 0 || samples.is_empty() || from_hz == to_hz {
        return Ok(samples.to_vec());
    }

    let frames = samples.len() / channels;
    let mut planar: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in frame.iter().enumerate() {
            planar[channel].push(*sample);
        }
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_hz as usize,
        to_hz as usize,
        RESAMPLE_CHUNK_FRAMES,
        RESAMPLE_SUB_CHUNKS,
        channels,
    )?;

    let delay = resampler.output_delay();
    let expected = (frames as u64 * u64::from(to_hz) / u64::from(from_hz)) as usize;
    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];

    let mut pos = 0;
    while frames - pos >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + needed]).collect();
        let processed = resampler.process(&chunk, None)?;
        append_planar(&mut out, processed);
        pos += needed;
    }

    if pos < frames {
        let tail: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
        let processed = resampler.process_partial(Some(tail.as_slice()), None)?;
        append_planar(&mut out, processed);
    }

    // Flush the resampler until the delayed tail is out.
    let mut flushes = 0;
    while out[0].len() < delay + expected && flushes < 8 {
        let processed = resampler.process_partial::<Vec<f32>>(None, None)?;
        append_planar(&mut out, processed);
        flushes += 1;
    }

    let available = out[0].len().saturating_sub(delay).min(expected);
    let mut interleaved = Vec::with_capacity(available * channels);
    for frame in delay..delay + available {
        for channel in &out {
            interleaved.push(channel[frame]);
        }
    }

    Ok(interleaved)
}

fn append_planar(out: &mut [Vec<f32>], processed: Vec<Vec<f32>>) {
    for (dst, src) in out.iter_mut().zip(processed) {
        dst.extend_from_slice(&src);
    }
}
