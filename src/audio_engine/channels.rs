use crate::audio_engine::errors::SampleLoadError;

/// Maps interleaved samples from the file's channel layout to the output device's layout.
///
/// Supported conversions:
/// - same channel count: unchanged
/// - mono → any: the mono signal is copied to every output channel
/// - any → mono: each frame is averaged
/// - stereo → more channels: left/right go to the first two channels, the rest stay silent
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, SampleLoadError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    if file_channels == 0 || output_channels == 0 {
        return Err(SampleLoadError::UnsupportedChannels {
            file_channels,
            output_channels,
        });
    }

    let frames = samples.len() / file_channels;
    match (file_channels, output_channels) {
        (1, out) => {
            let mut mapped = Vec::with_capacity(frames * out);
            for s in samples {
                mapped.extend(std::iter::repeat_n(s, out));
            }
            Ok(mapped)
        }
        (inp, 1) => Ok(samples
            .chunks_exact(inp)
            .map(|frame| frame.iter().sum::<f32>() / inp as f32)
            .collect()),
        (2, out) if out > 2 => {
            let mut mapped = vec![0.0; frames * out];
            for (frame, dst) in samples.chunks_exact(2).zip(mapped.chunks_exact_mut(out)) {
                dst[..2].copy_from_slice(frame);
            }
            Ok(mapped)
        }
        _ => Err(SampleLoadError::UnsupportedChannels {
            file_channels,
            output_channels,
        }),
    }
}
