use anyhow::Result;
use rubato::{Resampler, SincFixedIn, SincInterpolationType, WindowFunction};

/// Sample rate whisper.cpp expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Resample interleaved audio to 16 kHz, keeping the channel count.
pub fn resample_to_whisper_rate(
    samples: &[f32],
    sample_rate: u32,
    channels: usize,
) -> Result<Vec<f32>> {
    if sample_rate == WHISPER_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    let frames = samples.len() / channels;
    if frames == 0 {
        return Err(anyhow::anyhow!("no audio frames to resample"));
    }

    // De-interleave into per-channel buffers.
    let mut input_channels = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            input_channels[ch].push(sample);
        }
    }

    let params = rubato::SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = WHISPER_SAMPLE_RATE as f64 / sample_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, frames, channels)?;

    let resampled = resampler.process(&input_channels, None)?;

    // The sinc filter introduces a fixed delay of silence at the front.
    let delay = resampler.output_delay();
    let expected_frames = (frames as f64 * resample_ratio) as usize;
    let end_frame = (delay + expected_frames).min(resampled[0].len());

    let mut output = Vec::with_capacity(expected_frames * channels);
    for frame_idx in delay..end_frame {
        for channel in &resampled {
            output.push(channel[frame_idx]);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_at_target_rate() {
        let samples = vec![0.1_f32, -0.2, 0.3, -0.4];
        let out = resample_to_whisper_rate(&samples, WHISPER_SAMPLE_RATE, 1).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn downsampling_halves_frame_count() {
        let samples = vec![0.0_f32; 32_000];
        let out = resample_to_whisper_rate(&samples, 32_000, 1).unwrap();
        // Short of the exact ratio by at most the filter delay.
        assert!(out.len() <= 16_000);
        assert!(out.len() > 15_000);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(resample_to_whisper_rate(&[], 44_100, 1).is_err());
    }
}
