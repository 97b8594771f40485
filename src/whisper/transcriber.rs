use anyhow::Result;
use hound::SampleFormat;
use std::path::Path;
use std::sync::{Arc, Mutex};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::format::{Segment, TranscriptionResult};
use crate::whisper::config::WhisperConfig;
use crate::whisper::resampler::{WHISPER_SAMPLE_RATE, resample_to_whisper_rate};

/// Seam between the request handler and the speech model. The handler only
/// ever sees this trait, so tests can substitute a stub for the real model.
pub trait Transcriber: Send + Sync {
    fn transcribe_file(&self, audio_path: &Path) -> Result<TranscriptionResult>;
}

/// whisper.cpp-backed transcriber. The model context is loaded once at
/// startup and shared across requests behind a mutex.
#[derive(Clone)]
pub struct WhisperTranscriber {
    inner: Arc<Mutex<TranscriberInner>>,
    config: WhisperConfig,
}

struct TranscriberInner {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(config.use_gpu);

        let model_path = config
            .model_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Model path is not valid UTF-8"))?;

        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| anyhow::anyhow!("Failed to load model: {}", e))?;

        let inner = TranscriberInner { ctx };

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
            config,
        })
    }

    /// Decode a WAV file into interleaved f32 samples.
    fn load_audio(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to read audio file: {}", e))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        let sample_rate = spec.sample_rate;

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| anyhow::anyhow!("Failed to decode audio samples: {}", e))?,
            (SampleFormat::Int, bits @ (16 | 24 | 32)) => {
                let max = (1_i64 << (bits - 1)) - 1;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max as f32))
                    .collect::<Result<_, _>>()
                    .map_err(|e| anyhow::anyhow!("Failed to decode audio samples: {}", e))?
            }
            (format, bits) => {
                return Err(anyhow::anyhow!(
                    "Unsupported sample format: {}-bit {:?}",
                    bits,
                    format
                ));
            }
        };

        Ok((samples, sample_rate, channels))
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe_file(&self, audio_path: &Path) -> Result<TranscriptionResult> {
        let (samples, sample_rate, channels) = Self::load_audio(audio_path)?;

        let resampled = resample_to_whisper_rate(&samples, sample_rate, channels)?;

        let mono = match channels {
            1 => resampled,
            2 => whisper_rs::convert_stereo_to_mono_audio(&resampled)
                .map_err(|e| anyhow::anyhow!("Failed to convert audio to mono: {}", e))?,
            n => return Err(anyhow::anyhow!("Unsupported channel count: {}", n)),
        };

        if mono.len() < WHISPER_SAMPLE_RATE as usize {
            return Err(anyhow::anyhow!("Audio is too short (less than 1 second)"));
        }

        // Deterministic decoding: greedy sampling, temperature 0, no prompt,
        // segment-level timestamps only.
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));
        params.set_translate(false);
        params.set_temperature(0.0);
        params.set_token_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_audio_ctx(self.config.audio_context);
        params.set_no_speech_thold(self.config.no_speech_threshold);
        params.set_n_threads(self.config.num_threads);

        let inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire transcriber lock"))?;

        let mut state = inner
            .ctx
            .create_state()
            .map_err(|e| anyhow::anyhow!("Failed to create whisper state: {}", e))?;

        state
            .full(params, &mono)
            .map_err(|e| anyhow::anyhow!("Failed to run transcription: {}", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow::anyhow!("Failed to get segment count: {}", e))?;

        let mut text = String::new();
        let mut segments = Vec::with_capacity(num_segments as usize);

        for i in 0..num_segments {
            let segment_text = state
                .full_get_segment_text(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment text: {}", e))?;

            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment start: {}", e))?;

            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment end: {}", e))?;

            text.push_str(&segment_text);
            segments.push(Segment {
                // whisper reports centiseconds
                start: start as f64 / 100.0,
                end: end as f64 / 100.0,
                text: segment_text,
            });
        }

        Ok(TranscriptionResult { text, segments })
    }
}
