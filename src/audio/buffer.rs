//! Fully decoded audio held in memory
//!
//! Samples are stored interleaved (L R L R ...) for stereo. A buffer is
//! never edited in place: transforms build a new one and replace the old.

use std::time::Duration;

use thiserror::Error;

use crate::dsp::{self, DspError};

/// Errors from building an `AudioBuffer`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    #[error("Sample rate must be positive")]
    ZeroSampleRate,

    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    #[error("Channel lengths differ: left {left}, right {right}")]
    ChannelLengthMismatch { left: usize, right: usize },

    #[error(transparent)]
    Samples(#[from] DspError),
}

/// Decoded audio: sample rate, channel count and interleaved samples
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self, BufferError> {
        if sample_rate == 0 {
            return Err(BufferError::ZeroSampleRate);
        }
        if !(1..=2).contains(&channels) {
            return Err(BufferError::UnsupportedChannels(channels));
        }
        if samples.len() % channels as usize != 0 {
            return Err(DspError::MismatchedChannels {
                samples: samples.len(),
                channels: channels as usize,
            }
            .into());
        }
        dsp::check_finite(&samples)?;

        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Interleave two equal-length channels into a stereo buffer
    pub fn from_stereo(left: &[f32], right: &[f32], sample_rate: u32) -> Result<Self, BufferError> {
        if left.len() != right.len() {
            return Err(BufferError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        let samples = left
            .iter()
            .zip(right)
            .flat_map(|(&l, &r)| [l, r])
            .collect();

        Self::new(sample_rate, 2, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Copy out one channel, or `None` if `index` is out of range
    pub fn channel(&self, index: usize) -> Option<Vec<f32>> {
        let channels = self.channels as usize;
        if index >= channels {
            return None;
        }
        Some(
            self.samples
                .iter()
                .skip(index)
                .step_by(channels)
                .copied()
                .collect(),
        )
    }

    /// Average all channels into one
    pub fn to_mono(&self) -> Vec<f32> {
        // Channel count and length are validated on construction
        dsp::downmix(&self.samples, self.channels as usize).unwrap_or_default()
    }

    /// Stereo frames for playback; mono is duplicated to both sides
    pub fn stereo_frames(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let channels = self.channels as usize;
        self.samples.chunks_exact(channels).map(move |frame| {
            if channels > 1 {
                (frame[0], frame[1])
            } else {
                (frame[0], frame[0])
            }
        })
    }
}
