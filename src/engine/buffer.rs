//! Audio Buffer
//!
//! Frames x channels, row-major: samples are interleaved frame by frame
//! ([L0, R0, L1, R1, ...]). Every module in the crate uses this layout.

use crate::error::{EqError, Result};

/// Peak level above which a buffer is scaled back into [-1, 1]
const NORMALIZATION_CEILING: f32 = 1.0;

/// Multichannel audio buffer with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved sample data
    samples: Vec<f32>,
    /// Number of channels (columns)
    num_channels: usize,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a silent buffer of `num_frames` x `num_channels`
    pub fn new(num_frames: usize, num_channels: usize, sample_rate: u32) -> Result<Self> {
        Self::from_interleaved(vec![0.0; num_frames * num_channels], num_channels, sample_rate)
    }

    /// Create a buffer from existing interleaved samples
    pub fn from_interleaved(samples: Vec<f32>, num_channels: usize, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate { sample_rate });
        }
        if num_channels == 0 {
            return Err(EqError::InvalidBuffer {
                reason: "buffer must have at least one channel".to_string(),
            });
        }
        if samples.len() % num_channels != 0 {
            return Err(EqError::InvalidBuffer {
                reason: format!(
                    "Sample count {} is not divisible by channel count {}",
                    samples.len(),
                    num_channels
                ),
            });
        }
        Ok(Self {
            samples,
            num_channels,
            sample_rate,
        })
    }

    /// Create a single-column buffer from mono samples
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::from_interleaved(samples, 1, sample_rate)
    }

    /// Create a buffer from per-channel sample vectors (channel-major input,
    /// as most decoders produce it). All channels must have equal length.
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: u32) -> Result<Self> {
        let num_channels = channels.len();
        let num_frames = channels.first().map(Vec::len).unwrap_or(0);
        if channels.iter().any(|ch| ch.len() != num_frames) {
            return Err(EqError::InvalidBuffer {
                reason: "channels have different lengths".to_string(),
            });
        }

        let mut samples = Vec::with_capacity(num_frames * num_channels);
        for frame in 0..num_frames {
            for channel in channels {
                samples.push(channel[frame]);
            }
        }
        Self::from_interleaved(samples, num_channels, sample_rate)
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.num_channels
    }

    /// (frames, channels)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_frames(), self.num_channels)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get a reference to all interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get a sample at the given frame and channel
    pub fn get(&self, frame: usize, channel: usize) -> Option<f32> {
        if frame < self.num_frames() && channel < self.num_channels {
            Some(self.samples[frame * self.num_channels + channel])
        } else {
            None
        }
    }

    /// Set a sample at the given frame and channel
    pub fn set(&mut self, frame: usize, channel: usize, value: f32) {
        if frame < self.num_frames() && channel < self.num_channels {
            self.samples[frame * self.num_channels + channel] = value;
        }
    }

    /// Copy one channel out as double precision, for filtering
    pub fn channel_f64(&self, channel: usize) -> Vec<f64> {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.num_channels)
            .map(|&s| s as f64)
            .collect()
    }

    /// Build a buffer of the same shape and rate from processed channels
    pub(crate) fn with_channels_f64(&self, channels: &[Vec<f64>]) -> Self {
        debug_assert_eq!(channels.len(), self.num_channels);
        let mut samples = Vec::with_capacity(self.samples.len());
        for frame in 0..self.num_frames() {
            for channel in channels {
                samples.push(channel[frame] as f32);
            }
        }
        Self {
            samples,
            num_channels: self.num_channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Peak absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// Scale the whole buffer down so its peak is 1.0 if it exceeds 1.0.
    ///
    /// One global factor for all channels, so inter-channel balance is kept.
    /// Returns the factor the samples were divided by (1.0 when untouched).
    pub fn normalize_peak(&mut self) -> f32 {
        let peak = self.peak();
        if peak > NORMALIZATION_CEILING {
            for sample in &mut self.samples {
                *sample /= peak;
            }
            tracing::debug!(peak, "normalized buffer peak");
            peak
        } else {
            1.0
        }
    }

    /// Check if buffer contains valid audio (no NaN/Inf)
    pub fn is_valid(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }

    /// Mono sine wave, handy for tests and demos
    pub fn sine(frequency: f64, duration_secs: f64, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate { sample_rate });
        }
        let num_frames = (duration_secs * sample_rate as f64) as usize;
        let angular_freq = 2.0 * std::f64::consts::PI * frequency / sample_rate as f64;
        let samples = (0..num_frames)
            .map(|i| (angular_freq * i as f64).sin() as f32)
            .collect();
        Self::from_mono(samples, sample_rate)
    }
}
