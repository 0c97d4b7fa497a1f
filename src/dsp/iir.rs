//! IIR cascade engine
//!
//! One peaking section per band with a non-negligible gain, applied in band
//! order. Each section filters the previous section's output.

use tracing::debug;

use super::bands::GainVector;
use super::biquad::{design_peaking, BiquadSection};
use crate::engine::AudioBuffer;
use crate::error::Result;

/// Bands whose gain is below this magnitude are left out of the cascade
pub const SKIP_GAIN_DB: f64 = 1e-3;

/// Whether a band with this gain contributes a section to the cascade
fn is_active_gain(gain_db: f64) -> bool {
    gain_db.abs() >= SKIP_GAIN_DB
}

/// Serial cascade of peaking sections for one gain setting
#[derive(Debug, Clone, PartialEq)]
pub struct IirCascade {
    sections: Vec<BiquadSection>,
}

impl IirCascade {
    /// Design the active sections for `gains` at `sample_rate`
    pub fn from_gains(gains: &GainVector, sample_rate: u32) -> Result<Self> {
        let mut sections = Vec::new();
        for (band, gain_db) in gains.bands() {
            if !is_active_gain(gain_db) {
                continue;
            }
            sections.push(design_peaking(
                band.center_frequency,
                band.q,
                gain_db,
                sample_rate,
            )?);
        }
        Ok(Self { sections })
    }

    /// Sections in application order
    pub fn sections(&self) -> &[BiquadSection] {
        &self.sections
    }

    /// Filter a buffer through every section, then peak-normalize
    pub fn apply(&self, buffer: &AudioBuffer) -> AudioBuffer {
        if self.sections.is_empty() {
            let mut output = buffer.clone();
            output.normalize_peak();
            return output;
        }

        let channels: Vec<Vec<f64>> = (0..buffer.num_channels())
            .map(|ch| {
                self.sections
                    .iter()
                    .fold(buffer.channel_f64(ch), |signal, section| section.filter(&signal))
            })
            .collect();

        let mut output = buffer.with_channels_f64(&channels);
        output.normalize_peak();
        output
    }
}

/// Apply the five-band IIR equalizer to a buffer at its own sample rate
pub fn apply_iir(buffer: &AudioBuffer, gains: &GainVector) -> Result<AudioBuffer> {
    let cascade = IirCascade::from_gains(gains, buffer.sample_rate())?;
    debug!(
        sections = cascade.sections().len(),
        frames = buffer.num_frames(),
        channels = buffer.num_channels(),
        "applying IIR cascade"
    );
    Ok(cascade.apply(buffer))
}
