//! Peaking biquad design
//!
//! Second-order sections built from the Audio EQ Cookbook peaking formula.
//! Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::error::{EqError, Result};

/// Gains below this magnitude produce the identity section
const NEGLIGIBLE_GAIN_DB: f64 = 1e-6;

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (a0 + a1*z^-1 + a2*z^-2)
/// Always normalized so that a0 == 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadSection {
    /// Numerator coefficients
    pub b: [f64; 3],
    /// Denominator coefficients, `a[0] == 1`
    pub a: [f64; 3],
}

impl Default for BiquadSection {
    fn default() -> Self {
        Self::identity()
    }
}

impl BiquadSection {
    /// Pass-through section
    pub const fn identity() -> Self {
        Self {
            b: [1.0, 0.0, 0.0],
            a: [1.0, 0.0, 0.0],
        }
    }

    /// Check if coefficients represent a bypass (unity gain, no filtering)
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample),
    /// i.e. H evaluated at z = e^{j omega}
    pub fn frequency_response(&self, omega: f64) -> Complex64 {
        let numerator = eval_delay_polynomial(&self.b, omega);
        let denominator = eval_delay_polynomial(&self.a, omega);
        numerator / denominator
    }

    /// Run a signal through this section from zero initial state
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut state = BiquadState::default();
        input
            .iter()
            .map(|&x| state.process(x, self))
            .collect()
    }
}

/// Design a peaking section for one band
///
/// Bands at or above Nyquist, non-positive center frequencies and negligible
/// gains yield [`BiquadSection::identity`] instead of an error, so a disabled
/// or out-of-range band never colors the signal. A zero sample rate is a
/// caller error.
pub fn design_peaking(
    center_freq: f64,
    q: f64,
    gain_db: f64,
    sample_rate: u32,
) -> Result<BiquadSection> {
    if sample_rate == 0 {
        return Err(EqError::InvalidSampleRate { sample_rate });
    }

    let fs = sample_rate as f64;
    if center_freq <= 0.0 || center_freq >= fs / 2.0 || gain_db.abs() < NEGLIGIBLE_GAIN_DB {
        return Ok(BiquadSection::identity());
    }

    let a = 10.0_f64.powf(gain_db / 40.0);
    let w0 = 2.0 * PI * center_freq / fs;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_w0;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha / a;

    // Normalize by a0
    Ok(BiquadSection {
        b: [b0 / a0, b1 / a0, b2 / a0],
        a: [1.0, a1 / a0, a2 / a0],
    })
}

/// Evaluate sum(c[k] * e^{-j omega k})
pub(crate) fn eval_delay_polynomial(coeffs: &[f64], omega: f64) -> Complex64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(k, &c)| Complex64::from_polar(c, -omega * k as f64))
        .sum()
}

/// Biquad filter state for one channel
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl BiquadState {
    /// Direct Form I
    fn process(&mut self, input: f64, section: &BiquadSection) -> f64 {
        let [b0, b1, b2] = section.b;
        let [_, a1, a2] = section.a;
        let output = b0 * input + b1 * self.x1 + b2 * self.x2 - a1 * self.y1 - a2 * self.y2;

        // Shift delay line
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(60.0, 0.9, 8000 ; "sub at 8k")]
    #[test_case(1000.0, 1.2, 44100 ; "mid at 44k1")]
    #[test_case(12000.0, 1.1, 96000 ; "brilliance at 96k")]
    fn test_zero_gain_is_identity(freq: f64, q: f64, sample_rate: u32) {
        let section = design_peaking(freq, q, 0.0, sample_rate).unwrap();
        assert_eq!(section, BiquadSection::identity());
    }

    #[test_case(0.0 ; "zero frequency")]
    #[test_case(-10.0 ; "negative frequency")]
    #[test_case(4000.0 ; "exactly nyquist")]
    #[test_case(12000.0 ; "above nyquist")]
    fn test_out_of_range_center_is_identity(freq: f64) {
        let section = design_peaking(freq, 1.0, 12.0, 8000).unwrap();
        assert!(section.is_identity());
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let result = design_peaking(1000.0, 1.0, 6.0, 0);
        assert!(matches!(result, Err(EqError::InvalidSampleRate { .. })));
    }

    #[test]
    fn test_normalized_a0() {
        let section = design_peaking(1000.0, 1.2, 6.0, 44100).unwrap();
        assert_eq!(section.a[0], 1.0);
        // Peaking filters share b1 and a1
        assert_abs_diff_eq!(section.b[1], section.a[1], epsilon = 1e-12);
    }

    #[test]
    fn test_gain_at_center_frequency() {
        let fs = 48000;
        for gain in [-12.0, -6.0, 3.0, 12.0] {
            let section = design_peaking(1000.0, 1.0, gain, fs).unwrap();
            let omega = 2.0 * PI * 1000.0 / fs as f64;
            let magnitude_db = 20.0 * section.frequency_response(omega).norm().log10();
            assert_abs_diff_eq!(magnitude_db, gain, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_unity_far_from_center() {
        let section = design_peaking(1000.0, 1.2, 12.0, 48000).unwrap();
        assert_abs_diff_eq!(section.frequency_response(0.0).norm(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(section.frequency_response(PI).norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_filter_passthrough() {
        let input: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
        let output = BiquadSection::identity().filter(&input);
        assert_eq!(input, output);
    }

    #[test]
    fn test_filter_impulse_response_starts_with_b0() {
        let section = design_peaking(200.0, 1.0, 6.0, 8000).unwrap();
        let mut impulse = vec![0.0; 8];
        impulse[0] = 1.0;

        let response = section.filter(&impulse);
        assert_abs_diff_eq!(response[0], section.b[0], epsilon = 1e-15);
        assert_abs_diff_eq!(
            response[1],
            section.b[1] - section.a[1] * section.b[0],
            epsilon = 1e-15
        );
    }
}
