//! Frequency response evaluation
//!
//! Magnitude in dB on a fixed log-spaced grid covering the audible range.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::bands::GainVector;
use super::biquad::design_peaking;
use super::fir::design_fir;
use super::FilterKind;
use crate::error::{EqError, Result};

/// Number of grid points
pub const RESPONSE_POINTS: usize = 512;

/// Lowest grid frequency in Hz
pub const RESPONSE_MIN_HZ: f64 = 20.0;

/// Highest grid frequency in Hz
pub const RESPONSE_MAX_HZ: f64 = 20000.0;

/// Magnitudes are floored here before taking the log (-120 dB)
const MAGNITUDE_FLOOR: f64 = 1e-6;

/// Magnitude response sampled on the log grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyResponse {
    /// Grid frequencies in Hz, strictly increasing
    #[serde(rename = "frequency")]
    pub frequencies: Vec<f64>,
    /// Magnitude in dB at each grid frequency
    #[serde(rename = "magnitude")]
    pub magnitude_db: Vec<f64>,
}

impl FrequencyResponse {
    /// Magnitude at the grid point closest to `frequency`
    pub fn magnitude_near(&self, frequency: f64) -> Option<f64> {
        self.frequencies
            .iter()
            .zip(&self.magnitude_db)
            .min_by(|(a, _), (b, _)| (*a - frequency).abs().total_cmp(&(*b - frequency).abs()))
            .map(|(_, &magnitude)| magnitude)
    }
}

/// Log-spaced frequencies from 20 Hz to 20 kHz, both ends included
pub fn response_grid() -> Vec<f64> {
    let start = RESPONSE_MIN_HZ.log10();
    let stop = RESPONSE_MAX_HZ.log10();
    let step = (stop - start) / (RESPONSE_POINTS - 1) as f64;
    (0..RESPONSE_POINTS)
        .map(|i| 10.0_f64.powf(start + step * i as f64))
        .collect()
}

/// Evaluate the equalizer's magnitude response for `gains`
///
/// The grid does not depend on the sample rate; points above Nyquist simply
/// alias onto the periodic response.
pub fn evaluate_response(
    gains: &GainVector,
    sample_rate: u32,
    kind: FilterKind,
) -> Result<FrequencyResponse> {
    if sample_rate == 0 {
        return Err(EqError::InvalidSampleRate { sample_rate });
    }

    let frequencies = response_grid();
    let omegas: Vec<f64> = frequencies
        .iter()
        .map(|f| 2.0 * PI * f / sample_rate as f64)
        .collect();

    let response: Vec<Complex64> = match kind {
        FilterKind::Iir => {
            let mut response = vec![Complex64::new(1.0, 0.0); omegas.len()];
            for (band, gain_db) in gains.bands() {
                let section = design_peaking(band.center_frequency, band.q, gain_db, sample_rate)?;
                for (h, &omega) in response.iter_mut().zip(&omegas) {
                    *h *= section.frequency_response(omega);
                }
            }
            response
        }
        FilterKind::Fir => {
            let kernel = design_fir(gains, sample_rate)?;
            omegas
                .iter()
                .map(|&omega| kernel.frequency_response(omega))
                .collect()
        }
    };

    let magnitude_db = response.iter().map(|h| magnitude_to_db(h.norm())).collect();

    Ok(FrequencyResponse {
        frequencies,
        magnitude_db,
    })
}

/// 20 log10 of a linear magnitude, floored at -120 dB
pub fn magnitude_to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.max(MAGNITUDE_FLOOR).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test]
    fn test_grid_shape() {
        let grid = response_grid();
        assert_eq!(grid.len(), RESPONSE_POINTS);
        assert_abs_diff_eq!(grid[0], 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grid[RESPONSE_POINTS - 1], 20000.0, epsilon = 1e-6);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test_case(FilterKind::Iir ; "iir")]
    #[test_case(FilterKind::Fir ; "fir")]
    fn test_flat_gains_flat_response(kind: FilterKind) {
        let response = evaluate_response(&GainVector::flat(), 44100, kind).unwrap();
        assert_eq!(response.magnitude_db.len(), RESPONSE_POINTS);
        for magnitude in &response.magnitude_db {
            assert_abs_diff_eq!(*magnitude, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mid_boost_hits_target() {
        let gains = GainVector::from([0.0, 0.0, 6.0, 0.0, 0.0]);
        let response = evaluate_response(&gains, 44100, FilterKind::Iir).unwrap();
        let at_mid = response.magnitude_near(1000.0).unwrap();
        assert!((at_mid - 6.0).abs() < 0.5, "Expected ~6 dB at 1 kHz, got {}", at_mid);
    }

    #[test]
    fn test_iir_cut_is_negative() {
        let gains = GainVector::from([0.0, -9.0, 0.0, 0.0, 0.0]);
        let response = evaluate_response(&gains, 48000, FilterKind::Iir).unwrap();
        let at_bass = response.magnitude_near(200.0).unwrap();
        assert!((at_bass + 9.0).abs() < 0.5, "Expected ~-9 dB at 200 Hz, got {}", at_bass);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let result = evaluate_response(&GainVector::flat(), 0, FilterKind::Iir);
        assert!(result.is_err());
    }

    #[test]
    fn test_floor() {
        assert_abs_diff_eq!(magnitude_to_db(0.0), -120.0, epsilon = 1e-9);
        assert_abs_diff_eq!(magnitude_to_db(1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serializes_with_short_names() {
        let response = evaluate_response(&GainVector::flat(), 8000, FilterKind::Iir).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["frequency"].as_array().unwrap().len(), RESPONSE_POINTS);
        assert_eq!(json["magnitude"].as_array().unwrap().len(), RESPONSE_POINTS);
    }
}
