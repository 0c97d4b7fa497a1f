//! Fixed five-band equalizer configuration

use serde::{Deserialize, Serialize};

use crate::error::{EqError, Result};

/// Number of equalizer bands
pub const BAND_COUNT: usize = 5;

/// Gains at or below this magnitude count as exactly zero when deciding
/// whether the whole gain vector is flat
const FLAT_GAIN_TOLERANCE: f64 = 1e-8;

/// One fixed frequency region of the equalizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    /// Display name
    pub name: &'static str,
    /// Center frequency in Hz
    pub center_frequency: f64,
    /// Quality factor (bandwidth)
    pub q: f64,
}

impl Band {
    const fn new(name: &'static str, center_frequency: f64, q: f64) -> Self {
        Self {
            name,
            center_frequency,
            q,
        }
    }
}

/// The band table, ordered by strictly increasing center frequency.
/// The FIR breakpoint construction relies on that ordering.
pub const EQ_BANDS: [Band; BAND_COUNT] = [
    Band::new("Sub", 60.0, 0.9),
    Band::new("Bass", 200.0, 1.0),
    Band::new("Mid", 1000.0, 1.2),
    Band::new("Presence", 4000.0, 1.3),
    Band::new("Brilliance", 12000.0, 1.1),
];

/// Per-band gain adjustments in dB, aligned with [`EQ_BANDS`]
///
/// The length is checked on construction; the values themselves are not
/// bounded here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct GainVector([f64; BAND_COUNT]);

impl GainVector {
    /// Create a gain vector, rejecting anything but one gain per band
    pub fn new(gains: Vec<f64>) -> Result<Self> {
        let actual = gains.len();
        let gains: [f64; BAND_COUNT] =
            gains
                .try_into()
                .map_err(|_| EqError::GainCountMismatch {
                    expected: BAND_COUNT,
                    actual,
                })?;
        Ok(Self(gains))
    }

    /// All bands at 0 dB
    pub fn flat() -> Self {
        Self([0.0; BAND_COUNT])
    }

    /// Gain values in band order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Gain for the band at `index`
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Iterate bands together with their gains, in band order
    pub fn bands(&self) -> impl Iterator<Item = (&'static Band, f64)> + '_ {
        EQ_BANDS.iter().zip(self.0.iter().copied())
    }

    /// True when every gain is numerically zero
    pub fn is_flat(&self) -> bool {
        self.0.iter().all(|g| g.abs() <= FLAT_GAIN_TOLERANCE)
    }
}

impl From<[f64; BAND_COUNT]> for GainVector {
    fn from(gains: [f64; BAND_COUNT]) -> Self {
        Self(gains)
    }
}

impl TryFrom<Vec<f64>> for GainVector {
    type Error = EqError;

    fn try_from(gains: Vec<f64>) -> Result<Self> {
        Self::new(gains)
    }
}

impl From<GainVector> for Vec<f64> {
    fn from(gains: GainVector) -> Self {
        gains.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_strictly_increasing() {
        for pair in EQ_BANDS.windows(2) {
            assert!(pair[0].center_frequency < pair[1].center_frequency);
        }
        assert!(EQ_BANDS.iter().all(|b| b.q > 0.0));
    }

    #[test]
    fn test_gain_vector_length_checked() {
        assert!(GainVector::new(vec![0.0; BAND_COUNT]).is_ok());

        match GainVector::new(vec![1.0, 2.0]) {
            Err(EqError::GainCountMismatch { expected, actual }) => {
                assert_eq!(expected, BAND_COUNT);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected GainCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_is_flat() {
        assert!(GainVector::flat().is_flat());
        assert!(GainVector::from([1e-9, 0.0, -1e-9, 0.0, 0.0]).is_flat());
        assert!(!GainVector::from([0.0, 0.0, 0.5, 0.0, 0.0]).is_flat());
    }

    #[test]
    fn test_gain_vector_serde() {
        let gains: GainVector = serde_json::from_str("[1.0, 2.0, 3.0, 4.0, 5.0]").unwrap();
        assert_eq!(gains.get(4), Some(5.0));
        assert_eq!(serde_json::to_string(&gains).unwrap(), "[1.0,2.0,3.0,4.0,5.0]");

        assert!(serde_json::from_str::<GainVector>("[1.0, 2.0]").is_err());
    }
}
