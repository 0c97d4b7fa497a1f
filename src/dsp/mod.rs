//! Equalizer DSP
//!
//! Filter synthesis and application for the five fixed bands. Every
//! operation here is a pure function of its inputs.

mod bands;
mod biquad;
mod fir;
mod iir;
mod response;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EqError;

pub use bands::{Band, GainVector, BAND_COUNT, EQ_BANDS};
pub use biquad::{design_peaking, BiquadSection};
pub use fir::{apply_fir, apply_fir_gains, design_fir, fir_breakpoints, FirKernel, FIR_TAPS};
pub use iir::{apply_iir, IirCascade, SKIP_GAIN_DB};
pub use response::{
    evaluate_response, magnitude_to_db, response_grid, FrequencyResponse, RESPONSE_MAX_HZ,
    RESPONSE_MIN_HZ, RESPONSE_POINTS,
};

/// Filter family used to realize the gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum FilterKind {
    /// Cascade of peaking biquads
    #[default]
    #[serde(rename = "IIR")]
    Iir,
    /// Single linear-phase kernel
    #[serde(rename = "FIR")]
    Fir,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Iir => "IIR",
            FilterKind::Fir => "FIR",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = EqError;

    /// Case-insensitive: "iir", "IIR", "Fir", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("iir") {
            Ok(FilterKind::Iir)
        } else if s.eq_ignore_ascii_case("fir") {
            Ok(FilterKind::Fir)
        } else {
            Err(EqError::UnsupportedFilterKind {
                kind: s.to_string(),
            })
        }
    }
}

impl TryFrom<String> for FilterKind {
    type Error = EqError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("IIR", FilterKind::Iir)]
    #[test_case("iir", FilterKind::Iir)]
    #[test_case("Fir", FilterKind::Fir)]
    #[test_case("FIR", FilterKind::Fir)]
    fn test_parse_case_insensitive(input: &str, expected: FilterKind) {
        assert_eq!(input.parse::<FilterKind>().unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("biquad" ; "unknown")]
    #[test_case(" iir" ; "padded")]
    fn test_parse_rejects(input: &str) {
        assert!(matches!(
            input.parse::<FilterKind>(),
            Err(EqError::UnsupportedFilterKind { .. })
        ));
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&FilterKind::Fir).unwrap(), "\"FIR\"");
        let kind: FilterKind = serde_json::from_str("\"iir\"").unwrap();
        assert_eq!(kind, FilterKind::Iir);
        assert!(serde_json::from_str::<FilterKind>("\"notch\"").is_err());
    }
}
