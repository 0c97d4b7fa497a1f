//! Transfer function synthesis
//!
//! Builds the closed-form transfer function of the equalizer for a gain
//! setting, first as a rational function of the unit delay `w = z^-1` and then
//! rewritten in positive powers of `z` for display.

mod polynomial;
mod rational;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsp::{design_fir, FilterKind, GainVector, IirCascade};
use crate::error::Result;

pub use polynomial::{format_significant, round_significant, Polynomial};
pub use rational::{RationalFunction, Variable};

/// Rendered transfer function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFunction {
    /// Plain text, possibly spanning three lines
    pub text: String,
    /// LaTeX math-mode source
    pub latex: String,
}

impl From<&RationalFunction> for TransferFunction {
    fn from(function: &RationalFunction) -> Self {
        Self {
            text: function.to_text(),
            latex: function.to_latex(),
        }
    }
}

/// H(z) for `gains` realized with `kind` at `sample_rate`
pub fn transfer_function(
    gains: &GainVector,
    sample_rate: u32,
    kind: FilterKind,
) -> Result<RationalFunction> {
    let in_delay = match kind {
        FilterKind::Iir => {
            let cascade = IirCascade::from_gains(gains, sample_rate)?;
            cascade
                .sections()
                .iter()
                .fold(RationalFunction::one(Variable::Delay), |acc, section| {
                    let factor = RationalFunction::ratio(
                        Polynomial::from_filter_coefficients(&section.b),
                        Polynomial::from_filter_coefficients(&section.a),
                        Variable::Delay,
                    );
                    acc.multiply(&factor)
                })
        }
        FilterKind::Fir => {
            let kernel = design_fir(gains, sample_rate)?;
            RationalFunction::polynomial(
                Polynomial::from_filter_coefficients(kernel.taps()),
                Variable::Delay,
            )
        }
    };

    let function = in_delay.substitute_inverse();
    debug!(
        kind = %kind,
        numerator_degree = ?function.numerator().degree(),
        denominator_degree = ?function.denominator().degree(),
        "Synthesized transfer function"
    );
    Ok(function)
}

/// Render the transfer function for `gains` as text and LaTeX
pub fn synthesize(gains: &GainVector, sample_rate: u32, kind: FilterKind) -> Result<TransferFunction> {
    let function = transfer_function(gains, sample_rate, kind)?;
    Ok(TransferFunction::from(&function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{evaluate_response, magnitude_to_db, FIR_TAPS};
    use pretty_assertions::assert_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_flat_iir_is_one() {
        let tf = synthesize(&GainVector::flat(), 44100, FilterKind::Iir).unwrap();
        assert_eq!(
            tf,
            TransferFunction {
                text: "1".to_string(),
                latex: "1".to_string(),
            }
        );
    }

    #[test]
    fn test_sub_threshold_gains_are_one() {
        let gains = GainVector::from([0.0005, -0.0009, 0.0, 0.0, 0.0]);
        let tf = synthesize(&gains, 48000, FilterKind::Iir).unwrap();
        assert_eq!(tf.text, "1");
    }

    #[test]
    fn test_flat_fir_is_pure_delay() {
        let function = transfer_function(&GainVector::flat(), 44100, FilterKind::Fir).unwrap();
        let group_delay = (FIR_TAPS - 1) / 2;
        assert!(function.numerator().is_one());
        assert_eq!(function.denominator(), &Polynomial::monomial(group_delay));

        let tf = TransferFunction::from(&function);
        assert_eq!(tf.latex, format!("\\frac{{1}}{{z^{{{}}}}}", group_delay));
    }

    #[test]
    fn test_single_band_is_second_order() {
        let gains = GainVector::from([0.0, 0.0, 6.0, 0.0, 0.0]);
        let function = transfer_function(&gains, 44100, FilterKind::Iir).unwrap();
        assert_eq!(function.variable(), Variable::Z);
        assert_eq!(function.numerator().degree(), Some(2));
        assert_eq!(function.denominator().degree(), Some(2));

        // Monic denominator from a0 == 1
        assert_eq!(function.denominator().coefficients()[2], 1.0);

        let tf = TransferFunction::from(&function);
        assert_eq!(tf.text.lines().count(), 3);
        assert!(tf.latex.starts_with("\\frac{"));
    }

    #[test]
    fn test_two_bands_multiply_orders() {
        let gains = GainVector::from([0.0, 0.0, 4.0, -3.0, 0.0]);
        let function = transfer_function(&gains, 44100, FilterKind::Iir).unwrap();
        assert_eq!(function.numerator().degree(), Some(4));
        assert_eq!(function.denominator().degree(), Some(4));
    }

    #[test]
    fn test_symbolic_matches_numeric_response() {
        let sample_rate = 44100;
        let gains = GainVector::from([0.0, 0.0, 6.0, -4.0, 0.0]);
        let function = transfer_function(&gains, sample_rate, FilterKind::Iir).unwrap();
        let response = evaluate_response(&gains, sample_rate, FilterKind::Iir).unwrap();

        for (frequency, expected_db) in response.frequencies.iter().zip(&response.magnitude_db) {
            let omega = 2.0 * PI * frequency / sample_rate as f64;
            let symbolic_db = magnitude_to_db(function.evaluate(omega).norm());
            assert!(
                (symbolic_db - expected_db).abs() < 0.05,
                "At {:.1} Hz: symbolic {:.4} dB vs numeric {:.4} dB",
                frequency,
                symbolic_db,
                expected_db
            );
        }
    }

    #[test]
    fn test_fir_polynomial_has_no_denominator_in_delay_form() {
        let gains = GainVector::from([3.0, 0.0, 0.0, 0.0, -3.0]);
        let function = transfer_function(&gains, 44100, FilterKind::Fir).unwrap();
        // Taps reversed over z^(taps - 1)
        assert!(function.numerator().degree().unwrap() <= FIR_TAPS - 1);
        assert_eq!(function.denominator().lowest_power(), Some(function.denominator().degree().unwrap()));
    }

    #[test]
    fn test_serializes() {
        let tf = synthesize(&GainVector::flat(), 8000, FilterKind::Iir).unwrap();
        let json = serde_json::to_value(&tf).unwrap();
        assert_eq!(json["text"], "1");
        assert_eq!(json["latex"], "1");
    }
}
