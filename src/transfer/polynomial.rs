//! Dense real polynomials in a single variable

use rustfft::num_complex::Complex64;

/// Coefficients smaller than this are treated as exactly zero on insertion
const DROP_THRESHOLD: f64 = 1e-10;

/// Significant figures kept for inserted coefficients
const SIGNIFICANT_DIGITS: usize = 6;

/// Rounded values below this snap to zero
const SNAP_THRESHOLD: f64 = 1e-8;

/// Polynomial with coefficient `i` multiplying `x^i`.
///
/// Trailing zero coefficients are never stored, so the zero polynomial has no
/// coefficients and `degree` is well defined for everything else.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Build from filter coefficients: tiny values are dropped and the rest
    /// rounded to six significant figures so the rendering stays readable
    pub fn from_filter_coefficients(coeffs: &[f64]) -> Self {
        Self::new(
            coeffs
                .iter()
                .map(|&c| {
                    if c.abs() < DROP_THRESHOLD {
                        0.0
                    } else {
                        round_significant(c)
                    }
                })
                .collect(),
        )
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    /// `x^power`
    pub fn monomial(power: usize) -> Self {
        let mut coeffs = vec![0.0; power + 1];
        coeffs[power] = 1.0;
        Self { coeffs }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// None for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// True for a constant equal to exactly 1
    pub fn is_one(&self) -> bool {
        self.coeffs == [1.0]
    }

    /// Lowest power with a non-zero coefficient
    pub fn lowest_power(&self) -> Option<usize> {
        self.coeffs.iter().position(|&c| c != 0.0)
    }

    /// Constant polynomial value, if this is one
    pub fn as_constant(&self) -> Option<f64> {
        match self.coeffs.as_slice() {
            [] => Some(0.0),
            [c] => Some(*c),
            _ => None,
        }
    }

    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::default();
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::new(coeffs)
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    /// Divide by `x^power`; the caller guarantees the low coefficients are zero
    pub fn shift_down(&self, power: usize) -> Polynomial {
        Polynomial::new(self.coeffs.iter().skip(power).copied().collect())
    }

    /// `x^degree * p(1/x)`: coefficient `i` moves to `degree - i`
    pub fn reversed(&self, degree: usize) -> Polynomial {
        debug_assert!(self.degree().map_or(true, |d| d <= degree));
        let mut coeffs = vec![0.0; degree + 1];
        for (i, &c) in self.coeffs.iter().enumerate() {
            coeffs[degree - i] = c;
        }
        Polynomial::new(coeffs)
    }

    /// Horner evaluation at a complex point
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    }

    /// Plain text, descending powers: `1.5*z^2 - z + 0.25`
    pub fn to_text(&self, symbol: &str) -> String {
        self.render(|coeff, power| {
            let power_part = match power {
                0 => String::new(),
                1 => symbol.to_string(),
                p => format!("{}^{}", symbol, p),
            };
            match (coeff, power) {
                (None, _) => power_part,
                (Some(c), 0) => format_significant(c),
                (Some(c), _) => format!("{}*{}", format_significant(c), power_part),
            }
        })
    }

    /// LaTeX, descending powers: `1.5 z^{2} - z + 0.25`
    pub fn to_latex(&self, symbol: &str) -> String {
        self.render(|coeff, power| {
            let power_part = match power {
                0 => String::new(),
                1 => symbol.to_string(),
                p => format!("{}^{{{}}}", symbol, p),
            };
            match (coeff, power) {
                (None, _) => power_part,
                (Some(c), 0) => latex_number(c),
                (Some(c), _) => format!("{} {}", latex_number(c), power_part),
            }
        })
    }

    /// Shared term layout. `term` receives the absolute coefficient (None
    /// when it is 1 and can be elided) and the power.
    fn render(&self, term: impl Fn(Option<f64>, usize) -> String) -> String {
        let mut out = String::new();
        for (power, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0.0 {
                continue;
            }
            let magnitude = c.abs();
            let shown = if magnitude == 1.0 && power > 0 {
                None
            } else {
                Some(magnitude)
            };
            if out.is_empty() {
                if c < 0.0 {
                    out.push('-');
                }
            } else {
                out.push_str(if c < 0.0 { " - " } else { " + " });
            }
            out.push_str(&term(shown, power));
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

/// Round to six significant figures, snapping tiny values to zero
pub fn round_significant(value: f64) -> f64 {
    if value.abs() < SNAP_THRESHOLD {
        return 0.0;
    }
    format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Six significant digits with trailing zeros trimmed, switching to
/// exponent notation for very large or small magnitudes
pub fn format_significant(value: f64) -> String {
    let rounded = round_significant(value);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let exponent = rounded.abs().log10().floor() as i32;
    if !(-4..6).contains(&exponent) {
        let formatted = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, rounded);
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        return format!("{}e{}", trim_zeros(mantissa), exp);
    }
    let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, rounded)).to_string()
}

fn latex_number(value: f64) -> String {
    let text = format_significant(value);
    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{} \\cdot 10^{{{}}}", mantissa, exp),
        None => text,
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
