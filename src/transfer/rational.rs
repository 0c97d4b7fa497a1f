//! Ratios of polynomials in the delay symbol `w` or in `z`

use std::fmt;

use rustfft::num_complex::Complex64;

use super::polynomial::Polynomial;

/// The variable a rational function is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// Unit delay, `w = z^-1`
    Delay,
    /// `z` itself
    Z,
}

impl Variable {
    pub fn symbol(&self) -> &'static str {
        match self {
            Variable::Delay => "w",
            Variable::Z => "z",
        }
    }

    /// The point the variable takes on the unit circle at `omega`
    fn on_unit_circle(&self, omega: f64) -> Complex64 {
        match self {
            Variable::Delay => Complex64::from_polar(1.0, -omega),
            Variable::Z => Complex64::from_polar(1.0, omega),
        }
    }
}

/// `numerator / denominator`, kept in simplified form
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFunction {
    numerator: Polynomial,
    denominator: Polynomial,
    variable: Variable,
}

impl RationalFunction {
    /// The constant 1
    pub fn one(variable: Variable) -> Self {
        Self {
            numerator: Polynomial::one(),
            denominator: Polynomial::one(),
            variable,
        }
    }

    /// A polynomial over 1
    pub fn polynomial(numerator: Polynomial, variable: Variable) -> Self {
        Self::ratio(numerator, Polynomial::one(), variable)
    }

    /// `numerator / denominator`, simplified. A zero denominator is a caller
    /// bug: filter denominators always carry `a0 == 1`.
    pub fn ratio(numerator: Polynomial, denominator: Polynomial, variable: Variable) -> Self {
        debug_assert!(!denominator.is_zero(), "zero denominator");
        Self {
            numerator,
            denominator,
            variable,
        }
        .simplify()
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.denominator
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn is_one(&self) -> bool {
        self.numerator.is_one() && self.denominator.is_one()
    }

    /// Product of two functions in the same variable
    pub fn multiply(&self, other: &RationalFunction) -> RationalFunction {
        debug_assert_eq!(self.variable, other.variable);
        Self::ratio(
            self.numerator.multiply(&other.numerator),
            self.denominator.multiply(&other.denominator),
            self.variable,
        )
    }

    /// Rewrite a function of `w` as a function of `z` with `w = z^-1`.
    /// Both sides are multiplied by `z^d`, `d` the larger of the two degrees,
    /// which leaves polynomials in non-negative powers of `z`.
    pub fn substitute_inverse(&self) -> RationalFunction {
        debug_assert_eq!(self.variable, Variable::Delay);
        let degree = self
            .numerator
            .degree()
            .unwrap_or(0)
            .max(self.denominator.degree().unwrap_or(0));
        Self::ratio(
            self.numerator.reversed(degree),
            self.denominator.reversed(degree),
            Variable::Z,
        )
    }

    /// Cancel the common power of the variable and fold a constant
    /// denominator into the numerator
    fn simplify(self) -> Self {
        let variable = self.variable;
        if self.numerator.is_zero() {
            return Self {
                numerator: Polynomial::default(),
                denominator: Polynomial::one(),
                variable,
            };
        }

        let common = self
            .numerator
            .lowest_power()
            .unwrap_or(0)
            .min(self.denominator.lowest_power().unwrap_or(0));
        let mut numerator = self.numerator.shift_down(common);
        let mut denominator = self.denominator.shift_down(common);

        if let Some(constant) = denominator.as_constant() {
            if constant != 1.0 {
                numerator = numerator.scale(1.0 / constant);
                denominator = Polynomial::one();
            }
        }

        Self {
            numerator,
            denominator,
            variable,
        }
    }

    /// Value at the unit-circle point for normalized angular frequency `omega`
    pub fn evaluate(&self, omega: f64) -> Complex64 {
        let x = self.variable.on_unit_circle(omega);
        self.numerator.evaluate(x) / self.denominator.evaluate(x)
    }

    /// Plain-text rendering: one line for a polynomial, otherwise numerator
    /// and denominator centered over and under a dashed rule
    pub fn to_text(&self) -> String {
        let symbol = self.variable.symbol();
        let numerator = self.numerator.to_text(symbol);
        if self.denominator.is_one() {
            return numerator;
        }
        let denominator = self.denominator.to_text(symbol);
        let width = numerator.len().max(denominator.len());
        format!(
            "{}\n{}\n{}",
            center(&numerator, width),
            "-".repeat(width),
            center(&denominator, width)
        )
    }

    pub fn to_latex(&self) -> String {
        let symbol = self.variable.symbol();
        let numerator = self.numerator.to_latex(symbol);
        if self.denominator.is_one() {
            return numerator;
        }
        format!(
            "\\frac{{{}}}{{{}}}",
            numerator,
            self.denominator.to_latex(symbol)
        )
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn center(text: &str, width: usize) -> String {
    let pad = (width - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_renders_as_one() {
        let one = RationalFunction::one(Variable::Delay).substitute_inverse();
        assert!(one.is_one());
        assert_eq!(one.to_text(), "1");
        assert_eq!(one.to_latex(), "1");
    }

    #[test]
    fn test_common_power_cancelled() {
        // w^3 / w -> w^2
        let f = RationalFunction::ratio(
            Polynomial::monomial(3),
            Polynomial::monomial(1),
            Variable::Delay,
        );
        assert_eq!(f.numerator(), &Polynomial::monomial(2));
        assert!(f.denominator().is_one());
    }

    #[test]
    fn test_constant_denominator_folded() {
        let f = RationalFunction::ratio(
            Polynomial::new(vec![2.0, 4.0]),
            Polynomial::constant(2.0),
            Variable::Z,
        );
        assert_eq!(f.numerator().coefficients(), &[1.0, 2.0]);
        assert!(f.denominator().is_one());
    }

    #[test]
    fn test_substitute_biquad() {
        // (1 + 0.5w) / (1 - 0.25w^2) -> (z^2 + 0.5z) / (z^2 - 0.25)
        let f = RationalFunction::ratio(
            Polynomial::new(vec![1.0, 0.5]),
            Polynomial::new(vec![1.0, 0.0, -0.25]),
            Variable::Delay,
        );
        let g = f.substitute_inverse();
        assert_eq!(g.variable(), Variable::Z);
        assert_eq!(g.numerator().coefficients(), &[0.0, 0.5, 1.0]);
        assert_eq!(g.denominator().coefficients(), &[-0.25, 0.0, 1.0]);

        // Same value on the unit circle in either variable
        for omega in [0.1, 0.7, 2.5] {
            let a = f.evaluate(omega);
            let b = g.evaluate(omega);
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_substitute_pure_delay() {
        let f = RationalFunction::polynomial(Polynomial::monomial(4), Variable::Delay);
        let g = f.substitute_inverse();
        assert!(g.numerator().is_one());
        assert_eq!(g.denominator(), &Polynomial::monomial(4));
        assert_eq!(g.to_text(), " 1\n---\nz^4");
        assert_eq!(g.to_latex(), "\\frac{1}{z^{4}}");
    }

    #[test]
    fn test_text_fraction_layout() {
        let f = RationalFunction::ratio(
            Polynomial::new(vec![0.5, 1.0]),
            Polynomial::new(vec![-0.25, 0.0, 1.0]),
            Variable::Z,
        );
        assert_eq!(f.to_text(), " z + 0.5\n----------\nz^2 - 0.25");
        assert_eq!(f.to_latex(), "\\frac{z + 0.5}{z^{2} - 0.25}");
    }
}
