use num_complex::Complex;
use num_traits::Zero;
use std::fmt;
use std::str;

use crate::errors::*;

/// Calculation result: either a value or an error
pub type CalcResult = Result<Value, CalcError>;
pub(crate) type CalcErrorResult = Result<(), CalcError>;

/// An immutable complex number. Every operation consumes its arguments and
/// returns a fresh value; nothing is mutated in place. Equality is exact
/// component-wise `f64` comparison, matching the literal parsing contract.
#[derive(Clone, Copy, PartialEq)]
pub struct Value {
    c: Complex<f64>,
}

const F64_BUF_LEN: usize = 48;
pub(crate) fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.c.im >= 0.0 {
            write!(f, "{} + {}i", format_f64(self.c.re), format_f64(self.c.im))
        } else {
            write!(f, "{} - {}i", format_f64(self.c.re), format_f64(-self.c.im))
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Value({}, {})", self.c.re, self.c.im)
    }
}

// Parses an optionally signed run of digits with at most one decimal point.
// Anything looser than that (exponents, infinities, repeated dots) is
// rejected so that the literal grammar stays exact.
fn parse_signed(s: &str) -> Option<f64> {
    let body = match s.as_bytes().first() {
        Some(b'+') | Some(b'-') => &s[1..],
        _ => s,
    };
    if body.is_empty() || !body.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if body.bytes().any(|b| !b.is_ascii_digit() && b != b'.') {
        return None;
    }
    if body.bytes().filter(|b| *b == b'.').count() > 1 {
        return None;
    }
    s.parse::<f64>().ok()
}

impl Value {
    pub fn new(real: f64, imaginary: f64) -> Self {
        Value {
            c: Complex::new(real, imaginary),
        }
    }

    pub fn from_real(real: f64) -> Self {
        Value::new(real, 0.0)
    }

    pub fn real(&self) -> f64 {
        self.c.re
    }

    pub fn imaginary(&self) -> f64 {
        self.c.im
    }

    /// Returns true if both components are exactly zero
    pub fn is_zero(&self) -> bool {
        self.c.is_zero()
    }

    /// Convert &str to a complex value.
    /// The accepted form is: optional leading sign, real part (digits with an
    /// optional fractional part), a mandatory sign, imaginary part (may be
    /// empty, which means a coefficient of 1), terminated by `i` or `j`:
    /// `3+4i`, `-1.5-2j`, `0.5+i`.
    ///
    /// Whitespace inside the literal is ignored: `3 + 4i` is the same as
    /// `3+4i`. On any mismatch the function fails with
    /// `InvalidComplexLiteral` and no state is touched.
    pub fn from_str_complex(s: &str) -> CalcResult {
        let err = || CalcError::InvalidComplexLiteral(s.to_string());
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.replace('i', "j");
        let body = match compact.strip_suffix('j') {
            Some(b) => b,
            None => return Err(err()),
        };
        if body.is_empty() {
            return Err(err());
        }
        // the sign between the parts is mandatory; a sign at position 0
        // belongs to the real part
        let pos = match body[1..].find(|c| c == '+' || c == '-') {
            Some(p) => p + 1,
            None => return Err(err()),
        };
        let re = parse_signed(&body[..pos]).ok_or_else(err)?;
        let imag = &body[pos..];
        let im = if imag.len() == 1 {
            // bare sign: `3+i` and `3-i`
            if imag == "-" {
                -1.0
            } else {
                1.0
            }
        } else {
            parse_signed(imag).ok_or_else(err)?
        };
        Ok(Value::new(re, im))
    }

    /// Convert &str to a value with zero imaginary part: `12`, `3.5`, `-0.25`
    pub fn from_str_real(s: &str) -> CalcResult {
        match parse_signed(s) {
            Some(f) => Ok(Value::from_real(f)),
            None => Err(CalcError::InvalidExpression(s.to_string())),
        }
    }

    pub fn addition(self, rhs: Value) -> CalcResult {
        Ok(Value { c: self.c + rhs.c })
    }

    pub fn subtract(self, rhs: Value) -> CalcResult {
        Ok(Value { c: self.c - rhs.c })
    }

    pub fn multiply(self, rhs: Value) -> CalcResult {
        Ok(Value { c: self.c * rhs.c })
    }

    /// Complex division. A divisor with zero modulus fails with
    /// `DividedByZero` instead of silently producing NaN components.
    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        Ok(Value { c: self.c / rhs.c })
    }

    /// Principal square root. A negative real with zero imaginary part lands
    /// on the positive imaginary branch: `sqrt(-4+0i)` is `0+2i`.
    pub fn sqrt(self) -> CalcResult {
        Ok(Value { c: self.c.sqrt() })
    }

    /// Inverts the sign of both components
    pub fn negate(self) -> CalcResult {
        Ok(Value { c: -self.c })
    }
}

/// Applies a binary operator symbol to two values: `lhs <op> rhs`
pub fn apply_operator(op: char, lhs: Value, rhs: Value) -> CalcResult {
    match op {
        '+' => lhs.addition(rhs),
        '-' => lhs.subtract(rhs),
        '*' => lhs.multiply(rhs),
        '/' => lhs.divide(rhs),
        _ => Err(CalcError::InvalidOperator(op)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complex() {
        let v = Value::from_str_complex("3+4i");
        assert_eq!(v, Ok(Value::new(3.0, 4.0)));
        let v = Value::from_str_complex("-1.5-2j");
        assert_eq!(v, Ok(Value::new(-1.5, -2.0)));
        let v = Value::from_str_complex("+0.5+.25i");
        assert_eq!(v, Ok(Value::new(0.5, 0.25)));
        let v = Value::from_str_complex("3 + 4i");
        assert_eq!(v, Ok(Value::new(3.0, 4.0)));
        // empty imaginary magnitude means coefficient 1
        let v = Value::from_str_complex("3+i");
        assert_eq!(v, Ok(Value::new(3.0, 1.0)));
        let v = Value::from_str_complex("3-j");
        assert_eq!(v, Ok(Value::new(3.0, -1.0)));
    }

    #[test]
    fn test_parse_complex_rejects() {
        for s in &["3", "3i", "3+4", "i", "3++4i", "3+4k", "1e2+4i", "3.1.5+4i", "+i", ""] {
            assert!(Value::from_str_complex(s).is_err(), "accepted '{}'", s);
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(format!("{}", Value::new(3.0, 4.0)), "3.0 + 4.0i");
        assert_eq!(format!("{}", Value::new(-1.0, -2.0)), "-1.0 - 2.0i");
        assert_eq!(format!("{}", Value::new(0.0, 0.0)), "0.0 + 0.0i");
        assert_eq!(format!("{}", Value::new(13.0, 0.0)), "13.0 + 0.0i");
    }

    #[test]
    fn test_render_roundtrip() {
        for s in &["3+4i", "-1.5-2j", "0.25+0.125i", "-3-4i"] {
            let v = Value::from_str_complex(s).unwrap();
            let back = Value::from_str_complex(&format!("{}", v)).unwrap();
            assert_eq!(v, back, "roundtrip of '{}'", s);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Value::new(1.0, 2.0);
        let b = Value::new(3.0, -1.0);
        assert_eq!(a.addition(b), Ok(Value::new(4.0, 1.0)));
        assert_eq!(a.subtract(b), Ok(Value::new(-2.0, 3.0)));
        // (1+2i)(3-i) = 3 - i + 6i - 2i^2 = 5 + 5i
        assert_eq!(a.multiply(b), Ok(Value::new(5.0, 5.0)));
        assert_eq!(a.negate(), Ok(Value::new(-1.0, -2.0)));
    }

    #[test]
    fn test_divide_by_zero() {
        let v = Value::new(1.0, 0.0).divide(Value::new(0.0, 0.0));
        assert_eq!(v, Err(CalcError::DividedByZero("1.0 + 0.0i".to_string())));
        // nonzero imaginary part is a valid divisor
        let v = Value::new(2.0, 0.0).divide(Value::new(0.0, 2.0));
        assert_eq!(v, Ok(Value::new(0.0, -1.0)));
    }

    #[test]
    fn test_sqrt_negative_real() {
        let v = Value::new(-4.0, 0.0).sqrt().unwrap();
        assert!(v.real().abs() < 1e-12);
        assert!((v.imaginary() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_operator() {
        let a = Value::from_real(7.0);
        let b = Value::from_real(2.0);
        assert_eq!(apply_operator('-', a, b), Ok(Value::from_real(5.0)));
        assert_eq!(apply_operator('/', a, b), Ok(Value::from_real(3.5)));
        assert_eq!(apply_operator('%', a, b), Err(CalcError::InvalidOperator('%')));
    }
}
