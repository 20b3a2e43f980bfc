//! Numeric bounds and restriction strings.
//!
//! Descriptors express numeric constraints as a restriction string of the
//! form `"lb:ub"`, where either side may be left empty:
//!
//! | Restriction | Bounds |
//! |-------------|--------|
//! | `"1:10"` | `(1, 10)` |
//! | `":10"` | `(type minimum, 10)` |
//! | `"1:"` | `(1, type maximum)` |
//! | `""` | unrestricted |
//!
//! The type minimum/maximum is `i64::MIN`/`i64::MAX` for integers and
//! `-inf`/`+inf` for doubles.

use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// A numeric type that can carry [`Bounds`].
pub trait BoundedNumber: Copy + PartialOrd + FromStr + Display {
    /// Lower default when the restriction leaves the lower side empty.
    const LOWEST: Self;
    /// Upper default when the restriction leaves the upper side empty.
    const HIGHEST: Self;

    /// Text form used in restriction strings and parameter files.
    fn format(self) -> String;
}

impl BoundedNumber for i64 {
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;

    fn format(self) -> String {
        self.to_string()
    }
}

impl BoundedNumber for f64 {
    const LOWEST: Self = f64::NEG_INFINITY;
    const HIGHEST: Self = f64::INFINITY;

    fn format(self) -> String {
        format_number(self)
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds<T> {
    pub lower: T,
    pub upper: T,
}

impl<T: BoundedNumber> Bounds<T> {
    pub fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }

    /// Full-range bounds for the type.
    pub fn unbounded() -> Self {
        Self {
            lower: T::LOWEST,
            upper: T::HIGHEST,
        }
    }

    /// Parse a `"lb:ub"` restriction string.
    ///
    /// An empty (or whitespace-only) string yields [`Bounds::unbounded`].
    pub fn parse(restriction: &str) -> Result<Self, String> {
        let restriction = restriction.trim();
        if restriction.is_empty() {
            return Ok(Self::unbounded());
        }

        let (lower, upper) = restriction
            .split_once(':')
            .ok_or_else(|| format!("expected 'lb:ub' bounds, got '{}'", restriction))?;

        let lower = parse_side(lower, T::LOWEST)?;
        let upper = parse_side(upper, T::HIGHEST)?;
        if lower > upper {
            return Err(format!(
                "lower bound {} exceeds upper bound {}",
                lower.format(),
                upper.format()
            ));
        }

        Ok(Self { lower, upper })
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn has_lower(&self) -> bool {
        self.lower != T::LOWEST
    }

    pub fn has_upper(&self) -> bool {
        self.upper != T::HIGHEST
    }

    pub fn is_unbounded(&self) -> bool {
        !self.has_lower() && !self.has_upper()
    }

    /// Re-derive the restriction string; type defaults become empty sides.
    pub fn to_restriction(&self) -> String {
        if self.is_unbounded() {
            return String::new();
        }
        let lower = if self.has_lower() {
            self.lower.format()
        } else {
            String::new()
        };
        let upper = if self.has_upper() {
            self.upper.format()
        } else {
            String::new()
        };
        format!("{}:{}", lower, upper)
    }
}

fn parse_side<T: BoundedNumber>(raw: &str, default: T) -> Result<T, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<T>()
        .map_err(|_| format!("'{}' is not a valid bound", raw))
}

/// Format a double without trailing zeros or a trailing decimal point.
///
/// `1.50` becomes `"1.5"`, `2.0` becomes `"2"`.
pub fn format_number(value: f64) -> String {
    let mut text = value.to_string();
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_closed_range() {
        assert_eq!(Bounds::<i64>::parse("1:10").unwrap(), Bounds::new(1, 10));
        assert_eq!(
            Bounds::<f64>::parse("0.5:2.5").unwrap(),
            Bounds::new(0.5, 2.5)
        );
    }

    #[test]
    fn test_parse_open_sides() {
        let upper_only = Bounds::<f64>::parse(":10").unwrap();
        assert_eq!(upper_only.lower, f64::NEG_INFINITY);
        assert_eq!(upper_only.upper, 10.0);

        let lower_only = Bounds::<f64>::parse("1:").unwrap();
        assert_eq!(lower_only.lower, 1.0);
        assert_eq!(lower_only.upper, f64::INFINITY);

        let int_lower = Bounds::<i64>::parse("1:").unwrap();
        assert_eq!(int_lower.upper, i64::MAX);
    }

    #[test]
    fn test_parse_empty_is_unbounded() {
        assert_eq!(Bounds::<i64>::parse("").unwrap(), Bounds::unbounded());
        assert!(Bounds::<f64>::parse("  ").unwrap().is_unbounded());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Bounds::<i64>::parse("1-10").is_err());
        assert!(Bounds::<i64>::parse("a:3").is_err());
        assert!(Bounds::<i64>::parse("1.5:3").is_err());
        assert!(Bounds::<i64>::parse("10:1").is_err());
    }

    #[test]
    fn test_contains() {
        let bounds = Bounds::<i64>::parse("1:10").unwrap();
        assert!(bounds.contains(1));
        assert!(bounds.contains(10));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(11));
    }

    #[test]
    fn test_to_restriction() {
        assert_eq!(Bounds::<i64>::parse("1:10").unwrap().to_restriction(), "1:10");
        assert_eq!(Bounds::<f64>::parse(":2.50").unwrap().to_restriction(), ":2.5");
        assert_eq!(Bounds::<f64>::parse("3.0:").unwrap().to_restriction(), "3:");
        assert_eq!(Bounds::<i64>::unbounded().to_restriction(), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(100.0), "100");
    }
}
