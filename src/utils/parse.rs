//! Lenient numeric coercion for form input

use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Largest decimal exponent that still describes a finite `f64`. Text with a
/// larger positive exponent is treated like any other non-number.
const MAX_DECIMAL_EXPONENT: i64 = 308;

/// Parse a numeric form field, returning zero instead of failing.
///
/// Mirrors how a browser reads a number field: leading and trailing
/// whitespace is ignored and the longest numeric prefix is used, so
/// `"12.5 %"` reads as `12.5` and `"1,000"` reads as `1`. Missing, empty,
/// non-numeric and non-finite input (`"abc"`, `"NaN"`, `"1e999"`) all yield
/// zero. Negative values are passed through unchanged.
pub fn parse_amount_or_zero(input: Option<&str>) -> BigDecimal {
    let Some(text) = input else {
        return BigDecimal::from(0);
    };

    match leading_number(text.trim()) {
        Some(value) => value,
        None => {
            if !text.trim().is_empty() {
                tracing::debug!(input = text, "numeric field is not a number, using zero");
            }
            BigDecimal::from(0)
        }
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn leading_number(text: &str) -> Option<BigDecimal> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let sign = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            "-"
        }
        Some(b'+') => {
            pos = 1;
            ""
        }
        _ => "",
    };

    let int_start = pos;
    pos += count_digits(&bytes[pos..]);
    let int_part = &text[int_start..pos];

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let frac_end = frac_start + count_digits(&bytes[frac_start..]);
        frac_part = &text[frac_start..frac_end];
        pos = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent: i64 = 0;
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut cursor = pos + 1;
        let exponent_negative = match bytes.get(cursor) {
            Some(b'-') => {
                cursor += 1;
                true
            }
            Some(b'+') => {
                cursor += 1;
                false
            }
            _ => false,
        };
        let digits = count_digits(&bytes[cursor..]);
        if digits > 0 {
            let magnitude: i64 = text[cursor..cursor + digits]
                .parse()
                .unwrap_or(i64::MAX);
            if magnitude > MAX_DECIMAL_EXPONENT {
                // Underflows to zero or overflows to infinity; both read as zero.
                return if exponent_negative {
                    Some(BigDecimal::from(0))
                } else {
                    None
                };
            }
            exponent = if exponent_negative {
                -magnitude
            } else {
                magnitude
            };
        }
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = if frac_part.is_empty() {
        format!("{sign}{int_part}e{exponent}")
    } else {
        format!("{sign}{int_part}.{frac_part}e{exponent}")
    };

    BigDecimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> BigDecimal {
        parse_amount_or_zero(Some(text))
    }

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse("1000"), BigDecimal::from(1000));
        assert_eq!(parse("  1234.50 "), dec("1234.5"));
        assert_eq!(parse("+7"), BigDecimal::from(7));
        assert_eq!(parse("-3.25"), dec("-3.25"));
        assert_eq!(parse(".5"), dec("0.5"));
        assert_eq!(parse("5."), BigDecimal::from(5));
    }

    #[test]
    fn test_exponents() {
        assert_eq!(parse("1e3"), BigDecimal::from(1000));
        assert_eq!(parse("2.5E-1"), dec("0.25"));
        assert_eq!(parse("1e"), BigDecimal::from(1));
        assert_eq!(parse("1e-999"), BigDecimal::from(0));
        assert_eq!(parse("1e999"), BigDecimal::from(0));
    }

    #[test]
    fn test_numeric_prefix_wins() {
        assert_eq!(parse("12abc"), BigDecimal::from(12));
        assert_eq!(parse("1,000"), BigDecimal::from(1));
        assert_eq!(parse("18 %"), BigDecimal::from(18));
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse("abc"), BigDecimal::from(0));
        assert_eq!(parse(""), BigDecimal::from(0));
        assert_eq!(parse("   "), BigDecimal::from(0));
        assert_eq!(parse("NaN"), BigDecimal::from(0));
        assert_eq!(parse("Infinity"), BigDecimal::from(0));
        assert_eq!(parse("-"), BigDecimal::from(0));
        assert_eq!(parse("."), BigDecimal::from(0));
        assert_eq!(parse_amount_or_zero(None), BigDecimal::from(0));
    }
}
