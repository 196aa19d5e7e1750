use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Money is an exact decimal so sums never drift; rounding to cents happens
/// only when an amount is displayed.
pub type Amount = Decimal;

/// Largest exponent accepted in scientific notation such as `2.5e3`.
const MAX_EXPONENT: u32 = 28;

/// Format an amount with exactly two decimal places.
/// Example: 50 -> "50.00", -12.345 -> "-12.35", 0.012 -> "0.01"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Amounts that round to zero print without a sign
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.2}", rounded)
}

/// Parse a decimal string into an exact amount.
/// Example: "50.00" -> 50, "+12.5" -> 12.5, "-2.5e2" -> -250
///
/// An optional leading `+` or `-` is accepted, as is a finite exponent.
/// Infinities, NaN, digit separators and empty digit sequences are not amounts.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    let (negative, unsigned) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let (units, decimals) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if units.is_empty() && decimals.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !units.bytes().all(|b| b.is_ascii_digit()) || !decimals.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseAmountError::InvalidFormat);
    }

    let units = if units.is_empty() { "0" } else { units };
    let normalized = if decimals.is_empty() {
        units.to_string()
    } else {
        format!("{units}.{decimals}")
    };
    let mut value = Decimal::from_str(&normalized).map_err(|_| ParseAmountError::OutOfRange)?;

    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError::InvalidFormat);
        }
        let power: u32 = digits.parse().map_err(|_| ParseAmountError::OutOfRange)?;
        if power > MAX_EXPONENT {
            return Err(ParseAmountError::OutOfRange);
        }
        for _ in 0..power {
            value = if exponent.starts_with('-') {
                value.checked_div(Decimal::TEN)
            } else {
                value.checked_mul(Decimal::TEN)
            }
            .ok_or(ParseAmountError::OutOfRange)?;
        }
    }

    Ok(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::OutOfRange => write!(f, "amount is out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Amount {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(amount("50")), "50.00");
        assert_eq!(format_amount(amount("12.34")), "12.34");
        assert_eq!(format_amount(amount("0.01")), "0.01");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(amount("-50")), "-50.00");
        assert_eq!(format_amount(amount("-12.345")), "-12.35");
        assert_eq!(format_amount(amount("0.012")), "0.01");
        assert_eq!(format_amount(amount("-0.001")), "0.00");
        assert_eq!(
            format_amount(amount("180000000000000000")),
            "180000000000000000.00"
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(amount("50")));
        assert_eq!(parse_amount("50"), Ok(amount("50")));
        assert_eq!(parse_amount("+500.5"), Ok(amount("500.5")));
        assert_eq!(parse_amount("-100"), Ok(amount("-100")));
        assert_eq!(parse_amount(".50"), Ok(amount("0.5")));
        assert_eq!(parse_amount("12."), Ok(amount("12")));
        assert_eq!(parse_amount(" -7.25 "), Ok(amount("-7.25")));
    }

    #[test]
    fn test_parse_amount_keeps_every_digit() {
        assert_eq!(parse_amount("+0.004"), Ok(amount("0.004")));
        assert_eq!(parse_amount("-3.335"), Ok(amount("-3.335")));
    }

    #[test]
    fn test_parse_amount_scientific() {
        assert_eq!(parse_amount("+1e3"), Ok(amount("1000")));
        assert_eq!(parse_amount("-2.5e2"), Ok(amount("-250")));
        assert_eq!(parse_amount("1.5E+1"), Ok(amount("15")));
        assert_eq!(parse_amount("25e-2"), Ok(amount("0.25")));
        assert_eq!(parse_amount("1e99"), Err(ParseAmountError::OutOfRange));
    }

    #[test]
    fn test_parse_amount_invalid() {
        for input in [
            "abc", "-abc", "12.34.56", "+", "-.", "inf", "-inf", "nan", "--5", "", "1,5", "1_000",
            "1e", "e3", "1e+", "1e3.5",
        ] {
            assert_eq!(
                parse_amount(input),
                Err(ParseAmountError::InvalidFormat),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_amount_out_of_range() {
        assert_eq!(
            parse_amount("999999999999999999999999999999"),
            Err(ParseAmountError::OutOfRange)
        );
    }
}
