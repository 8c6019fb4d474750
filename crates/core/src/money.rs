//! Peso amounts in centavos.
//!
//! All monetary values are unsigned integer centavos. Totals are exact;
//! floats never enter the arithmetic.

use thiserror::Error;

/// An amount in centavos (₱1.00 == 100).
pub type Centavos = u64;

/// Errors from parsing an operator-entered amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    /// The input was empty or not a decimal number.
    #[error("please enter a valid amount")]
    Invalid,

    /// The amount parsed to zero; payments must be positive.
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// Format centavos for display, e.g. `₱208.00`.
#[must_use]
pub fn format_centavos(amount: Centavos) -> String {
    format!("₱{}.{:02}", amount / 100, amount % 100)
}

/// Parse an operator-entered decimal string (`"250"`, `"250.5"`,
/// `"250.00"`) into centavos.
///
/// # Errors
///
/// Returns [`AmountParseError`] for malformed, negative, or zero input.
pub fn parse_amount(input: &str) -> Result<Centavos, AmountParseError> {
    let trimmed = input.trim();

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(AmountParseError::Invalid);
    }

    if !whole.chars().all(|c| c.is_ascii_digit()) || frac.len() > 2 {
        return Err(AmountParseError::Invalid);
    }

    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountParseError::Invalid);
    }

    let pesos: Centavos = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| AmountParseError::Invalid)?
    };

    let centavos: Centavos = match frac.len() {
        0 => 0,
        1 => frac.parse::<Centavos>().map_err(|_| AmountParseError::Invalid)? * 10,
        _ => frac.parse().map_err(|_| AmountParseError::Invalid)?,
    };

    let amount = pesos
        .checked_mul(100)
        .and_then(|p| p.checked_add(centavos))
        .ok_or(AmountParseError::Invalid)?;

    if amount == 0 {
        return Err(AmountParseError::NotPositive);
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_pesos_and_centavos() {
        assert_eq!(format_centavos(20_800), "₱208.00");
        assert_eq!(format_centavos(4_200), "₱42.00");
        assert_eq!(format_centavos(5), "₱0.05");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("250"), Ok(25_000));
        assert_eq!(parse_amount("250.00"), Ok(25_000));
        assert_eq!(parse_amount("250.5"), Ok(25_050));
        assert_eq!(parse_amount(".50"), Ok(50));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_amount(""), Err(AmountParseError::Invalid));
        assert_eq!(parse_amount("abc"), Err(AmountParseError::Invalid));
        assert_eq!(parse_amount("-5"), Err(AmountParseError::Invalid));
        assert_eq!(parse_amount("1.234"), Err(AmountParseError::Invalid));
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(parse_amount("0"), Err(AmountParseError::NotPositive));
        assert_eq!(parse_amount("0.00"), Err(AmountParseError::NotPositive));
    }
}
