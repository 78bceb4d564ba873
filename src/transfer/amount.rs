//! Decimal amount parsing and balance formatting (18-decimal native units).

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::U256;

/// Fractional digits of the native asset.
pub const NATIVE_DECIMALS: u8 = 18;

/// Why an amount string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    NotPositive,
    /// Well-formed but beyond what a 256-bit wei value can hold.
    TooLarge,
}

/// Parse a user-entered decimal amount into wei.
///
/// Surrounding whitespace is ignored. Accepted input is ASCII digits with at
/// most one `.` and at most [`NATIVE_DECIMALS`] fractional digits. Anything
/// else, negative and zero included, is `NotPositive`.
pub fn parse_amount(input: &str) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (int, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int.is_empty() && frac.is_empty())
        || !digits(int)
        || !digits(frac)
        || frac.len() > NATIVE_DECIMALS as usize
    {
        return Err(AmountError::NotPositive);
    }

    let int = if int.is_empty() { "0" } else { int };
    let normalized = if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    };
    match parse_units(&normalized, NATIVE_DECIMALS) {
        Ok(ParseUnits::U256(wei)) if wei.is_zero() => Err(AmountError::NotPositive),
        Ok(ParseUnits::U256(wei)) => Ok(wei),
        Ok(ParseUnits::I256(_)) => Err(AmountError::NotPositive),
        Err(_) => Err(AmountError::TooLarge),
    }
}

/// Whole native units to wei.
pub fn whole_units(units: u64) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(NATIVE_DECIMALS))
}

/// Format wei with trailing zeros trimmed, keeping one fractional digit
/// (`5000000000000000000` → `5.0`).
pub fn format_amount(wei: U256) -> String {
    let full = format_units(wei, NATIVE_DECIMALS).unwrap_or_else(|_| wei.to_string());
    match full.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", int)
            } else {
                format!("{}.{}", int, frac)
            }
        }
        None => format!("{}.0", full),
    }
}

/// Format wei rounded to four decimals for balance display.
pub fn format_balance(wei: U256) -> String {
    let value: f64 = format_units(wei, NATIVE_DECIMALS)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);
    format!("{:.4}", value)
}
