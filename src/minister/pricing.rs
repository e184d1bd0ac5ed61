//! Gross price calculation for scraped net prices.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// German VAT multiplier (19%). Scraped analytics prices are net.
pub const TAX_MULTIPLIER: Decimal = Decimal::from_parts(119, 0, 0, false, 2);

/// Decimal places kept for currency values.
pub const CURRENCY_SCALE: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price \"{raw}\": {reason}")]
    Invalid { raw: String, reason: String },

    #[error("price {raw} overflows after tax")]
    Overflow { raw: String },
}

/// Parses a net price and returns the gross price rounded to cents.
///
/// Rounding is half-to-even, the default of decimal quantization.
pub fn apply_tax(raw: &str) -> Result<Decimal, PriceError> {
    let trimmed = raw.trim();
    let net = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| PriceError::Invalid { raw: raw.to_string(), reason: e.to_string() })?;

    net.checked_mul(TAX_MULTIPLIER)
        .map(|gross| gross.round_dp(CURRENCY_SCALE))
        .ok_or_else(|| PriceError::Overflow { raw: raw.to_string() })
}
