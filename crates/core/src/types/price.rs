//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are plain decimal amounts in US dollars. Display goes
//! through [`format_currency`], which follows `en-US` currency conventions:
//!
//! ```rust
//! use dessert_cart_core::format_currency;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_currency(Decimal::new(650, 2)), "$6.50");
//! assert_eq!(format_currency(Decimal::new(123_450, 2)), "$1,234.50");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a US dollar price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_with_symbol(self.amount, self.currency_code.symbol())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

/// Format a dollar amount using US currency conventions.
///
/// Two decimal places (half away from zero), comma thousands separators and
/// a leading minus for negative amounts: `-$1,234.50`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format_with_symbol(amount, CurrencyCode::USD.symbol())
}

fn format_with_symbol(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!("{sign}{symbol}{}.{cents}", group_thousands(whole))
}

/// Insert a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_pads_cents() {
        assert_eq!(format_currency(Decimal::new(65, 1)), "$6.50");
        assert_eq!(format_currency(Decimal::from(10)), "$10.00");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(Decimal::from(1000)), "$1,000.00");
        assert_eq!(format_currency(Decimal::new(123_456_789, 2)), "$1,234,567.89");
        assert_eq!(format_currency(Decimal::from(999)), "$999.00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(Decimal::new(1005, 3)), "$1.01");
        assert_eq!(format_currency(Decimal::new(1004, 3)), "$1.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(Decimal::new(-123_450, 2)), "-$1,234.50");
        assert_eq!(format_currency(Decimal::new(-1, 3)), "$0.00");
    }

    #[test]
    fn test_price_display_uses_currency_symbol() {
        let price = Price::usd(Decimal::new(450, 2));
        assert_eq!(price.display(), "$4.50");
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }
}
