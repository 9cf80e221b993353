use serde::{Deserialize, Serialize};

const NBSP: char = '\u{a0}';

/// Display currency for listing prices. Amounts are stored currency-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    #[default]
    Tenge,
    Ruble,
}

impl Currency {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Tenge => "₸",
            Self::Ruble => "₽",
        }
    }

    /// Formats a price with no fractional digits.
    ///
    /// Tenge renders as `1 250 000 ₸` (plain space before the sign) and rubles
    /// as `1 250 000 ₽` (no-break space before the sign). Digit groups are
    /// always separated by U+00A0.
    pub fn format(self, price: f64) -> String {
        let grouped = group_digits(price);
        match self {
            Self::Tenge => format!("{grouped} {}", self.symbol()),
            Self::Ruble => format!("{grouped}{NBSP}{}", self.symbol()),
        }
    }
}

pub fn format_price(price: f64, currency: Currency) -> String {
    currency.format(price)
}

fn group_digits(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    // f64::round rounds half away from zero, matching Intl's default.
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(digit);
    }
    grouped
}

/// Renders an area-like measure without a trailing `.0`.
pub fn format_measure(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenge_groups_thousands_with_no_break_space() {
        assert_eq!(format_price(1_250_000.0, Currency::Tenge), "1\u{a0}250\u{a0}000 ₸");
        assert_eq!(format_price(999.0, Currency::Tenge), "999 ₸");
        assert_eq!(format_price(1000.0, Currency::Tenge), "1\u{a0}000 ₸");
        assert_eq!(format_price(0.0, Currency::Tenge), "0 ₸");
    }

    #[test]
    fn ruble_uses_no_break_space_before_sign() {
        assert_eq!(
            format_price(5_000_000.0, Currency::Ruble),
            "5\u{a0}000\u{a0}000\u{a0}₽"
        );
    }

    #[test]
    fn fractions_round_half_away_from_zero() {
        assert_eq!(format_price(1499.5, Currency::Tenge), "1\u{a0}500 ₸");
        assert_eq!(format_price(1499.49, Currency::Tenge), "1\u{a0}499 ₸");
    }

    #[test]
    fn formatting_is_deterministic() {
        let first = format_price(87_654_321.4, Currency::Ruble);
        let second = format_price(87_654_321.4, Currency::Ruble);
        assert_eq!(first, second);
        assert_eq!(first, "87\u{a0}654\u{a0}321\u{a0}₽");
    }

    #[test]
    fn measures_drop_trailing_zero() {
        assert_eq!(format_measure(85.0), "85");
        assert_eq!(format_measure(85.5), "85.5");
        assert_eq!(format_measure(6.25), "6.25");
    }
}
