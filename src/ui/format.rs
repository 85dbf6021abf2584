use rust_decimal::Decimal;

pub const CURRENCY_SYMBOL: &str = "₹";

/// ₹1,234,567.50 — fixed symbol, thousands separators, two decimals.
/// Presentation only; engine types stay plain `Decimal`.
pub fn currency(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_groups_thousands() {
        assert_eq!(currency(dec("1234567.5")), "₹1,234,567.50");
        assert_eq!(currency(dec("1000")), "₹1,000.00");
    }

    #[test]
    fn test_currency_small_values() {
        assert_eq!(currency(dec("0")), "₹0.00");
        assert_eq!(currency(dec("12")), "₹12.00");
        assert_eq!(currency(dec("999.9")), "₹999.90");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(currency(dec("-1234.5")), "-₹1,234.50");
    }
}
