//! Number formatting for console output.

use rust_decimal::Decimal;

use crate::domain::money::{round_currency, round_qty, CURRENCY_DP, QTY_DP};

/// `1234567.891` -> `"1,234,567.89"`.
pub fn fmt_price(value: Decimal) -> String {
    with_thousands(round_currency(value), CURRENCY_DP)
}

/// `1234.5` -> `"1,234.5000"`.
pub fn fmt_qty(value: Decimal) -> String {
    with_thousands(round_qty(value), QTY_DP)
}

fn with_thousands(value: Decimal, dp: u32) -> String {
    let fixed = format!("{:.*}", dp as usize, value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
