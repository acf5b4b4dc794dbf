//! Display formatting for rand amounts and rates.

use rust_decimal::{Decimal, RoundingStrategy};

const CURRENCY_SYMBOL: &str = "R";

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats an amount as whole rand with space-separated thousands,
/// e.g. `R1 234 567`.
pub fn format_rand(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().normalize().to_string();
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_thousands(&digits))
}

/// Formats a percentage value (already scaled to 0-100) with one decimal.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

/// Formats a fractional rate as a whole percentage, e.g. `0.18` as `18%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{percent}%")
}
