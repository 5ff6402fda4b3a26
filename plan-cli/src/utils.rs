use plan_core::Age;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats money as `$1,234.56`, with a leading minus for negatives.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a fractional rate as a percentage, e.g. `0.1060` → `10.60%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}

/// Formats an optional age, using "—" when `None`.
pub fn opt_age_display(age: Option<Age>) -> String {
    age.map(|a| a.to_string())
        .unwrap_or_else(|| "—".to_string())
}
