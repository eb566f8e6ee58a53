//! Amount and date rendering for shell output.

use chrono::NaiveDate;
use tally_domain::TransactionKind;

const GROUPING_SEPARATOR: char = ',';

/// Formats `value` with two decimals, digit grouping and a leading symbol.
///
/// Negative values render as `-₹1,250.00`.
pub fn format_amount(symbol: &str, value: f64) -> String {
    let body = format_number(value.abs());
    if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

/// Amount prefixed with `+` for credits and `-` for debits.
pub fn format_signed(symbol: &str, kind: TransactionKind, amount: f64) -> String {
    let sign = match kind {
        TransactionKind::Credit => '+',
        TransactionKind::Debit => '-',
    };
    format!("{sign}{}", format_amount(symbol, amount))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_number(value: f64) -> String {
    let body = format!("{:.2}", value);
    match body.find('.') {
        Some(pos) => format!("{}{}", group_digits(&body[..pos]), &body[pos..]),
        None => group_digits(&body),
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    grouped
}
