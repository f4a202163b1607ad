//! Pure parsing and formatting for rupiah amounts and numeric literals.
//!
//! Both the intent side (quantity extraction) and the cart side (price
//! reconstruction from display strings) go through these functions so the
//! extraction policy stays in one unit-testable place.

use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount as whole rupiah with `.`-grouped thousands,
/// e.g. `Rp 25.000`.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// First contiguous run of ASCII digits in the text, if any.
pub fn first_integer(text: &str) -> Option<u64> {
    let mut digits = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Parse the first monetary amount out of free text, aware of `.`/`,`
/// thousands separators. Unparsable text falls back to zero, never an error.
pub fn parse_amount(text: &str) -> Decimal {
    let Some(run) = first_number_run(text) else {
        return Decimal::ZERO;
    };
    normalize_separators(&run).parse().unwrap_or(Decimal::ZERO)
}

fn first_number_run(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(|ch| ch.is_ascii_digit())?;

    let mut run = String::new();
    let mut index = start;
    while index < chars.len() {
        let ch = chars[index];
        if ch.is_ascii_digit() {
            run.push(ch);
            index += 1;
        } else if matches!(ch, '.' | ',')
            && chars.get(index + 1).is_some_and(|next| next.is_ascii_digit())
        {
            run.push(ch);
            index += 1;
        } else {
            break;
        }
    }
    Some(run)
}

fn normalize_separators(run: &str) -> String {
    let groups: Vec<&str> = run.split(['.', ',']).collect();
    let Some((_, rest)) = groups.split_first() else {
        return run.to_string();
    };
    if rest.is_empty() {
        return run.to_string();
    }

    if rest.iter().all(|group| group.len() == 3) {
        // every separator marks a thousands group
        return groups.concat();
    }
    if rest.len() == 1 {
        // a single separator with a non-3-digit tail is a decimal point
        return format!("{}.{}", groups[0], rest[0]);
    }
    if rest[..rest.len() - 1].iter().all(|group| group.len() == 3) {
        // thousands groups followed by a decimal tail, e.g. 1.250.000,50
        let integral = groups[..groups.len() - 1].concat();
        return format!("{}.{}", integral, rest[rest.len() - 1]);
    }

    // ambiguous shape, let the caller's zero fallback kick in
    String::new()
}
