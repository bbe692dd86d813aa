//! Consumption calculator.
//!
//! Converts a monthly household consumption in kWh into yearly TWh-style
//! units and expresses it against a fixed reference of 0.32.

use crate::data::numeric::leading_float;

const MONTHS_PER_YEAR: f64 = 12.0;
const REFERENCE: f64 = 0.32;

/// `(consumption / 1000 * 12) / 0.32`
pub fn consumption_percentage(consumption: f64) -> f64 {
    let total = consumption / 1000.0 * MONTHS_PER_YEAR;
    total / REFERENCE
}

pub fn format_percentage(consumption: f64) -> String {
    format!("Porcentaje Total: {}%", to_fixed(consumption_percentage(consumption), 2))
}

/// Format the result for raw user input.
///
/// The input is read like a form field: the longest leading number wins
/// (`"500 kWh"` reads as 500) and anything unreadable becomes NaN.
pub fn percentage_from_input(input: &str) -> String {
    format_percentage(leading_float(input).unwrap_or(f64::NAN))
}

/// Fixed-point rendering with browser `toFixed` rounding.
///
/// Rounds the exact binary value half away from zero (so 1.125 gives "1.13"),
/// and negative zero prints without a sign.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Finite doubles have at most 1074 fractional digits, so this is exact.
    let exact = format!("{:.1074}", x.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .map(|b| b - b'0')
        .collect();
    if frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        round_up(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if x < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|&d| char::from(b'0' + d)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|&d| char::from(b'0' + d)));
    }
    out
}

fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
