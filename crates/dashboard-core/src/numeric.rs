//! Numeric coercion and display formatting
//!
//! Report fields arrive untyped: a field may be missing, `null`, a JSON number
//! or a numeric string. Everything that is summed or divided goes through
//! [`coerce_numeric`] so the zero policy is applied in exactly one place.

use serde_json::Value;

/// Coerce an untyped wire value into a finite `f64`, defaulting to 0.
///
/// - missing / `null` / booleans / arrays / objects → 0
/// - numbers → their value
/// - strings → leading numeric prefix after trimming (`"12.5kg"` → 12.5)
/// - anything non-finite → 0
pub fn coerce_numeric(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_float_prefix(s),
        _ => None,
    };

    parsed.map_or(0.0, finite_or_zero)
}

/// `n` itself when finite, otherwise 0
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() { n } else { 0.0 }
}

/// Parse the longest leading decimal literal of `s`.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. Returns `None` when no digit is found before the first invalid
/// character.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Round to 2 decimal places
pub fn round2(n: f64) -> f64 {
    let scaled = n * 100.0;
    if scaled.is_finite() { scaled.round() / 100.0 } else { n }
}

/// `amount / quantity` rounded to 2 decimals, 0 when there is no quantity
pub fn safe_average(amount: f64, quantity: f64) -> f64 {
    if quantity > 0.0 { round2(finite_or_zero(amount / quantity)) } else { 0.0 }
}

/// Fixed-decimal display with ties rounded away from zero, as the browser's
/// `toFixed` does (`0.125` → `"0.13"`, where `{:.2}` gives `"0.12"`)
fn to_fixed(n: f64, digits: usize) -> String {
    let n = finite_or_zero(n);
    let scale = 10f64.powi(digits as i32);
    let scaled = n.abs() * scale;
    let rounded = if scaled.is_finite() { scaled.round() / scale } else { n.abs() };
    if rounded == 0.0 {
        format!("{:.*}", digits, 0.0)
    } else {
        format!("{:.*}", digits, rounded.copysign(n))
    }
}

/// Percentage string with one decimal, `"0.0%"` when the base is not positive
pub fn ratio_percent(part: f64, base: f64) -> String {
    if base > 0.0 {
        let percent = part * 100.0 / base;
        let percent = if percent.is_finite() { percent } else { part / base * 100.0 };
        format!("{}%", to_fixed(percent, 1))
    } else {
        "0.0%".to_string()
    }
}

/// Shortest display of a raw value (`10` rather than `10.0`)
pub fn format_plain(n: f64) -> String {
    let n = finite_or_zero(n);
    if n == 0.0 { "0".to_string() } else { format!("{}", n) }
}

/// Round to the nearest integer for display, halves toward +∞
pub fn format_rounded(n: f64) -> String {
    let rounded = (finite_or_zero(n) + 0.5).floor();
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// Fixed two-decimal display
pub fn format_fixed2(n: f64) -> String {
    to_fixed(n, 2)
}
