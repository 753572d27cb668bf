//! Presentation helpers shared by the markdown formatters.
//!
//! Amounts use Western digit grouping and the rupee glyph; deltas carry an
//! explicit sign or a directional arrow.

/// Groups the integer part with commas and keeps up to two fraction digits,
/// dropping trailing zeros: `1234.5` renders as `1,234.5`.
#[must_use]
pub fn grouped(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(rendered.len() + whole.len() / 3 + 1);
    if value < 0.0 && rendered != "0.00" {
        out.push('-');
    }
    let digits = whole.len();
    for (index, ch) in whole.chars().enumerate() {
        if index > 0 && (digits - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// `₹` followed by the value with two decimals.
#[must_use]
pub fn rupees(value: f64) -> String {
    format!("₹{value:.2}")
}

/// `₹` followed by the grouped value.
#[must_use]
pub fn rupees_grouped(value: f64) -> String {
    format!("₹{}", grouped(value))
}

/// Renders large amounts in crores (`Cr`) or lakhs (`L`).
#[must_use]
pub fn large_number(value: f64) -> String {
    if value.abs() >= 10_000_000.0 {
        format!("{:.2} Cr", value / 10_000_000.0)
    } else if value.abs() >= 100_000.0 {
        format!("{:.2} L", value / 100_000.0)
    } else {
        grouped(value)
    }
}

/// Renders a fraction as a signed percentage: `0.15` becomes `+15.00%`.
#[must_use]
pub fn signed_percent(fraction: f64) -> String {
    let sign = if fraction >= 0.0 { "+" } else { "" };
    format!("{sign}{:.2}%", fraction * 100.0)
}

/// Leading `+` for non-negative values.
#[must_use]
pub const fn sign(value: f64) -> &'static str {
    if value >= 0.0 { "+" } else { "" }
}

#[must_use]
pub const fn arrow(value: f64) -> &'static str {
    if value >= 0.0 { "▲" } else { "▼" }
}

#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Compares a metric to its benchmark; values within 5% are in line.
#[must_use]
pub fn comparison(value: f64, benchmark: f64, higher_is_better: bool) -> &'static str {
    let in_line = if benchmark == 0.0 {
        value == 0.0
    } else {
        ((value - benchmark) / benchmark).abs() < 0.05
    };
    if in_line {
        return "◆ In line";
    }
    let is_higher = value > benchmark;
    if is_higher == higher_is_better {
        "✓ Better"
    } else {
        "✗ Worse"
    }
}

/// Drops a leading `EXCHANGE_` qualifier such as `NSE_` from a symbol.
#[must_use]
pub fn strip_exchange_prefix(symbol: &str) -> &str {
    match symbol.split_once('_') {
        Some((prefix, rest))
            if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_inserts_separators_and_trims_fraction() {
        assert_eq!(grouped(1_234_567.891), "1,234,567.89");
        assert_eq!(grouped(1500.0), "1,500");
        assert_eq!(grouped(1234.5), "1,234.5");
        assert_eq!(grouped(-478.8), "-478.8");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(0.0), "0");
    }

    #[test]
    fn large_numbers_use_indian_units() {
        assert_eq!(large_number(1_750_000_000_000.0), "175000.00 Cr");
        assert_eq!(large_number(250_000.0), "2.50 L");
        assert_eq!(large_number(5_000.0), "5,000");
    }

    #[test]
    fn signed_percent_keeps_sign() {
        assert_eq!(signed_percent(0.15), "+15.00%");
        assert_eq!(signed_percent(-0.035), "-3.50%");
    }

    #[test]
    fn exchange_prefix_is_stripped_only_when_uppercase() {
        assert_eq!(strip_exchange_prefix("NSE_RELIANCE"), "RELIANCE");
        assert_eq!(strip_exchange_prefix("BSE_TCS"), "TCS");
        assert_eq!(strip_exchange_prefix("RELIANCE"), "RELIANCE");
        assert_eq!(strip_exchange_prefix("nse_TCS"), "nse_TCS");
    }

    #[test]
    fn comparison_labels() {
        assert_eq!(comparison(25.8, 22.5, false), "✗ Worse");
        assert_eq!(comparison(0.45, 0.55, false), "✓ Better");
        assert_eq!(comparison(25.0, 25.0, true), "◆ In line");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("strong buy"), "Strong buy");
        assert_eq!(capitalize(""), "");
    }
}
