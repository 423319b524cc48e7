// Human-readable number formatting for display names and status text.

const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Compact magnitude rendering: 3 significant figures, then K/M/B/T
/// suffixes. 1,234,567 rounds to 1,230,000 and renders as "1.23M". The
/// divide loop is clamped at the trillion suffix, so quadrillions come out
/// as "1000T" rather than walking off the table.
pub fn compact_number(value: f64) -> String {
    let mut num = round_to_3_significant(value);
    let mut magnitude = 0;
    while num.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        num /= 1000.0;
        magnitude += 1;
    }
    format!("{}{}", trim_trailing(format!("{:.6}", num)), SUFFIXES[magnitude])
}

/// Fixed four decimal places with thousands separators, for price fields:
/// 1234.5 -> "1,234.5000".
pub fn grouped_price(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some(parts) => parts,
        None => (digits, "0000"),
    };
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

fn round_to_3_significant(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    // Round-trip through scientific notation: "{:.2e}" keeps exactly three
    // significant digits and avoids the off-by-one-ulp results that powi
    // scaling produces near magnitude boundaries (1000.0 must stay 1000.0).
    format!("{:.2e}", value).parse().unwrap_or(value)
}

fn trim_trailing(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_below_thousand() {
        assert_eq!(compact_number(999.0), "999");
        assert_eq!(compact_number(0.0), "0");
        assert_eq!(compact_number(12.5), "12.5");
    }

    #[test]
    fn test_compact_suffixes() {
        assert_eq!(compact_number(1000.0), "1K");
        assert_eq!(compact_number(1_230_000.0), "1.23M");
        assert_eq!(compact_number(2_500_000_000.0), "2.5B");
        assert_eq!(compact_number(7_000_000_000_000.0), "7T");
    }

    #[test]
    fn test_compact_rounds_to_3_significant() {
        // 1,234,567 -> 1,230,000 -> "1.23M"
        assert_eq!(compact_number(1_234_567.0), "1.23M");
        // 999,500 rounds up into the next magnitude
        assert_eq!(compact_number(999_500.0), "1M");
    }

    #[test]
    fn test_compact_negative() {
        assert_eq!(compact_number(-2500.0), "-2.5K");
    }

    #[test]
    fn test_compact_magnitude_clamped() {
        // Beyond trillions the suffix stays at T instead of indexing past
        // the table
        assert_eq!(compact_number(1e15), "1000T");
    }

    #[test]
    fn test_grouped_price() {
        assert_eq!(grouped_price(1234.5), "1,234.5000");
        assert_eq!(grouped_price(0.5), "0.5000");
        assert_eq!(grouped_price(1_234_567.8912), "1,234,567.8912");
        assert_eq!(grouped_price(-1234.5), "-1,234.5000");
        assert_eq!(grouped_price(0.0), "0.0000");
    }
}
