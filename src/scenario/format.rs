//! Display formatting for scenario metrics.
//!
//! The composer is the only caller: every number in a [`Scenario`](super::Scenario)
//! becomes a string here and nowhere else.

/// Formats a dollar amount.
///
/// Amounts of $1,000 and above are whole dollars with thousands separators,
/// $100 to $999 are whole dollars, and anything smaller keeps cents.
pub fn format_currency(value: f64) -> String {
    if value >= 1000.0 {
        format!("${}", group_thousands(&format!("{:.0}", value)))
    } else if value >= 100.0 {
        format!("${:.0}", value)
    } else {
        format!("${:.2}", value)
    }
}

/// Formats a percentage to two decimals (`2.45%`).
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Formats a whole count with thousands separators (`150,000`).
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Formats a multiple such as ROAS (`2.31x`).
pub fn format_multiple(value: f64, decimals: usize) -> String {
    format!("{:.*}x", decimals, value)
}

/// Inserts `,` separators into the integer digits of a plain decimal string.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_precision_tiers() {
        assert_eq!(format_currency(22.2222), "$22.22");
        assert_eq!(format_currency(1.0), "$1.00");
        assert_eq!(format_currency(99.999), "$100.00");
        assert_eq!(format_currency(345.6), "$346");
        assert_eq!(format_currency(3000.0), "$3,000");
        assert_eq!(format_currency(1_234_567.4), "$1,234,567");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(2.0), "2.00%");
        assert_eq!(format_percent(4.5), "4.50%");
        assert_eq!(format_percent(41.2345), "41.23%");
    }

    #[test]
    fn test_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(150_000), "150,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn test_multiple() {
        assert_eq!(format_multiple(2.314, 2), "2.31x");
        assert_eq!(format_multiple(2.46, 1), "2.5x");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands("-1234"), "-1,234");
    }
}
