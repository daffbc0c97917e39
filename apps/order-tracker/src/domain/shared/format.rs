//! Number formatting for user-facing messages.

/// Format a value with a fixed number of decimal places and `,` thousands grouping.
///
/// `format_decimal(1234.56, 1)` yields `"1,234.6"`.
#[must_use]
pub fn format_decimal(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .map_or((formatted.as_str(), None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let sign = if negative { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 1, "0.0")]
    #[test_case(5.0, 1, "5.0")]
    #[test_case(999.95, 1, "1,000.0")]
    #[test_case(1_234.56, 1, "1,234.6")]
    #[test_case(1_123_456.6, 0, "1,123,457")]
    #[test_case(-12_345.0, 1, "-12,345.0")]
    #[test_case(-0.01, 1, "0.0")]
    fn formats_with_grouping(value: f64, places: usize, expected: &str) {
        assert_eq!(format_decimal(value, places), expected);
    }
}
