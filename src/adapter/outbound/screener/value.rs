//! Normalisation of figures as printed on company pages.

use crate::domain::FinancialValue;

/// Placeholders that mean "no value".
const MISSING: &[&str] = &["", "-", "N/A", "NA", "n.a.", "--"];

/// Unit suffixes and their multipliers, checked in order.
const MULTIPLIERS: &[(&str, f64)] = &[
    ("Cr", 1e7),
    ("L", 1e5),
    ("K", 1e3),
    ("M", 1e6),
    ("B", 1e9),
];

/// Convert a printed figure to a number where possible.
///
/// Placeholders yield `None`. Commas are dropped, `%` values become plain
/// numbers, and `Cr`/`L`/`K`/`M`/`B` suffixes are multiplied out. A leading
/// rupee sign and a trailing full stop (`₹ 1,234 Cr.`) are ignored. Anything
/// else that does not parse is returned as the original text.
#[must_use]
pub fn clean_financial_value(raw: &str) -> Option<FinancialValue> {
    let trimmed = raw.trim();
    if MISSING.contains(&trimmed) {
        return None;
    }

    let cleaned = trimmed.replace(',', "");
    let cleaned = cleaned.trim_start_matches('₹').trim();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(cleaned).trim();
    let text = || Some(FinancialValue::Text(raw.to_string()));

    if cleaned.contains('%') {
        return match cleaned.replace('%', "").trim().parse::<f64>() {
            Ok(n) => Some(FinancialValue::Number(n)),
            Err(_) => text(),
        };
    }

    for (suffix, multiplier) in MULTIPLIERS {
        if let Some(number) = cleaned.strip_suffix(suffix) {
            if let Ok(n) = number.trim().parse::<f64>() {
                return Some(FinancialValue::Number(n * multiplier));
            }
        }
    }

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(FinancialValue::Number(n)),
        _ => text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(raw: &str) -> f64 {
        match clean_financial_value(raw) {
            Some(FinancialValue::Number(n)) => n,
            other => panic!("expected number for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn placeholders_are_missing() {
        for raw in ["", "  ", "-", "N/A", "NA", "n.a.", "--"] {
            assert_eq!(clean_financial_value(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn commas_are_removed() {
        assert_eq!(number("1,23,456"), 123_456.0);
        assert_eq!(number(" 2,500.75 "), 2500.75);
    }

    #[test]
    fn percentages_become_numbers() {
        assert_eq!(number("18.5%"), 18.5);
        assert_eq!(number("-3 %"), -3.0);
    }

    #[test]
    fn unit_suffixes_multiply() {
        assert_eq!(number("12Cr"), 1.2e8);
        assert_eq!(number("2.5 L"), 250_000.0);
        assert_eq!(number("3K"), 3_000.0);
        assert_eq!(number("1.5M"), 1_500_000.0);
        assert_eq!(number("2B"), 2e9);
    }

    #[test]
    fn rupee_prefix_and_trailing_dot_are_ignored() {
        assert_eq!(number("₹ 12,34,567 Cr."), 1_234_567.0 * 1e7);
        assert_eq!(number("₹ 3,512"), 3512.0);
    }

    #[test]
    fn unparseable_text_is_kept_verbatim() {
        assert_eq!(
            clean_financial_value("Mar 2024"),
            Some(FinancialValue::Text("Mar 2024".into()))
        );
        assert_eq!(
            clean_financial_value("abc%"),
            Some(FinancialValue::Text("abc%".into()))
        );
    }
}
