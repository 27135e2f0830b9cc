//! Exchange ticker newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Default exchange suffix for National Stock Exchange of India symbols.
pub const NSE_SUFFIX: &str = ".NS";

/// A bare exchange symbol: non-empty and only `A-Z`, `a-z`, `0-9`, `&`,
/// `-` and `_`. Such a symbol is also safe to use as a file stem.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '_'))
}

/// Exchange-qualified ticker such as `RELIANCE.NS`.
///
/// The inner String is private so every ticker passes through
/// [`Ticker::parse`], which guarantees it is upper-case and carries the
/// exchange suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Parse a raw symbol, requiring the given exchange suffix.
    ///
    /// Surrounding whitespace, quotes and backticks are stripped and the
    /// result is upper-cased before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidTicker`] when the symbol is empty,
    /// contains whitespace or characters other than `A-Z0-9&-_.`, or lacks
    /// the suffix.
    pub fn parse(raw: &str, suffix: &str) -> Result<Self, ResolveError> {
        let cleaned = raw
            .trim()
            .trim_matches(|c| matches!(c, '\'' | '"' | '`'))
            .trim()
            .to_ascii_uppercase();
        let suffix = suffix.to_ascii_uppercase();

        let invalid = |reason: &str| ResolveError::InvalidTicker {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        if cleaned.is_empty() {
            return Err(invalid("empty symbol"));
        }
        if !cleaned.ends_with(&suffix) {
            return Err(invalid(&format!("missing {suffix} suffix")));
        }
        let symbol = &cleaned[..cleaned.len() - suffix.len()];
        if symbol.is_empty() {
            return Err(invalid("empty symbol"));
        }
        if !is_valid_symbol(symbol) {
            return Err(invalid("unexpected characters"));
        }

        Ok(Self(cleaned))
    }

    /// Parse an NSE ticker (suffix `.NS`).
    ///
    /// # Errors
    ///
    /// See [`Ticker::parse`].
    pub fn nse(raw: &str) -> Result<Self, ResolveError> {
        Self::parse(raw, NSE_SUFFIX)
    }

    /// Build a ticker from a bare symbol by appending the suffix.
    ///
    /// # Errors
    ///
    /// See [`Ticker::parse`].
    pub fn from_symbol(symbol: &str, suffix: &str) -> Result<Self, ResolveError> {
        Self::parse(&format!("{}{suffix}", symbol.trim()), suffix)
    }

    /// Get the full ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bare exchange symbol without the suffix (`RELIANCE.NS` -> `RELIANCE`).
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.0
            .rsplit_once('.')
            .map_or(self.0.as_str(), |(symbol, _)| symbol)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_quotes() {
        let ticker = Ticker::nse("  'tcs.ns' ").unwrap();
        assert_eq!(ticker.as_str(), "TCS.NS");
        assert_eq!(ticker.symbol(), "TCS");
    }

    #[test]
    fn parse_rejects_missing_suffix() {
        assert!(matches!(
            Ticker::nse("RELIANCE"),
            Err(ResolveError::InvalidTicker { .. })
        ));
    }

    #[test]
    fn parse_rejects_bare_suffix_and_empty() {
        assert!(Ticker::nse(".NS").is_err());
        assert!(Ticker::nse("").is_err());
        assert!(Ticker::nse("\"\"").is_err());
    }

    #[test]
    fn parse_rejects_sentences() {
        assert!(Ticker::nse("The ticker is TCS.NS").is_err());
    }

    #[test]
    fn symbols_with_ampersand_are_allowed() {
        let ticker = Ticker::nse("M&M.NS").unwrap();
        assert_eq!(ticker.symbol(), "M&M");
    }

    #[test]
    fn from_symbol_appends_suffix() {
        let ticker = Ticker::from_symbol("infy", NSE_SUFFIX).unwrap();
        assert_eq!(ticker.to_string(), "INFY.NS");
    }

    #[test]
    fn custom_suffix_is_respected() {
        let ticker = Ticker::parse("sbin.bo", ".BO").unwrap();
        assert_eq!(ticker.as_str(), "SBIN.BO");
        assert!(Ticker::parse("SBIN.NS", ".BO").is_err());
    }
}
