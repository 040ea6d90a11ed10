use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;

/// Validated ticker symbol in canonical (trimmed, uppercase) form.
///
/// Only ASCII letters, digits, `-` and `.` are accepted, so a `Symbol`
/// can be placed in a URL path or query without further escaping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Validate and canonicalize raw user input.
    pub fn parse(raw: &str) -> Result<Self, QuoteError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuoteError::Validation(
                "Please enter a stock symbol".to_string(),
            ));
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(QuoteError::Validation(format!(
                "Symbol '{}' contains '{}'; only letters, numbers, hyphens and periods are allowed",
                trimmed, bad
            )));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_parse_canonicalizes() {
        let symbol = Symbol::parse("  brk.b ").unwrap();
        assert_eq!(symbol.as_str(), "BRK.B");

        let symbol: Symbol = "rds-a".parse().unwrap();
        assert_eq!(symbol.to_string(), "RDS-A");
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        for raw in ["", "   ", "\t\n"] {
            let err = Symbol::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_parse_rejects_disallowed_characters() {
        for raw in ["AA PL", "AAPL!", "^GSPC", "EUR/USD", "ÄPPLE", "IBM;DROP"] {
            let err = Symbol::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "input {:?}", raw);
        }
    }

    #[test]
    fn test_serde_validates() {
        let symbol: Symbol = serde_json::from_str("\"ibm\"").unwrap();
        assert_eq!(symbol.as_str(), "IBM");
        assert!(serde_json::from_str::<Symbol>("\"bad symbol\"").is_err());
    }
}
