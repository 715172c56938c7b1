//! Recurrence frequency.

use std::fmt;

/// Recurrence frequency supported by the engine.
///
/// The sub-daily frequencies of RFC 5545 (SECONDLY, MINUTELY, HOURLY) are
/// recognized by the parser but rejected as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }

    /// Returns true for RFC 5545 frequency tokens this engine does not
    /// support (sub-daily recurrence).
    #[must_use]
    pub fn is_unsupported_token(s: &str) -> bool {
        matches!(
            s.to_ascii_uppercase().as_str(),
            "SECONDLY" | "MINUTELY" | "HOURLY"
        )
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_parse() {
        assert_eq!(Frequency::parse("DAILY"), Some(Frequency::Daily));
        assert_eq!(Frequency::parse("weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::parse("INVALID"), None);
        assert_eq!(Frequency::parse("HOURLY"), None);
    }

    #[test]
    fn frequency_unsupported_tokens() {
        assert!(Frequency::is_unsupported_token("HOURLY"));
        assert!(Frequency::is_unsupported_token("secondly"));
        assert!(!Frequency::is_unsupported_token("DAILY"));
    }
}
