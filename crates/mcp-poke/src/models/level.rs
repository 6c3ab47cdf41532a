//! Severity levels and urgency hints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational
    #[default]
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

impl Level {
    /// Every accepted level, in advertised order
    pub const ALL: [Level; 4] = [Level::Info, Level::Warning, Level::Error, Level::Success];

    /// Wire name of the level
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Success => "success",
        }
    }

    /// Wire names of every accepted level
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|level| level.as_str()).collect()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("invalid level: {s}")))
    }
}

/// How urgently the desktop should render a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Low
    Low,
    /// Normal
    #[default]
    Normal,
    /// Critical
    Critical,
}

impl Urgency {
    /// Parse a configured urgency, treating unknown values as normal
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Urgency::Low,
            "critical" => Urgency::Critical,
            _ => Urgency::Normal,
        }
    }

    /// Config name of the urgency
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info", Level::Info)]
    #[case("warning", Level::Warning)]
    #[case("error", Level::Error)]
    #[case("success", Level::Success)]
    fn test_parse_known_levels(#[case] name: &str, #[case] expected: Level) {
        let level: Level = name.parse().unwrap();
        assert_eq!(level, expected);
        assert_eq!(level.to_string(), name);
    }

    #[rstest]
    #[case("critical")]
    #[case("INFO")]
    #[case(" info")]
    #[case("debug")]
    fn test_parse_rejects_unknown_levels(#[case] name: &str) {
        let err = name.parse::<Level>().unwrap_err();
        match err {
            Error::InvalidArgument(msg) => assert_eq!(msg, format!("invalid level: {name}")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_level_names_in_order() {
        assert_eq!(Level::names(), vec!["info", "warning", "error", "success"]);
    }

    #[rstest]
    #[case("low", Urgency::Low)]
    #[case("normal", Urgency::Normal)]
    #[case("Critical", Urgency::Critical)]
    #[case("urgent", Urgency::Normal)]
    #[case("", Urgency::Normal)]
    fn test_urgency_parse_lossy(#[case] raw: &str, #[case] expected: Urgency) {
        assert_eq!(Urgency::parse_lossy(raw), expected);
    }
}
