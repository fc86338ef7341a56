//! Station and line code types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station or line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code {input:?}: {reason}")]
pub struct InvalidCode {
    kind: &'static str,
    input: String,
    reason: &'static str,
}

/// Longest station code we accept.
const MAX_STATION_CODE_LEN: usize = 8;

/// Longest line code we accept.
const MAX_LINE_CODE_LEN: usize = 4;

/// A platform identifier such as `A01` or `C04`.
///
/// A physical station with several platforms has one code per platform;
/// all of them resolve to the same [`Station`](super::Station).
///
/// # Examples
///
/// ```
/// use metro_planner::domain::StationCode;
///
/// let foggy_bottom = StationCode::parse("C04").unwrap();
/// assert_eq!(foggy_bottom.as_str(), "C04");
///
/// // Lowercase and whitespace are rejected
/// assert!(StationCode::parse("c04").is_err());
/// assert!(StationCode::parse("C 04").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code: 1 to 8 uppercase ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        let invalid = |reason| InvalidCode {
            kind: "station",
            input: s.to_string(),
            reason,
        };

        if s.is_empty() || s.len() > MAX_STATION_CODE_LEN {
            return Err(invalid("must be 1 to 8 characters"));
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(invalid("must be uppercase ASCII letters or digits"));
        }

        Ok(Self(s.to_string()))
    }

    /// Wrap a compile-time code that is known to be valid.
    pub(crate) fn from_known(s: &'static str) -> Self {
        debug_assert!(Self::parse(s).is_ok(), "invalid built-in code {s}");
        Self(s.to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line identifier such as `RD` (Red) or `BL` (Blue).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineCode(String);

impl LineCode {
    /// Parse a line code: 1 to 4 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        let invalid = |reason| InvalidCode {
            kind: "line",
            input: s.to_string(),
            reason,
        };

        if s.is_empty() || s.len() > MAX_LINE_CODE_LEN {
            return Err(invalid("must be 1 to 4 characters"));
        }

        if !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(invalid("must be uppercase ASCII letters A-Z"));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LineCode> for String {
    fn from(code: LineCode) -> Self {
        code.0
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.0)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
