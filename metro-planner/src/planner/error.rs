//! Planner error types.
//!
//! "No path within the step limit" is not an error; it is reported through
//! [`SearchOutcome::NoPath`](super::SearchOutcome::NoPath).

use crate::directory::DirectoryError;
use crate::domain::{LineCode, StationCode};

/// Errors from building a topology or searching it.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A line's ordered station list names a code the station directory lacks
    #[error("line {line} lists station {station}, which is not in the station directory")]
    UnknownLineStation { line: LineCode, station: StationCode },

    /// A station on a line has no remaining-distance estimate
    #[error("no distance estimate for station {0}")]
    MissingDistance(StationCode),

    /// A requested origin or destination is not a known station
    #[error("unknown station code: {0}")]
    UnknownStation(StationCode),

    /// The cost between two stations was requested but they share no line
    #[error("stations {from} and {to} share no line")]
    NoSharedLine { from: String, to: String },

    /// Following parent links never reached the origin
    #[error("parent chain from {from} does not lead back to origin {origin}")]
    BrokenParentChain { from: String, origin: String },

    /// The directory provider failed
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl PlanError {
    /// Whether the error means the directory data contradicts itself.
    pub fn is_consistency_error(&self) -> bool {
        matches!(
            self,
            PlanError::UnknownLineStation { .. }
                | PlanError::MissingDistance(_)
                | PlanError::BrokenParentChain { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlanError::UnknownLineStation {
            line: LineCode::parse("RD").unwrap(),
            station: StationCode::parse("Z99").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "line RD lists station Z99, which is not in the station directory"
        );
        assert!(err.is_consistency_error());

        let err = PlanError::NoSharedLine {
            from: "Rosewood".into(),
            to: "Bayside".into(),
        };
        assert_eq!(err.to_string(), "stations Rosewood and Bayside share no line");
        assert!(!err.is_consistency_error());

        let err = PlanError::BrokenParentChain {
            from: "Central".into(),
            origin: "Rosewood".into(),
        };
        assert!(err.to_string().contains("does not lead back"));
        assert!(err.is_consistency_error());
    }

    #[test]
    fn directory_errors_pass_through() {
        let err = PlanError::from(DirectoryError::Fixture {
            message: "bad".into(),
        });
        assert_eq!(err.to_string(), "fixture error: bad");
        assert!(!err.is_consistency_error());
    }
}
