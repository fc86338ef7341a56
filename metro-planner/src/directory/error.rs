//! Directory provider error types.

use crate::domain::{LineCode, StationCode};
use crate::wmata::WmataError;

/// Errors a directory provider can return.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The remote directory service failed
    #[error("directory service error: {0}")]
    Remote(#[from] WmataError),

    /// Reading or writing the disk cache failed
    #[error("directory cache error: {message}")]
    Cache { message: String },

    /// A network fixture could not be loaded
    #[error("fixture error: {message}")]
    Fixture { message: String },

    /// The provider does not know the requested station
    #[error("directory does not know station {0}")]
    UnknownStation(StationCode),

    /// The provider does not know the requested line
    #[error("directory does not know line {0}")]
    UnknownLine(LineCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DirectoryError::UnknownStation(StationCode::parse("Z99").unwrap());
        assert_eq!(err.to_string(), "directory does not know station Z99");

        let err = DirectoryError::UnknownLine(LineCode::parse("PK").unwrap());
        assert_eq!(err.to_string(), "directory does not know line PK");

        let err = DirectoryError::Cache {
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "directory cache error: disk full");

        let err = DirectoryError::from(WmataError::RateLimited);
        assert_eq!(
            err.to_string(),
            "directory service error: rate limited by WMATA API"
        );
    }
}
