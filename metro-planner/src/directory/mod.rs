//! Directory provider abstraction.
//!
//! The planner never talks HTTP directly: it asks a [`DirectoryProvider`]
//! for line topology, station metadata and distance estimates. The WMATA
//! client implements it for live data; [`StaticDirectory`] serves an
//! in-memory network for tests and offline use; [`CachingDirectory`] keeps
//! the static part of any provider on disk.

mod cache;
mod error;
pub(crate) mod memory;

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::domain::{LineCode, StationCode};

pub use cache::{CachingDirectory, DirectoryCache, DirectoryCacheConfig};
pub use error::DirectoryError;
pub use memory::{FixtureLine, FixtureStation, NetworkFixture, ProviderCalls, StaticDirectory};

/// A line as listed by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub code: LineCode,
    pub display_name: String,
    pub start: StationCode,
    pub end: StationCode,
}

/// A station platform as listed by the directory.
///
/// Several records may share a name; they describe the same physical station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub code: StationCode,
    /// Lines serving this platform (one to four).
    pub lines: Vec<LineCode>,
    /// Codes of the other platforms of the same station (zero to two).
    pub together: Vec<StationCode>,
}

/// Source of line topology, station metadata and distance estimates.
///
/// Calls are made sequentially by the topology builder. Implementations do
/// not retry; a failure is returned to the caller as-is.
pub trait DirectoryProvider {
    /// List every line.
    fn list_lines(&self) -> impl Future<Output = Result<Vec<LineRecord>, DirectoryError>> + Send;

    /// List every station platform.
    fn list_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<StationRecord>, DirectoryError>> + Send;

    /// Average train speed (mph) between two stations of a line, if known.
    fn average_speed(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> impl Future<Output = Result<Option<f64>, DirectoryError>> + Send;

    /// Station codes of a line, in order from `start` to `end`.
    fn ordered_stations(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> impl Future<Output = Result<Vec<StationCode>, DirectoryError>> + Send;

    /// Approximate track distance (miles) from every station code to `destination`.
    ///
    /// The destination itself maps to zero.
    fn distances_to(
        &self,
        destination: &StationCode,
    ) -> impl Future<Output = Result<HashMap<StationCode, f64>, DirectoryError>> + Send;
}
