//! Domain types for the metro route planner.
//!
//! Codes are validated at construction time; stations are interned so
//! that every platform code of a station resolves to one entity.

mod codes;
mod line;
mod station;

pub use codes::{InvalidCode, LineCode, StationCode};
pub use line::Line;
pub use station::{Station, StationDirectory, StationId};
