//! Metro route planner.
//!
//! Answers "which stations do I pass through to get from here to there on
//! the metro?" using an incremental best-first search over line and station
//! data from the WMATA rail API, or from an offline network fixture.

pub mod console;
pub mod directory;
pub mod domain;
pub mod planner;
pub mod wmata;
