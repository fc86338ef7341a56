//! Route planner using an incremental best-first search.
//!
//! This module answers "which stations do I pass through, and where do I
//! change, to get from this station to that one?" over a metro network
//! supplied by a [`DirectoryProvider`](crate::directory::DirectoryProvider).
//!
//! Planning runs in two phases:
//! - [`TopologyBuilder`] fetches lines and stations, then per destination
//!   the remaining-distance estimates and each line's ordered stations
//! - [`find_route`] grows the set of usable lines as it reaches stations
//!   that serve them, and stops as soon as riding one available line
//!   straight to the destination looks sound

mod config;
mod cost;
mod error;
mod path;
mod search;
mod topology;


pub use config::{DEFAULT_MAX_STEPS, DEFAULT_RATE_LIMIT_DELAY, PlannerConfig};
pub use cost::CostModel;
pub use error::PlanError;
pub use path::{Route, RouteLeg, reconstruct};
pub use search::{Frontier, NoPathReason, Planner, SearchOutcome, find_route};
pub use topology::{Topology, TopologyBuilder};
