//! Route reconstruction from search parent links.

use std::fmt;

use crate::domain::{LineCode, StationId};

use super::cost::CostModel;
use super::error::PlanError;
use super::search::Frontier;
use super::topology::Topology;

/// One hop between consecutive stations of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    /// Cheapest line shared by the two stations, if any.
    pub line: Option<LineCode>,
}

impl fmt::Display for RouteLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(f, "{} -> {} ({})", self.from, self.to, line),
            None => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}

/// A found route, origin first.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Station names from origin to destination.
    pub stations: Vec<String>,

    /// Transfer points only: each leg may span several stops on its line.
    pub legs: Vec<RouteLeg>,

    /// Frontier expansions performed before the route was found.
    pub expansions: usize,
}

impl Route {
    /// Route of a single station, for an origin that is the destination.
    pub(crate) fn single(topology: &Topology, station: StationId) -> Self {
        Self {
            stations: vec![topology.station(station).name.clone()],
            legs: Vec::new(),
            expansions: 0,
        }
    }

    pub(crate) fn with_expansions(mut self, expansions: usize) -> Self {
        self.expansions = expansions;
        self
    }

    /// Lines to ride in order, with consecutive repeats collapsed.
    pub fn lines(&self) -> Vec<&LineCode> {
        let mut lines: Vec<&LineCode> = Vec::new();
        for line in self.legs.iter().filter_map(|leg| leg.line.as_ref()) {
            if lines.last() != Some(&line) {
                lines.push(line);
            }
        }
        lines
    }

    /// Number of line changes along the route.
    pub fn changes(&self) -> usize {
        self.lines().len().saturating_sub(1)
    }
}

/// Rebuild the route ending at `destination` from the search's parent links.
///
/// `terminal` is the station from which the destination is reached directly.
/// The walk back from `terminal` must reach `origin` within the number of
/// known stations.
pub fn reconstruct(
    topology: &Topology,
    frontier: &Frontier,
    origin: StationId,
    terminal: StationId,
    destination: StationId,
) -> Result<Route, PlanError> {
    let broken = || PlanError::BrokenParentChain {
        from: topology.station(terminal).name.clone(),
        origin: topology.station(origin).name.clone(),
    };

    let mut ids = vec![destination];
    let mut cursor = terminal;
    let limit = topology.stations().len();

    while cursor != origin {
        if ids.len() > limit {
            return Err(broken());
        }
        ids.push(cursor);
        cursor = frontier.parent(cursor).ok_or_else(broken)?;
    }
    ids.push(origin);
    ids.reverse();

    let costs = CostModel::new(topology);
    let legs = ids
        .windows(2)
        .map(|pair| RouteLeg {
            from: topology.station(pair[0]).name.clone(),
            to: topology.station(pair[1]).name.clone(),
            line: costs
                .cheapest_line(pair[0], pair[1])
                .ok()
                .map(|(line, _)| line.code.clone()),
        })
        .collect();

    Ok(Route {
        stations: ids
            .iter()
            .map(|&id| topology.station(id).name.clone())
            .collect(),
        legs,
        expansions: 0,
    })
}
