//! Cost estimation over a built topology.
//!
//! Costs are expressed in miles and derived from the remaining-distance
//! estimates alone: riding between two stops of a line costs the sum of
//! the estimate changes between consecutive stops.

use tracing::trace;

use crate::domain::{Line, LineCode, StationId};

use super::error::PlanError;
use super::topology::Topology;

/// Cost functions for the route search.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    topology: &'a Topology,
}

impl<'a> CostModel<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// The shared line that is cheapest to ride from `a` to `b`, with its cost.
    ///
    /// Ties go to the line listed first for `a`.
    pub fn cheapest_line(&self, a: StationId, b: StationId) -> Result<(&'a Line, f64), PlanError> {
        let topology = self.topology;
        let from = topology.station(a);
        let to = topology.station(b);

        let mut best: Option<(&'a Line, f64)> = None;

        for code in from.lines.iter().filter(|l| to.serves(l)) {
            let Some(line) = topology.line(code) else {
                continue;
            };
            let (Some(i), Some(j)) = (line.position(a), line.position(b)) else {
                trace!(line = %code, "station not in line order, skipping line");
                continue;
            };

            // Direction does not matter
            let (lo, hi) = if i <= j { (i, j) } else { (j, i) };

            let cost: f64 = line.stops[lo..=hi]
                .windows(2)
                .map(|pair| (topology.distance(pair[0]) - topology.distance(pair[1])).abs())
                .sum();

            if best.is_none_or(|(_, c)| cost < c) {
                best = Some((line, cost));
            }
        }

        best.ok_or_else(|| PlanError::NoSharedLine {
            from: from.name.clone(),
            to: to.name.clone(),
        })
    }

    /// g(n): approximate track distance from `a` to `b` along the cheapest shared line.
    ///
    /// Fails with [`PlanError::NoSharedLine`] if the stations share no line.
    pub fn accumulated_cost(&self, a: StationId, b: StationId) -> Result<f64, PlanError> {
        self.cheapest_line(a, b).map(|(_, cost)| cost)
    }

    /// f(n) for `b` reached from `a`: accumulated cost plus `b`'s remaining distance.
    pub fn total_estimated_cost(&self, a: StationId, b: StationId) -> Result<f64, PlanError> {
        Ok(self.accumulated_cost(a, b)? + self.topology.distance(b))
    }

    /// Whether riding `line` from `station` without further transfers is sound.
    ///
    /// The station is located through any of its codes. At a terminal the
    /// ride is acceptable when the estimate does not increase towards the
    /// only neighbour; at an interior stop the estimate must be strictly
    /// greater than at least one neighbour's.
    pub fn should_take_direct_line(&self, station: StationId, line: &LineCode) -> bool {
        let topology = self.topology;
        let Some(line) = topology.line(line) else {
            return false;
        };

        let mut index = None;
        for code in &topology.station(station).codes {
            if let Some(i) = line.station_codes.iter().position(|c| c == code) {
                index = Some(i);
            }
        }
        let Some(index) = index else {
            return false;
        };

        let stops = &line.stops;
        if stops.len() < 2 {
            return false;
        }

        let here = topology.distance(stops[index]);
        let at = |i: usize| topology.distance(stops[i]);

        if index == 0 {
            here >= at(1)
        } else if index == stops.len() - 1 {
            here >= at(index - 1)
        } else {
            here > at(index - 1) || here > at(index + 1)
        }
    }
}
