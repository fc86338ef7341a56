//! Incremental best-first route search.
//!
//! Lines become available only as the search reaches stations that serve
//! them. Before every selection the search asks whether riding an available
//! line straight to the destination is sound from the current station; if
//! so it stops there.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use tracing::{debug, info, trace};

use crate::directory::DirectoryProvider;
use crate::domain::{LineCode, StationCode, StationId};

use super::config::PlannerConfig;
use super::cost::CostModel;
use super::error::PlanError;
use super::path::{Route, reconstruct};
use super::topology::{Topology, TopologyBuilder};

/// Why a search ended without a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathReason {
    /// The expansion cap was reached.
    StepLimit,
    /// Every discovered station was expanded.
    FrontierExhausted,
}

impl fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoPathReason::StepLimit => write!(f, "step limit reached"),
            NoPathReason::FrontierExhausted => write!(f, "no more stations to explore"),
        }
    }
}

/// Result of a route search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Route),
    NoPath { steps: usize, reason: NoPathReason },
}

impl SearchOutcome {
    /// The route, if one was found.
    pub fn route(&self) -> Option<&Route> {
        match self {
            SearchOutcome::Found(route) => Some(route),
            SearchOutcome::NoPath { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// An open frontier entry.
#[derive(Debug, Clone)]
struct Candidate {
    priority: f64,
    code: StationCode,
    station: StationId,
}

// Reversed so that BinaryHeap pops the smallest priority
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.code.cmp(&self.code))
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

#[derive(Debug, Clone, Copy)]
struct Discovery {
    priority: f64,
    parent: StationId,
}

/// Stations discovered during one search run.
///
/// A station is discovered at most once: its priority and parent are fixed
/// when it is first inserted, and it stays known after being popped.
/// Equal priorities pop in order of primary station code, then id.
#[derive(Debug, Default)]
pub struct Frontier {
    open: BinaryHeap<Candidate>,
    discovered: HashMap<StationId, Discovery>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover a station. Returns `false` if it was already discovered.
    pub fn insert(
        &mut self,
        station: StationId,
        code: &StationCode,
        priority: f64,
        parent: StationId,
    ) -> bool {
        if self.discovered.contains_key(&station) {
            return false;
        }
        self.discovered.insert(station, Discovery { priority, parent });
        self.open.push(Candidate {
            priority,
            code: code.clone(),
            station,
        });
        true
    }

    /// Remove and return the open station with the smallest priority.
    pub fn pop_min(&mut self) -> Option<(StationId, f64)> {
        self.open.pop().map(|c| (c.station, c.priority))
    }

    /// Number of open stations.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Number of stations ever discovered.
    pub fn discovered(&self) -> usize {
        self.discovered.len()
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.discovered.contains_key(&station)
    }

    /// The station this one was discovered from.
    pub fn parent(&self, station: StationId) -> Option<StationId> {
        self.discovered.get(&station).map(|d| d.parent)
    }

    pub fn priority(&self, station: StationId) -> Option<f64> {
        self.discovered.get(&station).map(|d| d.priority)
    }
}

/// Per-run search state.
struct Search<'a> {
    topology: &'a Topology,
    costs: CostModel<'a>,
    origin: StationId,
    frontier: Frontier,
    available: Vec<LineCode>,
}

impl<'a> Search<'a> {
    fn new(topology: &'a Topology, origin: StationId) -> Self {
        Self {
            topology,
            costs: CostModel::new(topology),
            origin,
            frontier: Frontier::new(),
            available: Vec::new(),
        }
    }

    /// Make the lines of `from` available, discovering their stations.
    fn open_lines(&mut self, from: StationId, cost_so_far: f64) -> Result<(), PlanError> {
        let topology = self.topology;
        let destination = topology.destination();

        for code in &topology.station(from).lines {
            if self.available.contains(code) {
                continue;
            }
            let Some(line) = topology.line(code) else {
                trace!(line = %code, "line not in topology, skipping");
                continue;
            };
            self.available.push(code.clone());

            let mut added = 0;
            for &stop in &line.stops {
                if stop == self.origin || stop == destination {
                    continue;
                }
                if self.frontier.contains(stop) {
                    continue;
                }
                let priority = cost_so_far + self.costs.total_estimated_cost(from, stop)?;
                let station = topology.station(stop);
                self.frontier
                    .insert(stop, station.primary_code(), priority, from);
                added += 1;
            }

            debug!(line = %code, from = %topology.station(from).name, added, "line available");
        }

        Ok(())
    }

    /// The first available line serving the destination that is sound to ride from `current`.
    fn direct_line(&self, current: StationId) -> Option<&LineCode> {
        let destination = self.topology.destination();
        self.available.iter().find(|code| {
            self.topology
                .line(code)
                .is_some_and(|line| line.calls_at(destination))
                && self.costs.should_take_direct_line(current, code)
        })
    }
}

/// Search for a route from `origin` to the topology's destination.
///
/// At most `config.max_steps` direct-line checks run, each followed by one
/// expansion; a route is only found at one of those checks. Running out of
/// steps or of stations is a [`SearchOutcome::NoPath`], not an error.
pub fn find_route(
    topology: &Topology,
    origin: StationId,
    config: &PlannerConfig,
) -> Result<SearchOutcome, PlanError> {
    let destination = topology.destination();

    if origin == destination {
        debug!(station = %topology.station(origin).name, "origin is the destination");
        return Ok(SearchOutcome::Found(Route::single(topology, origin)));
    }

    let mut search = Search::new(topology, origin);
    search.open_lines(origin, 0.0)?;

    let mut current = origin;
    let mut steps = 0;

    // One direct check and one expansion per step
    loop {
        if steps >= config.max_steps {
            info!(steps, "step limit reached");
            return Ok(SearchOutcome::NoPath {
                steps,
                reason: NoPathReason::StepLimit,
            });
        }

        if let Some(line) = search.direct_line(current) {
            info!(
                terminal = %topology.station(current).name,
                line = %line,
                steps,
                "direct line to destination"
            );
            let route = reconstruct(topology, &search.frontier, origin, current, destination)?;
            return Ok(SearchOutcome::Found(route.with_expansions(steps)));
        }

        let Some((selected, priority)) = search.frontier.pop_min() else {
            info!(steps, "frontier exhausted");
            return Ok(SearchOutcome::NoPath {
                steps,
                reason: NoPathReason::FrontierExhausted,
            });
        };
        steps += 1;

        // Recover g(n) from f(n)
        let cost_so_far = priority - topology.distance(selected);
        trace!(
            station = %topology.station(selected).name,
            priority,
            cost_so_far,
            open = search.frontier.len(),
            "expanding"
        );

        search.open_lines(selected, cost_so_far)?;
        current = selected;
    }
}

/// Plans routes against a directory provider.
///
/// Network data is fetched once and reused across requests; distances and
/// line orderings are refreshed for every destination.
pub struct Planner<P: DirectoryProvider> {
    provider: P,
    config: PlannerConfig,
    builder: TopologyBuilder,
}

impl<P: DirectoryProvider> Planner<P> {
    pub fn new(provider: P, config: PlannerConfig) -> Self {
        let builder = TopologyBuilder::new(&config);
        Self {
            provider,
            config,
            builder,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Forget cached network data.
    pub fn invalidate(&mut self) {
        self.builder.invalidate();
    }

    /// Find a route from `origin` to `destination`.
    pub async fn plan(
        &mut self,
        origin: &StationCode,
        destination: &StationCode,
    ) -> Result<SearchOutcome, PlanError> {
        info!(origin = %origin, destination = %destination, "planning route");

        let topology = self.builder.build(&self.provider, destination).await?;
        let origin_id = topology
            .resolve(origin)
            .ok_or_else(|| PlanError::UnknownStation(origin.clone()))?;

        find_route(&topology, origin_id, &self.config)
    }
}
