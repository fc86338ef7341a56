//! Topology building.
//!
//! Turns directory listings into lines with ordered, resolved stops, a
//! station adjacency graph and per-station remaining-distance estimates
//! for one destination.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::directory::DirectoryProvider;
use crate::domain::{Line, LineCode, Station, StationCode, StationDirectory, StationId};

use super::config::PlannerConfig;
use super::error::PlanError;

/// Destination-independent network data: lines and stations.
#[derive(Debug, Clone)]
struct Network {
    lines: BTreeMap<LineCode, Line>,
    stations: StationDirectory,
}

/// Network topology relative to one destination.
///
/// Every station that appears on a line carries a distance estimate.
#[derive(Debug, Clone)]
pub struct Topology {
    destination: StationId,
    lines: BTreeMap<LineCode, Line>,
    stations: StationDirectory,
    graph: HashMap<StationId, Vec<StationId>>,
}

impl Topology {
    /// The destination this topology was built for.
    pub fn destination(&self) -> StationId {
        self.destination
    }

    /// The station directory, with distance estimates filled in.
    pub fn stations(&self) -> &StationDirectory {
        &self.stations
    }

    /// Get a station by id.
    pub fn station(&self, id: StationId) -> &Station {
        self.stations.get(id)
    }

    /// Resolve a station code.
    pub fn resolve(&self, code: &StationCode) -> Option<StationId> {
        self.stations.resolve(code)
    }

    /// Remaining-distance estimate of a station.
    ///
    /// Stations that lie on no line have no estimate and report infinity.
    pub fn distance(&self, id: StationId) -> f64 {
        self.stations.get(id).distance.unwrap_or(f64::INFINITY)
    }

    /// Look up a line by code.
    pub fn line(&self, code: &LineCode) -> Option<&Line> {
        self.lines.get(code)
    }

    /// All lines, ordered by code.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// Stations directly adjacent to `id` on any line.
    pub fn neighbors(&self, id: StationId) -> &[StationId] {
        self.graph.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of stations present in the adjacency graph.
    pub fn graph_len(&self) -> usize {
        self.graph.len()
    }
}

/// Builds [`Topology`] values, caching destination-independent data.
///
/// The first build fetches lines, stations and line speeds; later builds
/// reuse them and only refresh distances and line orderings.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    network: Option<Network>,
    rate_limit_delay: Duration,
}

impl TopologyBuilder {
    /// Create a builder with nothing cached.
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            network: None,
            rate_limit_delay: config.rate_limit_delay,
        }
    }

    /// Whether lines and stations have already been fetched.
    pub fn has_network(&self) -> bool {
        self.network.is_some()
    }

    /// Drop cached lines and stations so the next build fetches them again.
    pub fn invalidate(&mut self) {
        self.network = None;
    }

    /// Build the topology for `destination`.
    pub async fn build<P: DirectoryProvider>(
        &mut self,
        provider: &P,
        destination: &StationCode,
    ) -> Result<Topology, PlanError> {
        let network = match self.network.take() {
            Some(network) => network,
            None => fetch_network(provider).await?,
        };
        let network = self.network.insert(network);

        let destination_id = network
            .stations
            .resolve(destination)
            .ok_or_else(|| PlanError::UnknownStation(destination.clone()))?;

        let mut stations = network.stations.clone();
        apply_distances(&mut stations, provider.distances_to(destination).await?);

        // Stay within the request quota between the two phases
        if !self.rate_limit_delay.is_zero() {
            trace!(delay_ms = self.rate_limit_delay.as_millis() as u64, "rate limit pause");
            tokio::time::sleep(self.rate_limit_delay).await;
        }

        let mut lines = network.lines.clone();
        let mut graph: HashMap<StationId, Vec<StationId>> = HashMap::new();

        for line in lines.values_mut() {
            let codes = provider
                .ordered_stations(&line.code, &line.start, &line.end)
                .await?;

            let mut stops = Vec::with_capacity(codes.len());
            for code in &codes {
                let id = stations
                    .resolve(code)
                    .ok_or_else(|| PlanError::UnknownLineStation {
                        line: line.code.clone(),
                        station: code.clone(),
                    })?;
                if stations.get(id).distance.is_none() {
                    return Err(PlanError::MissingDistance(code.clone()));
                }
                stops.push(id);
            }

            for (i, &id) in stops.iter().enumerate() {
                let neighbors = graph.entry(id).or_default();
                let before = i.checked_sub(1).map(|j| stops[j]);
                let after = stops.get(i + 1).copied();
                for neighbor in before.into_iter().chain(after) {
                    if neighbor != id && !neighbors.contains(&neighbor) {
                        neighbors.push(neighbor);
                    }
                }
            }

            debug!(line = %line.code, stops = stops.len(), "line ordered");
            line.station_codes = codes;
            line.stops = stops;
        }

        info!(
            destination = %destination,
            lines = lines.len(),
            stations = graph.len(),
            "topology built"
        );

        Ok(Topology {
            destination: destination_id,
            lines,
            stations,
            graph,
        })
    }
}

/// Fetch lines, stations and line speeds.
async fn fetch_network<P: DirectoryProvider>(provider: &P) -> Result<Network, PlanError> {
    let line_records = provider.list_lines().await?;
    let station_records = provider.list_stations().await?;
    let stations = StationDirectory::from_records(&station_records);

    let mut lines = BTreeMap::new();
    for record in line_records {
        let mut line = Line::new(
            record.code.clone(),
            record.display_name,
            record.start,
            record.end,
        );
        line.average_mph = provider
            .average_speed(&line.code, &line.start, &line.end)
            .await?;
        debug!(line = %line.code, mph = ?line.average_mph, "line speed");
        lines.insert(record.code, line);
    }

    info!(
        lines = lines.len(),
        stations = stations.len(),
        codes = stations.code_count(),
        "network fetched"
    );

    Ok(Network { lines, stations })
}

/// Copy distance estimates onto stations.
///
/// A station with several codes keeps the smallest estimate among them.
fn apply_distances(stations: &mut StationDirectory, distances: HashMap<StationCode, f64>) {
    let ids: Vec<StationId> = stations.iter().map(|(id, _)| id).collect();
    for id in ids {
        stations.get_mut(id).distance = None;
    }

    for (code, miles) in distances {
        let Some(id) = stations.resolve(&code) else {
            warn!(code = %code, "distance for unknown station ignored");
            continue;
        };
        let station = stations.get_mut(id);
        station.distance = Some(match station.distance {
            Some(existing) => existing.min(miles),
            None => miles,
        });
    }
}
