use std::collections::{BTreeSet, HashSet};

use super::constraints::{validate_connection, RouteConstraints};
use super::graph::{DataCenterMap, Link, WalkLimits};
use super::location::{same_spine_distance, spine_of};
use super::panel::Panel;

/// One panel-to-panel hop. A synthetic direct route uses the same id twice.
pub type Hop = (String, String);

/// Upper bounds on simple-path enumeration for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Paths taken from a single (start, end) candidate pair
    pub max_paths_per_pair: usize,
    /// Paths taken across the whole query
    pub max_paths_total: usize,
    /// Graph links examined across the whole query
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_paths_per_pair: 512,
            max_paths_total: 20_000,
            max_expansions: 2_000_000,
        }
    }
}

/// A candidate cable route and its total cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub hops: Vec<Hop>,
    pub weight: u32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// True for the single-panel `(p, p)` form
    pub fn is_direct(&self) -> bool {
        matches!(self.hops.as_slice(), [(a, b)] if a == b)
    }

    /// Distinct panel ids in first-touched order
    pub fn panel_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for (a, b) in &self.hops {
            for id in [a.as_str(), b.as_str()] {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

fn matches_rack(rack: &str, wanted_rack: &str, wanted_spine: Option<&str>) -> bool {
    if rack == wanted_rack {
        return true;
    }
    match (spine_of(rack), wanted_spine) {
        (Some(spine), Some(wanted)) => spine == wanted,
        _ => false,
    }
}

fn is_eligible(panel: &Panel, constraints: &RouteConstraints) -> bool {
    constraints.accepts_interface(panel.interface_type) && panel.has_capacity(constraints.min_free_ports)
}

impl DataCenterMap {
    /// Panels mounted in (or on the same spine as) the start rack
    pub fn start_candidates(&self, start_rack: &str, constraints: &RouteConstraints) -> Vec<&Panel> {
        let mut found = match spine_of(start_rack) {
            Some(spine) => self.panels_in_spine(spine),
            None => self.panels_in_rack(start_rack, None),
        };
        found.retain(|p| is_eligible(p, constraints));
        found.sort_by_key(|p| self.panels.get_index_of(&p.id));
        found
    }

    /// Panels whose cable lands in (or on the same spine as) the end rack
    pub fn end_candidates(&self, end_rack: &str, constraints: &RouteConstraints) -> Vec<&Panel> {
        let spine = spine_of(end_rack);
        self.panels
            .values()
            .filter(|p| is_eligible(p, constraints) && matches_rack(&p.destination, end_rack, spine))
            .collect()
    }

    /// Single-panel routes: a start panel whose own cable already reaches
    /// the end rack, or lands within four cabinets of it on the same spine.
    fn direct_routes(&self, starts: &[&Panel], end_rack: &str) -> Vec<Route> {
        let mut routes = Vec::new();
        for panel in starts {
            let weight = if panel.destination == end_rack {
                1
            } else {
                match same_spine_distance(&panel.destination, end_rack) {
                    Some(distance) if distance <= 4 => 1 + distance,
                    _ => continue,
                }
            };
            routes.push(Route {
                hops: vec![(panel.id.clone(), panel.id.clone())],
                weight,
            });
        }
        routes
    }

    /// Walk a node path; `None` if any hop is missing or filtered out
    fn evaluate_path(&self, path: &[&str], constraints: &RouteConstraints) -> Option<Route> {
        let mut hops = Vec::with_capacity(path.len().saturating_sub(1));
        let mut weight = 0;
        for pair in path.windows(2) {
            let link = self.graph.edge(pair[0], pair[1])?;
            if !validate_connection(link, constraints) {
                return None;
            }
            weight += link.weight;
            hops.push((pair[0].to_string(), pair[1].to_string()));
        }
        if hops.is_empty() {
            return None;
        }
        Some(Route { hops, weight })
    }

    fn preferred_panel_count(&self, route: &Route, rooms: &BTreeSet<String>) -> usize {
        route
            .panel_ids()
            .into_iter()
            .filter_map(|id| self.panels.get(id))
            .filter(|p| rooms.iter().any(|room| p.location.rack.contains(room.as_str())))
            .count()
    }

    /// Find every route from `start_rack` to `end_rack` that satisfies the
    /// constraints, best first.
    pub fn find_all_routes(&self, start_rack: &str, end_rack: &str, constraints: &RouteConstraints) -> Vec<Route> {
        let starts = self.start_candidates(start_rack, constraints);
        let ends = self.end_candidates(end_rack, constraints);
        tracing::debug!(
            "Route search {} -> {}: {} start panels, {} end panels",
            start_rack,
            end_rack,
            starts.len(),
            ends.len()
        );

        let mut candidates = self.direct_routes(&starts, end_rack);

        let accept = |link: &Link| validate_connection(link, constraints);
        let targets: Vec<_> = ends
            .iter()
            .filter_map(|end| Some((end, self.graph.hops_to(&end.id, accept)?)))
            .collect();

        let mut found = 0usize;
        let mut expansions = 0usize;
        'pairs: for start in &starts {
            for (end, distances) in &targets {
                if found >= self.limits.max_paths_total || expansions >= self.limits.max_expansions {
                    tracing::warn!(
                        "Route search {} -> {} stopped after {} paths, {} links examined",
                        start_rack,
                        end_rack,
                        found,
                        expansions
                    );
                    break 'pairs;
                }
                let limits = WalkLimits {
                    max_paths: self.limits.max_paths_per_pair.min(self.limits.max_paths_total - found),
                    max_expansions: self.limits.max_expansions - expansions,
                };

                let walk = self
                    .graph
                    .simple_paths(&start.id, distances, constraints.max_hops, limits, accept);
                if walk.truncated {
                    tracing::debug!("Path budget reached for {} -> {}", start.id, end.id);
                }
                found += walk.paths.len();
                expansions += walk.expansions;
                candidates.extend(walk.paths.iter().filter_map(|path| self.evaluate_path(path, constraints)));
            }
        }

        let mut seen: HashSet<Vec<Hop>> = HashSet::new();
        let mut routes: Vec<Route> = candidates
            .into_iter()
            .filter(|r| seen.insert(r.hops.clone()))
            .collect();

        routes.sort_by_key(|r| (r.weight, r.len()));

        if let Some(rooms) = &constraints.preferred_rooms {
            // replaces the weight/length order rather than refining it
            let mut scored: Vec<(usize, Route)> = routes
                .into_iter()
                .map(|r| (self.preferred_panel_count(&r, rooms), r))
                .collect();
            scored.sort_by(|(sa, ra), (sb, rb)| sb.cmp(sa).then(ra.weight.cmp(&rb.weight)));
            routes = scored.into_iter().map(|(_, r)| r).collect();
        }

        routes.retain(|r| !r.is_empty());
        tracing::debug!("Route search {} -> {}: {} routes", start_rack, end_rack, routes.len());
        routes
    }
}
