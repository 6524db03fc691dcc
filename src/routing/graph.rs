use indexmap::IndexMap;
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use super::location::same_spine_distance;
use super::panel::{Classification, InterfaceType, Panel};
use super::search::SearchLimits;

/// Node payload: a snapshot of the panel's routing-relevant state
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: String,
    pub location: String,
    pub interface_type: InterfaceType,
    pub classification: Option<Classification>,
    pub status: bool,
    pub free_ports: u32,
}

impl NodeInfo {
    fn from_panel(panel: &Panel) -> Self {
        Self {
            id: panel.id.clone(),
            location: panel.location.to_string(),
            interface_type: panel.interface_type,
            classification: panel.classification,
            status: panel.status,
            free_ports: panel.free_ports,
        }
    }
}

/// Edge payload: a cablable link between two panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub weight: u32,
    pub interface_type: InterfaceType,
    pub free_ports: u32,
    pub classification: Option<Classification>,
}

/// Undirected panel graph keyed by panel id
#[derive(Debug, Default)]
pub struct PanelGraph {
    graph: UnGraph<NodeInfo, Link>,
    index: HashMap<String, NodeIndex>,
}

impl PanelGraph {
    /// Insert a node, or refresh its payload if the id is already known
    pub fn add_node(&mut self, info: NodeInfo) -> NodeIndex {
        if let Some(&ix) = self.index.get(&info.id) {
            self.graph[ix] = info;
            return ix;
        }
        let id = info.id.clone();
        let ix = self.graph.add_node(info);
        self.index.insert(id, ix);
        ix
    }

    /// Insert or replace the edge between two known nodes.
    /// Returns false if either id has no node.
    pub fn add_edge(&mut self, a: &str, b: &str, link: Link) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => {
                self.graph.update_edge(ia, ib, link);
                true
            }
            _ => false,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeInfo> {
        self.index.get(id).map(|&ix| &self.graph[ix])
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&Link> {
        let (&ia, &ib) = (self.index.get(a)?, self.index.get(b)?);
        self.graph.find_edge(ia, ib).and_then(|e| self.graph.edge_weight(e))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Hop distance to `to` from every node that can reach it over
    /// accepted links. `None` for an unknown id.
    pub fn hops_to<F>(&self, to: &str, accept: F) -> Option<HopDistances>
    where
        F: Fn(&Link) -> bool,
    {
        let target = *self.index.get(to)?;
        let mut hops = HashMap::from([(target, 0u32)]);
        let mut queue = VecDeque::from([(target, 0u32)]);

        while let Some((node, depth)) = queue.pop_front() {
            for edge in self.graph.edges(node) {
                if !accept(edge.weight()) {
                    continue;
                }
                if let Entry::Vacant(slot) = hops.entry(other_end(&edge, node)) {
                    slot.insert(depth + 1);
                    queue.push_back((other_end(&edge, node), depth + 1));
                }
            }
        }

        Some(HopDistances { target, hops })
    }

    /// Depth-first walk for simple paths from `from` to the target of
    /// `distances`, using at most `cutoff` accepted links.
    ///
    /// A branch is only followed while the hops already used plus the
    /// neighbour's distance to the target fit in `cutoff`, so an unreachable
    /// target costs nothing. Every link examined counts against
    /// `limits.max_expansions`; the walk stops early on either limit.
    pub fn simple_paths<F>(
        &self,
        from: &str,
        distances: &HopDistances,
        cutoff: u32,
        limits: WalkLimits,
        accept: F,
    ) -> PathWalk<'_>
    where
        F: Fn(&Link) -> bool,
    {
        let mut walk = Walk {
            graph: self,
            distances,
            cutoff,
            limits,
            accept,
            path: Vec::new(),
            out: PathWalk::default(),
        };

        let Some(&start) = self.index.get(from) else {
            return walk.out;
        };
        let reachable = distances.hops.get(&start).is_some_and(|&d| d <= cutoff);
        if start == distances.target || !reachable {
            return walk.out;
        }
        if limits.max_paths == 0 {
            walk.out.truncated = true;
            return walk.out;
        }

        walk.path.push(start);
        walk.visit(start);
        walk.out
    }
}

fn other_end(edge: &EdgeReference<'_, Link>, node: NodeIndex) -> NodeIndex {
    if edge.source() == node {
        edge.target()
    } else {
        edge.source()
    }
}

/// Breadth-first hop counts towards one target node
#[derive(Debug, Clone)]
pub struct HopDistances {
    target: NodeIndex,
    hops: HashMap<NodeIndex, u32>,
}

/// Caps on a single path walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    pub max_paths: usize,
    pub max_expansions: usize,
}

#[cfg(test)]
impl WalkLimits {
    pub fn unbounded() -> Self {
        Self {
            max_paths: usize::MAX,
            max_expansions: usize::MAX,
        }
    }
}

/// Paths found by one walk and the work it took
#[derive(Debug, Default)]
pub struct PathWalk<'a> {
    pub paths: Vec<Vec<&'a str>>,
    /// Links examined
    pub expansions: usize,
    /// Stopped on a limit before the walk was complete
    pub truncated: bool,
}

struct Walk<'g, 'd, F> {
    graph: &'g PanelGraph,
    distances: &'d HopDistances,
    cutoff: u32,
    limits: WalkLimits,
    accept: F,
    path: Vec<NodeIndex>,
    out: PathWalk<'g>,
}

impl<'g, F> Walk<'g, '_, F>
where
    F: Fn(&Link) -> bool,
{
    fn visit(&mut self, node: NodeIndex) {
        let graph = self.graph;
        let used = self.path.len() as u32;

        for edge in graph.graph.edges(node) {
            if self.out.truncated {
                return;
            }
            if self.out.expansions >= self.limits.max_expansions {
                self.out.truncated = true;
                return;
            }
            self.out.expansions += 1;

            if !(self.accept)(edge.weight()) {
                continue;
            }
            let next = other_end(&edge, node);
            let Some(&remaining) = self.distances.hops.get(&next) else {
                continue;
            };
            if used + remaining > self.cutoff || self.path.contains(&next) {
                continue;
            }

            self.path.push(next);
            if next == self.distances.target {
                let ids = self.path.iter().map(|&ix| graph.graph[ix].id.as_str()).collect();
                self.out.paths.push(ids);
                if self.out.paths.len() >= self.limits.max_paths {
                    self.out.truncated = true;
                }
            } else {
                self.visit(next);
            }
            self.path.pop();
        }
    }
}

/// Cost of cabling `from`'s far end into `to`'s rack, or `None` when the
/// two cannot be joined directly.
/// Rules in priority order: destination is the rack (1), same spine one
/// cabinet over (2), two over (3), three or four over (3 + distance).
pub fn connection_weight(from: &Panel, to: &Panel) -> Option<u32> {
    if from.destination == to.rack() {
        return Some(1);
    }
    match same_spine_distance(&from.destination, to.rack()) {
        Some(1) => Some(2),
        Some(2) => Some(3),
        Some(d @ 3..=4) => Some(3 + d),
        _ => None,
    }
}

/// Weight of the undirected link between two panels: the cheaper of the
/// two orientations. A cable run shows up once per end, so a panel whose
/// far end lands in the other's rack links them either way round.
pub fn link_weight(a: &Panel, b: &Panel) -> Option<u32> {
    match (connection_weight(a, b), connection_weight(b, a)) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

/// All panels of one route query and the connectivity between them
#[derive(Debug, Default)]
pub struct DataCenterMap {
    pub(super) panels: IndexMap<String, Panel>,
    pub(super) graph: PanelGraph,
    rack_panels: BTreeMap<String, BTreeMap<InterfaceType, BTreeSet<String>>>,
    spine_panels: BTreeMap<String, BTreeSet<String>>,
    pub(super) limits: SearchLimits,
}

impl DataCenterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SearchLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn add_panel(&mut self, panel: Panel) {
        if let Some(previous) = self.panels.get(&panel.id).cloned() {
            self.unindex(&previous);
        }

        self.rack_panels
            .entry(panel.rack().to_string())
            .or_default()
            .entry(panel.interface_type)
            .or_default()
            .insert(panel.id.clone());
        self.spine_panels
            .entry(panel.spine().to_string())
            .or_default()
            .insert(panel.id.clone());

        self.graph.add_node(NodeInfo::from_panel(&panel));
        self.panels.insert(panel.id.clone(), panel);
    }

    fn unindex(&mut self, panel: &Panel) {
        if let Some(by_type) = self.rack_panels.get_mut(panel.rack()) {
            if let Some(ids) = by_type.get_mut(&panel.interface_type) {
                ids.remove(&panel.id);
            }
        }
        if let Some(ids) = self.spine_panels.get_mut(panel.spine()) {
            ids.remove(&panel.id);
        }
    }

    /// Add an edge for every pair of panels that can be cabled together.
    ///
    /// The weight rule compares one panel's destination with the other's
    /// rack, so it is tried in both orientations and the edge keeps the
    /// cheaper result (see [`link_weight`]). A pair linked only by the second
    /// panel's cable still gets an edge.
    pub fn connect_panels(&mut self) {
        let panels: Vec<&Panel> = self.panels.values().collect();
        let mut links = Vec::new();

        for (i, p1) in panels.iter().enumerate() {
            for p2 in &panels[i + 1..] {
                if !p1.is_available() || !p2.is_available() {
                    continue;
                }
                if p1.interface_type != p2.interface_type {
                    continue;
                }
                if !Classification::compatible(p1.classification, p2.classification) {
                    continue;
                }
                let Some(weight) = link_weight(p1, p2) else {
                    continue;
                };
                links.push((
                    p1.id.clone(),
                    p2.id.clone(),
                    Link {
                        weight,
                        interface_type: p1.interface_type,
                        free_ports: p1.free_ports.min(p2.free_ports),
                        classification: p1.classification,
                    },
                ));
            }
        }

        for (a, b, link) in links {
            tracing::debug!("Link {} -> {} (weight {})", a, b, link.weight);
            self.graph.add_edge(&a, &b, link);
        }
        tracing::debug!(
            "Panel graph ready: {} nodes, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn graph(&self) -> &PanelGraph {
        &self.graph
    }

    /// Panels mounted in a rack, optionally narrowed to one interface type
    pub fn panels_in_rack(&self, rack: &str, interface_type: Option<InterfaceType>) -> Vec<&Panel> {
        let Some(by_type) = self.rack_panels.get(rack) else {
            return Vec::new();
        };
        by_type
            .iter()
            .filter(|(t, _)| interface_type.map_or(true, |wanted| wanted == **t))
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| self.panels.get(id))
            .collect()
    }

    /// Panels mounted anywhere on a spine
    pub fn panels_in_spine(&self, spine: &str) -> Vec<&Panel> {
        self.spine_panels
            .get(spine)
            .map(|ids| ids.iter().filter_map(|id| self.panels.get(id)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::panel::fixtures::panel;
    use InterfaceType::*;

    fn map_of(panels: Vec<Panel>) -> DataCenterMap {
        let mut map = DataCenterMap::new();
        for p in panels {
            map.add_panel(p);
        }
        map.connect_panels();
        map
    }

    #[test]
    fn test_direct_edge() {
        let red = Some(Classification::Red);
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, red),
            panel("P2", "A01-C03", "A05-C09", Rj, 12, red),
        ]);
        let link = map.graph().edge("P1", "P2").unwrap();
        assert_eq!(link.weight, 1);
        assert_eq!(link.free_ports, 12);
        assert_eq!(link.classification, red);
        assert_eq!(map.graph().edge_count(), 1);
    }

    #[test]
    fn test_weight_tiers() {
        let from = panel("P1", "B01-C01", "A01-C02", Rj, 5, None);
        let at = |rack: &str| panel("X", rack, "Z01-C01", Rj, 5, None);

        assert_eq!(connection_weight(&from, &at("A01-C02")), Some(1));
        assert_eq!(connection_weight(&from, &at("A01-C03")), Some(2));
        assert_eq!(connection_weight(&from, &at("A01-C01")), Some(2));
        assert_eq!(connection_weight(&from, &at("A01-C04")), Some(3));
        assert_eq!(connection_weight(&from, &at("A01-C05")), Some(6));
        assert_eq!(connection_weight(&from, &at("A01-C06")), Some(7));
        assert_eq!(connection_weight(&from, &at("A01-C07")), None);
        assert_eq!(connection_weight(&from, &at("A02-C02")), None);
    }

    #[test]
    fn test_weight_compares_destination_to_rack() {
        let p1 = panel("P1", "A01-C02", "A05-C09", Rj, 5, None);
        let p2 = panel("P2", "A05-C09", "B01-C01", Rj, 5, None);
        assert_eq!(connection_weight(&p1, &p2), Some(1));
        assert_eq!(connection_weight(&p2, &p1), None);

        let p3 = panel("P3", "A07-C07", "A01-C02", Rj, 5, None);
        let p4 = panel("P4", "A05-C09", "B01-C01", Rj, 5, None);
        assert_eq!(connection_weight(&p3, &p4), None);
        assert_eq!(connection_weight(&p4, &p3), None);
    }

    #[test]
    fn test_link_weight_takes_cheaper_orientation() {
        // P1's cable lands one cabinet from P2; P2's cable lands in P1's rack
        let p1 = panel("P1", "A01-C02", "A05-C08", Rj, 5, None);
        let p2 = panel("P2", "A05-C09", "A01-C02", Rj, 5, None);
        assert_eq!(connection_weight(&p1, &p2), Some(2));
        assert_eq!(link_weight(&p1, &p2), Some(1));
        assert_eq!(link_weight(&p2, &p1), Some(1));

        // only the second panel's cable reaches the first
        let p3 = panel("P3", "A01-C02", "Z01-C01", Rj, 5, None);
        assert_eq!(connection_weight(&p3, &p2), None);
        assert_eq!(link_weight(&p3, &p2), Some(1));

        let p4 = panel("P4", "B01-C01", "Z01-C01", Rj, 5, None);
        assert_eq!(link_weight(&p3, &p4), None);
    }

    #[test]
    fn test_unparseable_racks_do_not_link() {
        let p1 = panel("P1", "ROOM", "somewhere", Rj, 5, None);
        let p2 = panel("P2", "ROOM", "elsewhere", Rj, 5, None);
        assert_eq!(connection_weight(&p1, &p2), None);
    }

    #[test]
    fn test_no_edge_for_mismatched_interface() {
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, None),
            panel("P2", "A01-C03", "A05-C09", Mm, 12, None),
        ]);
        assert!(map.graph().edge("P1", "P2").is_none());
    }

    #[test]
    fn test_classification_rules() {
        let red = Some(Classification::Red);
        let black = Some(Classification::Black);
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, red),
            panel("P2", "A01-C03", "A05-C09", Rj, 12, black),
            panel("P3", "A01-C03", "A05-C09", Rj, 12, None),
        ]);
        assert!(map.graph().edge("P1", "P2").is_none());
        assert_eq!(map.graph().edge("P1", "P3").unwrap().weight, 1);
    }

    #[test]
    fn test_unavailable_panels_get_no_edges() {
        let mut disabled = panel("P2", "A01-C03", "A05-C09", Rj, 12, None);
        disabled.status = false;
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, None),
            disabled,
            panel("P3", "A01-C03", "A05-C09", Rj, 0, None),
        ]);
        assert_eq!(map.graph().edge_count(), 0);
        assert_eq!(map.graph().node_count(), 3);
    }

    #[test]
    fn test_edge_free_ports_is_minimum() {
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, None),
            panel("P2", "A01-C03", "A05-C09", Rj, 3, None),
        ]);
        assert_eq!(map.graph().edge("P2", "P1").unwrap().free_ports, 3);
    }

    #[test]
    fn test_indexes() {
        let map = map_of(vec![
            panel("P1", "A01-C02", "A01-C03", Rj, 12, None),
            panel("P2", "A01-C02", "A05-C09", Mm, 12, None),
            panel("P3", "A01-C05", "A05-C09", Rj, 12, None),
            panel("P4", "A05-C09", "A01-C02", Rj, 12, None),
        ]);
        assert_eq!(map.panels_in_rack("A01-C02", None).len(), 2);
        let rj: Vec<&str> = map
            .panels_in_rack("A01-C02", Some(Rj))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(rj, vec!["P1"]);
        assert_eq!(map.panels_in_spine("A01").len(), 3);
        assert!(map.panels_in_rack("Z99-C01", None).is_empty());
    }

    #[test]
    fn test_re_adding_panel_moves_it() {
        let mut map = DataCenterMap::new();
        map.add_panel(panel("P1", "A01-C02", "A01-C03", Rj, 12, None));
        map.add_panel(panel("P1", "A05-C09", "A01-C03", Rj, 4, None));
        assert_eq!(map.len(), 1);
        assert!(map.panels_in_rack("A01-C02", None).is_empty());
        assert_eq!(map.panels_in_rack("A05-C09", None).len(), 1);
        assert_eq!(map.graph().node("P1").unwrap().free_ports, 4);
    }

    fn any_link(_: &Link) -> bool {
        true
    }

    fn walk_ids<'a>(graph: &'a PanelGraph, from: &str, to: &str, cutoff: u32, limits: WalkLimits) -> PathWalk<'a> {
        match graph.hops_to(to, any_link) {
            Some(distances) => graph.simple_paths(from, &distances, cutoff, limits, any_link),
            None => PathWalk::default(),
        }
    }

    #[test]
    fn test_simple_paths_respect_cutoff() {
        // chain P1 - P2 - P3 - P4
        let map = map_of(vec![
            panel("P1", "A01-C01", "A01-C02", Rj, 5, None),
            panel("P2", "A01-C02", "B01-C01", Rj, 5, None),
            panel("P3", "B01-C01", "C01-C01", Rj, 5, None),
            panel("P4", "C01-C01", "D01-C01", Rj, 5, None),
        ]);
        let graph = map.graph();
        let all = WalkLimits::unbounded();
        assert_eq!(walk_ids(graph, "P1", "P4", 3, all).paths, vec![vec!["P1", "P2", "P3", "P4"]]);
        assert!(walk_ids(graph, "P1", "P4", 2, all).paths.is_empty());
        assert!(walk_ids(graph, "P1", "P1", 5, all).paths.is_empty());
        assert!(walk_ids(graph, "P1", "nope", 5, all).paths.is_empty());
        assert!(walk_ids(graph, "nope", "P4", 5, all).paths.is_empty());
    }

    #[test]
    fn test_hops_to_counts_accepted_links_only() {
        let map = map_of(vec![
            panel("P1", "A01-C01", "A01-C02", Rj, 5, None),
            panel("P2", "A01-C02", "B01-C01", Rj, 5, None),
            panel("P3", "B01-C01", "C01-C01", Rj, 1, None),
        ]);
        let graph = map.graph();
        let all = graph.hops_to("P3", any_link).unwrap();
        let walk = graph.simple_paths("P1", &all, 2, WalkLimits::unbounded(), any_link);
        assert_eq!(walk.paths, vec![vec!["P1", "P2", "P3"]]);

        // the P2 - P3 link has a single free port
        let roomy = |link: &Link| link.free_ports >= 2;
        let filtered = graph.hops_to("P3", roomy).unwrap();
        let walk = graph.simple_paths("P1", &filtered, 2, WalkLimits::unbounded(), roomy);
        assert!(walk.paths.is_empty());
        assert_eq!(walk.expansions, 0);
    }

    #[test]
    fn test_walk_skips_unreachable_target_without_work() {
        // five panels on one spine, all linked, and a target with no links
        let mut panels: Vec<Panel> = (1..=5)
            .map(|c| panel(&format!("P{}", c), &format!("A01-C0{}", c), "A01-C03", Rj, 5, None))
            .collect();
        panels.push(panel("E", "B01-C01", "Z01-C01", Rj, 5, None));
        let map = map_of(panels);
        let graph = map.graph();
        assert_eq!(graph.edge_count(), 10);

        let walk = walk_ids(graph, "P1", "E", 10, WalkLimits::unbounded());
        assert!(walk.paths.is_empty());
        assert_eq!(walk.expansions, 0);
        assert!(!walk.truncated);
    }

    #[test]
    fn test_walk_limits() {
        // P1 reaches P5 through each of P2, P3 and P4
        let map = map_of(vec![
            panel("P1", "A01-C01", "B01-C01", Rj, 5, None),
            panel("P2", "B01-C01", "C01-C01", Rj, 5, None),
            panel("P3", "B01-C01", "C01-C01", Rj, 5, None),
            panel("P4", "B01-C01", "C01-C01", Rj, 5, None),
            panel("P5", "C01-C01", "Z01-C01", Rj, 5, None),
        ]);
        let graph = map.graph();

        let full = walk_ids(graph, "P1", "P5", 3, WalkLimits::unbounded());
        assert_eq!(full.paths.len(), 3);
        assert!(!full.truncated);

        let two = walk_ids(graph, "P1", "P5", 3, WalkLimits { max_paths: 2, max_expansions: usize::MAX });
        assert_eq!(two.paths.len(), 2);
        assert!(two.truncated);

        let starved = walk_ids(graph, "P1", "P5", 3, WalkLimits { max_paths: 10, max_expansions: 1 });
        assert!(starved.paths.is_empty());
        assert!(starved.truncated);
        assert_eq!(starved.expansions, 1);
    }
}
