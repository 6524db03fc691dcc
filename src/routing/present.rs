use std::fmt::Write;

use crate::models::{RouteReport, RouteStep};

use super::graph::DataCenterMap;
use super::panel::{Classification, Panel};
use super::search::{Hop, Route};

const RULE_WIDTH: usize = 60;

fn push_panel_summary(out: &mut String, label: &str, panel: &Panel) {
    let _ = writeln!(out, "{}: Panel {} at {}", label, panel.id, panel.location);
    let _ = writeln!(out, "Type: {}", panel.interface_type);
    let _ = writeln!(out, "Classification: {}", Classification::label(panel.classification));
    let _ = writeln!(out, "Available Ports: {}", panel.free_ports);
}

impl DataCenterMap {
    /// Render a route as a printable breakdown, one block per hop
    pub fn visualize(&self, hops: &[Hop]) -> String {
        let (Some((first_id, _)), Some((_, last_id))) = (hops.first(), hops.last()) else {
            return "No valid route found".to_string();
        };
        let (Some(first), Some(last)) = (self.panel(first_id), self.panel(last_id)) else {
            return "No valid route found".to_string();
        };

        let mut out = String::new();
        out.push_str("Route Details:\n");
        let _ = writeln!(out, "Source Rack: {} → Destination Rack: {}", first.rack(), last.destination);
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

        push_panel_summary(&mut out, "Start", first);
        out.push('\n');

        for (i, (a, b)) in hops.iter().enumerate() {
            let (Some(p1), Some(p2)) = (self.panel(a), self.panel(b)) else {
                continue;
            };
            let _ = writeln!(out, "Connection {}:", i + 1);
            let _ = writeln!(
                out,
                "  {} ({} to {}) → {} ({} to {})",
                p1.id, p1.location, p1.destination, p2.id, p2.location, p2.destination
            );
            let _ = writeln!(out, "  Interface Type: {}", p1.interface_type);
            let _ = writeln!(out, "  Free Ports: {}", p1.free_ports.min(p2.free_ports));
            let _ = writeln!(out, "  Classification: {}", Classification::label(p1.classification));
            if p1.spine() != p2.spine() {
                let _ = writeln!(out, "  Cross-Spine Connection: {} → {}", p1.spine(), p2.spine());
            }
            out.push('\n');
        }

        push_panel_summary(&mut out, "End", last);
        let _ = write!(out, "Final Destination: {}", last.destination);
        out
    }

    /// One record per distinct panel the route touches, in order
    pub fn route_steps(&self, route: &Route) -> Vec<RouteStep> {
        route
            .panel_ids()
            .into_iter()
            .filter_map(|id| self.panel(id))
            .map(|panel| RouteStep {
                panel_id: panel.id.clone(),
                location: panel.location.to_string(),
                destination: panel.destination.clone(),
                interface_type: panel.interface_type.to_string(),
            })
            .collect()
    }

    /// True when any hop joins panels on different spines
    pub fn crosses_spine(&self, route: &Route) -> bool {
        route.hops.iter().any(|(a, b)| match (self.panel(a), self.panel(b)) {
            (Some(p1), Some(p2)) => p1.spine() != p2.spine(),
            _ => false,
        })
    }

    pub fn route_report(&self, rank: usize, route: &Route) -> RouteReport {
        RouteReport {
            rank,
            weight: route.weight,
            hops: route.len(),
            cross_spine: self.crosses_spine(route),
            steps: self.route_steps(route),
            details: self.visualize(&route.hops),
        }
    }
}
