use std::collections::BTreeSet;

use super::graph::Link;
use super::panel::{Classification, InterfaceType};

pub const DEFAULT_MAX_HOPS: u32 = 3;
pub const MAX_HOPS_LIMIT: u32 = 10;

/// Filters applied to a single route query
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConstraints {
    pub interface_type: Option<InterfaceType>,
    pub min_free_ports: u32,
    pub classification: Option<Classification>,
    pub max_hops: u32,
    pub preferred_rooms: Option<BTreeSet<String>>,
}

impl Default for RouteConstraints {
    fn default() -> Self {
        Self {
            interface_type: None,
            min_free_ports: 1,
            classification: None,
            max_hops: DEFAULT_MAX_HOPS,
            preferred_rooms: None,
        }
    }
}

impl RouteConstraints {
    pub fn new(interface_type: Option<InterfaceType>) -> Self {
        Self {
            interface_type,
            ..Self::default()
        }
    }

    pub fn with_min_free_ports(mut self, min_free_ports: u32) -> Self {
        self.min_free_ports = min_free_ports;
        self
    }

    pub fn with_classification(mut self, classification: Option<Classification>) -> Self {
        self.classification = classification;
        self
    }

    /// Missing hop limits fall back to the default; anything else is
    /// clamped to `[1, MAX_HOPS_LIMIT]`.
    pub fn with_max_hops(mut self, max_hops: Option<i64>) -> Self {
        self.max_hops = match max_hops {
            Some(hops) => hops.clamp(1, MAX_HOPS_LIMIT as i64) as u32,
            None => DEFAULT_MAX_HOPS,
        };
        self
    }

    /// Blank room tokens are dropped; an empty list means no preference.
    pub fn with_preferred_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rooms: BTreeSet<String> = rooms
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        self.preferred_rooms = if rooms.is_empty() { None } else { Some(rooms) };
        self
    }

    /// Whether a panel of this interface type can take part in the query
    pub fn accepts_interface(&self, interface_type: InterfaceType) -> bool {
        self.interface_type.map_or(true, |wanted| wanted == interface_type)
    }
}

/// Check one graph edge against the query filters
pub fn validate_connection(link: &Link, constraints: &RouteConstraints) -> bool {
    if let Some(wanted) = constraints.interface_type {
        if link.interface_type != wanted {
            return false;
        }
    }
    if let Some(wanted) = constraints.classification {
        if link.classification != Some(wanted) {
            return false;
        }
    }
    link.free_ports >= constraints.min_free_ports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(interface_type: InterfaceType, free_ports: u32, classification: Option<Classification>) -> Link {
        Link {
            weight: 1,
            interface_type,
            free_ports,
            classification,
        }
    }

    #[test]
    fn test_max_hops_clamped() {
        assert_eq!(RouteConstraints::default().max_hops, 3);
        assert_eq!(RouteConstraints::default().with_max_hops(Some(15)).max_hops, 10);
        assert_eq!(RouteConstraints::default().with_max_hops(Some(0)).max_hops, 1);
        assert_eq!(RouteConstraints::default().with_max_hops(Some(-4)).max_hops, 1);
        assert_eq!(RouteConstraints::default().with_max_hops(Some(6)).max_hops, 6);
        assert_eq!(RouteConstraints::default().with_max_hops(None).max_hops, 3);
    }

    #[test]
    fn test_preferred_rooms() {
        let c = RouteConstraints::default().with_preferred_rooms(["ROOM1", " ", "ROOM2"]);
        let rooms = c.preferred_rooms.unwrap();
        assert_eq!(rooms.len(), 2);
        assert!(rooms.contains("ROOM1"));

        let c = RouteConstraints::default().with_preferred_rooms(Vec::<String>::new());
        assert!(c.preferred_rooms.is_none());
    }

    #[test]
    fn test_unset_constraints_accept_anything() {
        let c = RouteConstraints::default();
        assert!(validate_connection(&link(InterfaceType::Sm, 1, None), &c));
        assert!(validate_connection(&link(InterfaceType::Rj, 5, Some(Classification::Red)), &c));
        assert!(c.accepts_interface(InterfaceType::Mm));
    }

    #[test]
    fn test_interface_mismatch_fails() {
        let c = RouteConstraints::new(Some(InterfaceType::Rj));
        assert!(!validate_connection(&link(InterfaceType::Mm, 5, None), &c));
        assert!(validate_connection(&link(InterfaceType::Rj, 5, None), &c));
        assert!(!c.accepts_interface(InterfaceType::Sm));
    }

    #[test]
    fn test_classification_mismatch_fails() {
        let c = RouteConstraints::default().with_classification(Some(Classification::Red));
        assert!(validate_connection(&link(InterfaceType::Rj, 5, Some(Classification::Red)), &c));
        assert!(!validate_connection(&link(InterfaceType::Rj, 5, Some(Classification::Black)), &c));
        // an untagged edge does not satisfy an explicit classification filter
        assert!(!validate_connection(&link(InterfaceType::Rj, 5, None), &c));
    }

    #[test]
    fn test_min_free_ports() {
        let c = RouteConstraints::default().with_min_free_ports(4);
        assert!(!validate_connection(&link(InterfaceType::Rj, 3, None), &c));
        assert!(validate_connection(&link(InterfaceType::Rj, 4, None), &c));
    }
}
