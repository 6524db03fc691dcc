use serde::{Deserialize, Serialize};

use crate::routing::{Classification, InterfaceType, RouteConstraints};

use super::panels::{ClassificationFilter, RED_BLACK};

/// FindRoutesRequest is the body of a route query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRoutesRequest {
    #[serde(default)]
    pub interface_type: String,
    /// Number or numeric string; defaults to 1
    #[serde(default)]
    pub min_ports: Option<serde_json::Value>,
    /// `red`, `black`, or `red+black` for no restriction
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub start_rack: String,
    #[serde(default)]
    pub end_rack: String,
    /// Number or numeric string; defaults to 3, clamped to [1, 10]
    #[serde(default)]
    pub max_hops: Option<serde_json::Value>,
    #[serde(default)]
    pub preferred_rooms: Option<Vec<String>>,
}

/// Accept `4`, `"4"` or `4.0`; anything else is treated as absent
fn lenient_int(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl FindRoutesRequest {
    pub fn interface(&self) -> Option<InterfaceType> {
        self.interface_type.parse().ok()
    }

    /// The requested classification, or `None` for "any"
    pub fn classification(&self) -> Option<Classification> {
        self.classification.as_deref().and_then(Classification::parse_lenient)
    }

    /// Catalog-level prefilter matching the requested classification
    pub fn classification_filter(&self) -> ClassificationFilter {
        let Some(raw) = self.classification.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return ClassificationFilter::Any;
        };
        if raw.eq_ignore_ascii_case(RED_BLACK) {
            return ClassificationFilter::RedOrBlack;
        }
        match Classification::parse_lenient(raw) {
            Some(c) => ClassificationFilter::Only(c),
            None => ClassificationFilter::Any,
        }
    }

    pub fn min_ports(&self) -> u32 {
        lenient_int(self.min_ports.as_ref())
            .map(|n| n.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(1)
    }

    pub fn max_hops(&self) -> Option<i64> {
        lenient_int(self.max_hops.as_ref())
    }

    /// Build search constraints. Only an unknown interface type is rejected;
    /// every other field is defaulted or clamped.
    pub fn constraints(&self) -> Result<RouteConstraints, String> {
        let interface = self
            .interface()
            .ok_or_else(|| format!("Unknown interface type: {:?}", self.interface_type))?;

        Ok(RouteConstraints::new(Some(interface))
            .with_min_free_ports(self.min_ports())
            .with_classification(self.classification())
            .with_max_hops(self.max_hops())
            .with_preferred_rooms(self.preferred_rooms.iter().flatten()))
    }
}

/// RouteStep is one panel of a formatted route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub panel_id: String,
    pub location: String,
    pub destination: String,
    pub interface_type: String,
}

/// RouteReport is a ranked route with its cost and a printable breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub rank: usize,
    pub weight: u32,
    pub hops: usize,
    pub cross_spine: bool,
    pub steps: Vec<RouteStep>,
    pub details: String,
}
