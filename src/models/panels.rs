use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routing::Classification;

/// PanelRecord is one catalog row as stored by the inventory sync.
/// Composite fields stay in their stored text form here; they are parsed
/// when the row is turned into routable panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelRecord {
    pub dcim_id: String,
    pub name: String,
    pub room: String,
    pub rack: String,
    pub u: String,
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub status: String,
    /// `"A07-C07: 12, A05-C09: 4"` or a bare count
    pub how_many_ports_remain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    /// Comma-separated list of far-end racks
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
}

/// ImportPanelRequest is one row of a bulk catalog import
#[derive(Debug, Clone, Deserialize)]
pub struct ImportPanelRequest {
    pub dcim_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub rack: String,
    #[serde(default)]
    pub u: String,
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub how_many_ports_remain: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub destination: String,
}

/// BulkImportRequest replaces or inserts catalog rows keyed by dcim_id
#[derive(Debug, Clone, Deserialize)]
pub struct BulkImportRequest {
    pub panels: Vec<ImportPanelRequest>,
}

/// UpdatePanelRequest edits the routing-relevant fields of a panel.
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePanelRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub how_many_ports_remain: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

/// PanelFilterQuery narrows the catalog listing.
/// `room`/`rack` match exactly; `q` matches room or rack exactly, or a name substring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelFilterQuery {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl PanelFilterQuery {
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn rack(&self) -> Option<&str> {
        self.rack.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// PanelListResponse carries the filtered rows plus the racks they span
/// (omitted when the listing is already narrowed to one rack)
#[derive(Debug, Clone, Serialize)]
pub struct PanelListResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub racks: Vec<String>,
    pub panels: Vec<PanelRecord>,
}

/// RackQuery for listing racks, optionally within one room
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RackQuery {
    #[serde(default)]
    pub room: Option<String>,
}

/// Which catalog classifications a routable-panel fetch should include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationFilter {
    Any,
    Only(Classification),
    /// red, black, or rows tagged `red+black`
    RedOrBlack,
}

/// Catalog status values that mean "enabled"
pub const ENABLED_STATUS_VALUES: &[&str] = &["True", "true", "1"];

/// Catalog classification tag for panels usable on both networks
pub const RED_BLACK: &str = "red+black";
