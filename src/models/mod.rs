mod panels;
mod routes;

pub use panels::*;
pub use routes::*;

use serde::Serialize;

/// SyncStatus reports whether a bulk catalog import is running.
/// Route queries made meanwhile may see a partly updated catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_updating: bool,
}

/// ImportResult summarizes a bulk catalog import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    pub created: i32,
    pub updated: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
