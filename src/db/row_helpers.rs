use sqlx::{Row, sqlite::SqliteRow};

use crate::models::*;

/// Treat a stored '' the same as NULL
pub fn none_if_empty(opt: Option<String>) -> Option<String> {
    opt.filter(|s| !s.is_empty())
}

/// Map a SQLite row to a PanelRecord struct
pub fn map_panel_row(row: &SqliteRow) -> PanelRecord {
    PanelRecord {
        dcim_id: row.get("dcim_id"),
        name: row.get("name"),
        room: row.get("room"),
        rack: row.get("rack"),
        u: row.get("u"),
        interface: row.get("interface"),
        size: none_if_empty(row.get("size")),
        status: row.get("status"),
        how_many_ports_remain: row.get("how_many_ports_remain"),
        classification: none_if_empty(row.get("classification")),
        destination: row.get("destination"),
        date_created: row.try_get("date_created").ok(),
        date_updated: row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>("date_updated").ok().flatten(),
    }
}
