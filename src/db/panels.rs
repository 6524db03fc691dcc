use anyhow::Result;
use sqlx::{Pool, Sqlite};

use crate::models::*;
use crate::routing::InterfaceType;

use super::row_helpers::map_panel_row;
use super::NotFoundError;

const SELECT_PANEL: &str = r#"
    SELECT dcim_id, name, room, rack, u, interface, size, status,
           how_many_ports_remain, classification, destination,
           date_created, date_updated
    FROM panels
"#;

/// Outcome of writing one import row
pub enum Upserted {
    Created,
    Updated,
}

pub struct PanelRepo;

impl PanelRepo {
    /// List catalog rows ordered by rack.
    /// Room and rack narrow exactly; free text is only used when neither is set.
    pub async fn list(pool: &Pool<Sqlite>, filter: &PanelFilterQuery) -> Result<Vec<PanelRecord>> {
        let order = "ORDER BY rack, dcim_id";
        let rows = match (filter.room(), filter.rack(), filter.text()) {
            (Some(room), Some(rack), _) => {
                sqlx::query(&format!("{} WHERE room = ? AND rack = ? {}", SELECT_PANEL, order))
                    .bind(room)
                    .bind(rack)
                    .fetch_all(pool)
                    .await?
            }
            (Some(room), None, _) => {
                sqlx::query(&format!("{} WHERE room = ? {}", SELECT_PANEL, order))
                    .bind(room)
                    .fetch_all(pool)
                    .await?
            }
            (None, Some(rack), _) => {
                sqlx::query(&format!("{} WHERE rack = ? {}", SELECT_PANEL, order))
                    .bind(rack)
                    .fetch_all(pool)
                    .await?
            }
            (None, None, Some(text)) => {
                sqlx::query(&format!(
                    "{} WHERE room = ? OR rack = ? OR name LIKE ? {}",
                    SELECT_PANEL, order
                ))
                .bind(text)
                .bind(text)
                .bind(format!("%{}%", text))
                .fetch_all(pool)
                .await?
            }
            (None, None, None) => {
                sqlx::query(&format!("{} {}", SELECT_PANEL, order))
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(rows.iter().map(map_panel_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, dcim_id: &str) -> Result<Option<PanelRecord>> {
        let row = sqlx::query(&format!("{} WHERE dcim_id = ?", SELECT_PANEL))
            .bind(dcim_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.as_ref().map(map_panel_row))
    }

    /// Edit the routing-relevant fields of a panel; absent fields are kept
    pub async fn update(pool: &Pool<Sqlite>, dcim_id: &str, req: &UpdatePanelRequest) -> Result<PanelRecord> {
        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE panels SET
                name = COALESCE(?, name),
                interface = COALESCE(?, interface),
                status = COALESCE(?, status),
                how_many_ports_remain = COALESCE(?, how_many_ports_remain),
                classification = COALESCE(?, classification),
                destination = COALESCE(?, destination),
                date_updated = ?
            WHERE dcim_id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.interface)
        .bind(&req.status)
        .bind(&req.how_many_ports_remain)
        .bind(&req.classification)
        .bind(&req.destination)
        .bind(now)
        .bind(dcim_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Panel", dcim_id).into());
        }

        Self::get(pool, dcim_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Panel", dcim_id).into())
    }

    /// Distinct rooms, leaving out test rooms
    pub async fn list_rooms(pool: &Pool<Sqlite>) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT room FROM panels
            WHERE room IS NOT NULL AND room != ''
              AND LOWER(room) NOT LIKE '%test%'
            ORDER BY room
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(room,)| room).collect())
    }

    pub async fn list_racks(pool: &Pool<Sqlite>, room: Option<&str>) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = match room {
            Some(room) => {
                sqlx::query_as("SELECT DISTINCT rack FROM panels WHERE rack != '' AND room = ? ORDER BY rack")
                    .bind(room)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT DISTINCT rack FROM panels WHERE rack != '' ORDER BY rack")
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(|(rack,)| rack).collect())
    }

    /// Enabled rows whose interface starts with the requested type,
    /// narrowed by classification
    pub async fn list_routable(
        pool: &Pool<Sqlite>,
        interface: InterfaceType,
        classification: ClassificationFilter,
    ) -> Result<Vec<PanelRecord>> {
        let statuses = ENABLED_STATUS_VALUES
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");
        let base = format!(
            "{} WHERE status IN ({}) AND interface LIKE ?",
            SELECT_PANEL, statuses
        );
        let prefix = format!("{}%", interface.as_str());

        let rows = match classification {
            ClassificationFilter::Any => {
                sqlx::query(&format!("{} ORDER BY id", base))
                    .bind(&prefix)
                    .fetch_all(pool)
                    .await?
            }
            ClassificationFilter::Only(c) => {
                sqlx::query(&format!("{} AND LOWER(classification) = ? ORDER BY id", base))
                    .bind(&prefix)
                    .bind(c.catalog_value())
                    .fetch_all(pool)
                    .await?
            }
            ClassificationFilter::RedOrBlack => {
                sqlx::query(&format!(
                    "{} AND LOWER(classification) IN ('red', 'black', ?) ORDER BY id",
                    base
                ))
                .bind(&prefix)
                .bind(RED_BLACK)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(rows.iter().map(map_panel_row).collect())
    }

    /// Insert a row, or overwrite the existing row with the same dcim_id
    pub async fn upsert(pool: &Pool<Sqlite>, req: &ImportPanelRequest) -> Result<Upserted> {
        let now = chrono::Utc::now();
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM panels WHERE dcim_id = ?")
            .bind(&req.dcim_id)
            .fetch_optional(pool)
            .await?;

        if existing.is_some() {
            sqlx::query(
                r#"
                UPDATE panels SET name = ?, room = ?, rack = ?, u = ?, interface = ?, size = ?,
                    destination = ?, status = ?, how_many_ports_remain = ?, classification = ?,
                    date_updated = ?
                WHERE dcim_id = ?
                "#,
            )
            .bind(&req.name)
            .bind(&req.room)
            .bind(&req.rack)
            .bind(&req.u)
            .bind(&req.interface)
            .bind(&req.size)
            .bind(&req.destination)
            .bind(&req.status)
            .bind(&req.how_many_ports_remain)
            .bind(&req.classification)
            .bind(now)
            .bind(&req.dcim_id)
            .execute(pool)
            .await?;
            return Ok(Upserted::Updated);
        }

        sqlx::query(
            r#"
            INSERT INTO panels (dcim_id, room, name, rack, u, interface, size, destination,
                status, how_many_ports_remain, classification, date_created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.dcim_id)
        .bind(&req.room)
        .bind(&req.name)
        .bind(&req.rack)
        .bind(&req.u)
        .bind(&req.interface)
        .bind(&req.size)
        .bind(&req.destination)
        .bind(&req.status)
        .bind(&req.how_many_ports_remain)
        .bind(&req.classification)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(Upserted::Created)
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM panels")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}
