mod panels;
pub(crate) mod row_helpers;
pub mod seeds;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::*;
use crate::routing::InterfaceType;

use panels::{PanelRepo, Upserted};

/// A lookup by id matched no row. Handlers downcast to this for 404s.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Store owns the panel catalog, delegating queries to the repo module.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load the sample catalog into an empty table.
    /// Returns the number of rows inserted.
    pub async fn seed_sample_catalog(&self) -> Result<usize> {
        if PanelRepo::count(&self.pool).await? > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for (dcim_id, room, name, rack, u, interface, size, destination, status, ports, class) in
            seeds::sample_panel_params()
        {
            let row = ImportPanelRequest {
                dcim_id: dcim_id.to_string(),
                name: name.to_string(),
                room: room.to_string(),
                rack: rack.to_string(),
                u: u.to_string(),
                interface: interface.to_string(),
                size: Some(size.to_string()),
                status: status.to_string(),
                how_many_ports_remain: ports.to_string(),
                classification: Some(class.to_string()),
                destination: destination.to_string(),
            };
            PanelRepo::upsert(&self.pool, &row)
                .await
                .with_context(|| format!("Failed to seed panel {}", dcim_id))?;
            inserted += 1;
        }

        tracing::info!("Seeded {} sample panels", inserted);
        Ok(inserted)
    }

    // ========== Panel Operations ==========

    pub async fn list_panels(&self, filter: &PanelFilterQuery) -> Result<Vec<PanelRecord>> {
        PanelRepo::list(&self.pool, filter).await
    }

    pub async fn get_panel(&self, dcim_id: &str) -> Result<Option<PanelRecord>> {
        PanelRepo::get(&self.pool, dcim_id).await
    }

    pub async fn update_panel(&self, dcim_id: &str, req: &UpdatePanelRequest) -> Result<PanelRecord> {
        PanelRepo::update(&self.pool, dcim_id, req).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<String>> {
        PanelRepo::list_rooms(&self.pool).await
    }

    pub async fn list_racks(&self, room: Option<&str>) -> Result<Vec<String>> {
        PanelRepo::list_racks(&self.pool, room).await
    }

    pub async fn list_routable_panels(
        &self,
        interface: InterfaceType,
        classification: ClassificationFilter,
    ) -> Result<Vec<PanelRecord>> {
        PanelRepo::list_routable(&self.pool, interface, classification).await
    }

    pub async fn count_panels(&self) -> Result<i64> {
        PanelRepo::count(&self.pool).await
    }

    /// Write every row keyed by dcim_id. Rows without an id, or that fail
    /// to write, are reported in `errors` and do not stop the import.
    pub async fn upsert_panels(&self, rows: &[ImportPanelRequest]) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        for row in rows {
            if row.dcim_id.trim().is_empty() {
                result.errors.push("row without dcim_id".to_string());
                continue;
            }
            match PanelRepo::upsert(&self.pool, row).await {
                Ok(Upserted::Created) => result.created += 1,
                Ok(Upserted::Updated) => result.updated += 1,
                Err(e) => {
                    tracing::warn!("Failed to import panel {}: {}", row.dcim_id, e);
                    result.errors.push(format!("{}: {}", row.dcim_id, e));
                }
            }
        }

        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{memory_store, seeded_store};
    use super::*;
    use crate::routing::Classification;
    use tokio_test::assert_ok;

    fn import_row(dcim_id: &str, rack: &str, ports: &str) -> ImportPanelRequest {
        ImportPanelRequest {
            dcim_id: dcim_id.to_string(),
            name: format!("Panel {}", dcim_id),
            room: "ROOM9".to_string(),
            rack: rack.to_string(),
            u: "10".to_string(),
            interface: "RJ".to_string(),
            size: None,
            status: "True".to_string(),
            how_many_ports_remain: ports.to_string(),
            classification: Some("red".to_string()),
            destination: "B01-C01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_loads_sample_catalog_once() {
        let store = seeded_store().await;
        assert_eq!(store.count_panels().await.unwrap(), 10);
        assert_eq!(assert_ok!(store.seed_sample_catalog().await), 0);
        assert_eq!(store.count_panels().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_routable_honours_interface_prefix_and_status() {
        let store = seeded_store().await;

        let mm = store
            .list_routable_panels(InterfaceType::Mm, ClassificationFilter::Any)
            .await
            .unwrap();
        let ids: Vec<&str> = mm.iter().map(|p| p.dcim_id.as_str()).collect();
        // DCIM006 is MM-LC but disabled
        assert_eq!(ids, vec!["DCIM003", "DCIM010"]);

        let sm = store
            .list_routable_panels(InterfaceType::Sm, ClassificationFilter::Any)
            .await
            .unwrap();
        assert_eq!(sm.len(), 1);
        assert_eq!(sm[0].dcim_id, "DCIM008");
    }

    #[tokio::test]
    async fn test_routable_classification_filter() {
        let store = seeded_store().await;

        let red = store
            .list_routable_panels(InterfaceType::Rj, ClassificationFilter::Only(Classification::Red))
            .await
            .unwrap();
        assert_eq!(red.len(), 4);
        assert!(red.iter().all(|p| p.classification.as_deref() == Some("red")));

        let black = store
            .list_routable_panels(InterfaceType::Rj, ClassificationFilter::Only(Classification::Black))
            .await
            .unwrap();
        assert_eq!(black.len(), 1);

        let both = store
            .list_routable_panels(InterfaceType::Rj, ClassificationFilter::RedOrBlack)
            .await
            .unwrap();
        assert_eq!(both.len(), 5);
    }

    #[tokio::test]
    async fn test_list_panels_filters() {
        let store = seeded_store().await;

        let all = store.list_panels(&PanelFilterQuery::default()).await.unwrap();
        assert_eq!(all.len(), 10);
        assert!(all.windows(2).all(|w| w[0].rack <= w[1].rack));

        let room2 = PanelFilterQuery {
            room: Some("ROOM2".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list_panels(&room2).await.unwrap().len(), 5);

        let room_and_rack = PanelFilterQuery {
            room: Some("ROOM2".to_string()),
            rack: Some("A05-C09".to_string()),
            q: None,
        };
        assert_eq!(store.list_panels(&room_and_rack).await.unwrap().len(), 2);

        let by_name = PanelFilterQuery {
            q: Some("Panel-1".to_string()),
            ..Default::default()
        };
        let found = store.list_panels(&by_name).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].dcim_id, "DCIM010");
    }

    #[tokio::test]
    async fn test_rooms_exclude_test_rooms() {
        let store = seeded_store().await;
        let mut row = import_row("DCIM900", "Z01-C01", "4");
        row.room = "Lab-Test".to_string();
        assert_ok!(store.upsert_panels(&[row]).await);

        let rooms = store.list_rooms().await.unwrap();
        assert_eq!(rooms, vec!["ROOM1", "ROOM2", "ROOM3", "ROOM4"]);

        let racks = store.list_racks(Some("ROOM3")).await.unwrap();
        assert_eq!(racks, vec!["A07-C07"]);
    }

    #[tokio::test]
    async fn test_upsert_reports_created_and_updated() {
        let store = memory_store().await;

        let first = store
            .upsert_panels(&[import_row("D1", "A01-C01", "4"), import_row("D2", "A01-C02", "8")])
            .await
            .unwrap();
        assert_eq!((first.created, first.updated), (2, 0));

        let second = store
            .upsert_panels(&[import_row("D1", "A01-C01", "6"), import_row("", "A01-C03", "1")])
            .await
            .unwrap();
        assert_eq!((second.created, second.updated), (0, 1));
        assert_eq!(second.errors.len(), 1);

        let d1 = store.get_panel("D1").await.unwrap().unwrap();
        assert_eq!(d1.how_many_ports_remain, "6");
        assert!(d1.date_updated.is_some());
    }

    #[tokio::test]
    async fn test_update_panel_keeps_absent_fields() {
        let store = seeded_store().await;
        let req = UpdatePanelRequest {
            how_many_ports_remain: Some("A01-C03: 0".to_string()),
            ..Default::default()
        };
        let updated = store.update_panel("DCIM001", &req).await.unwrap();
        assert_eq!(updated.how_many_ports_remain, "A01-C03: 0");
        assert_eq!(updated.interface, "RJ");
        assert_eq!(updated.classification.as_deref(), Some("red"));

        let err = store.update_panel("NOPE", &req).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
        assert!(store.get_panel("NOPE").await.unwrap().is_none());
    }
}
