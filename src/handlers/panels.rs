use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

use super::ApiError;

/// List catalog rows, with the racks they span unless narrowed to one rack
pub async fn list_panels(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PanelFilterQuery>,
) -> Result<Json<PanelListResponse>, ApiError> {
    let panels = state.store.list_panels(&filter).await?;
    let racks = if filter.rack().is_some() {
        Vec::new()
    } else {
        panels
            .iter()
            .map(|p| p.rack.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };
    Ok(Json(PanelListResponse { racks, panels }))
}

pub async fn get_panel(
    State(state): State<Arc<AppState>>,
    Path(dcim_id): Path<String>,
) -> Result<Json<PanelRecord>, ApiError> {
    let panel = state
        .store
        .get_panel(&dcim_id)
        .await?
        .ok_or_else(|| ApiError::not_found("panel"))?;
    Ok(Json(panel))
}

pub async fn update_panel(
    State(state): State<Arc<AppState>>,
    Path(dcim_id): Path<String>,
    Json(req): Json<UpdatePanelRequest>,
) -> Result<Json<PanelRecord>, ApiError> {
    let panel = state.store.update_panel(&dcim_id, &req).await?;
    tracing::info!("Panel {} updated", dcim_id);
    Ok(Json(panel))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_rooms().await?))
}

pub async fn list_racks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RackQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let room = query.room.as_deref().map(str::trim).filter(|r| !r.is_empty());
    Ok(Json(state.store.list_racks(room).await?))
}

/// Bulk upsert catalog rows from the inventory system
pub async fn import_panels(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkImportRequest>,
) -> Result<Json<ImportResult>, ApiError> {
    let result = state.catalog_sync.import(&req.panels).await?;
    Ok(Json(result))
}

/// Whether a bulk import is in progress; route results may be stale meanwhile
pub async fn sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatus> {
    Json(state.catalog_sync.status())
}
