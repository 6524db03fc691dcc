use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::*;
use crate::routing::{build_map, DataCenterMap, Route};
use crate::AppState;

use super::ApiError;

/// Fetch the matching catalog slice, build the panel map and search it on
/// the blocking pool, then hand map and routes to `render`.
async fn plan_routes<T, F>(state: &AppState, req: FindRoutesRequest, render: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&DataCenterMap, Vec<Route>) -> T + Send + 'static,
{
    let start_rack = req.start_rack.trim().to_string();
    let end_rack = req.end_rack.trim().to_string();
    if start_rack.is_empty() || end_rack.is_empty() {
        return Err(ApiError::bad_request("startRack and endRack are required"));
    }
    let constraints = req.constraints().map_err(ApiError::bad_request)?;
    let Some(interface) = constraints.interface_type else {
        return Err(ApiError::bad_request("interfaceType is required"));
    };

    let records = state
        .store
        .list_routable_panels(interface, req.classification_filter())
        .await?;
    tracing::info!(
        "Route request {} -> {} ({}, max {} hops): {} catalog rows",
        start_rack,
        end_rack,
        interface,
        constraints.max_hops,
        records.len()
    );

    let limits = state.config.search_limits();
    tokio::task::spawn_blocking(move || {
        let map = build_map(&records, limits);
        let routes = map.find_all_routes(&start_rack, &end_rack, &constraints);
        tracing::info!("Found {} routes", routes.len());
        render(&map, routes)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Route search failed: {}", e)))
}

/// Find routes; each route is the ordered list of panels it passes through
pub async fn find_routes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FindRoutesRequest>,
) -> Result<Json<Vec<Vec<RouteStep>>>, ApiError> {
    let routes: Vec<Vec<RouteStep>> = plan_routes(&state, req, |map, routes| {
        routes.iter().map(|route| map.route_steps(route)).collect()
    })
    .await?;
    Ok(Json(routes))
}

/// Find routes with rank, cost and a printable breakdown of each
pub async fn route_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FindRoutesRequest>,
) -> Result<Json<Vec<RouteReport>>, ApiError> {
    let reports: Vec<RouteReport> = plan_routes(&state, req, |map, routes| {
        routes
            .iter()
            .enumerate()
            .map(|(i, route)| map.route_report(i + 1, route))
            .collect()
    })
    .await?;
    Ok(Json(reports))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, seeded_state};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn panel_ids(route: &Value) -> Vec<&str> {
        route
            .as_array()
            .unwrap()
            .iter()
            .map(|step| step["panelId"].as_str().unwrap())
            .collect()
    }

    fn request(extra: Value) -> Value {
        let mut body = json!({
            "interfaceType": "RJ",
            "minPorts": 1,
            "startRack": "A01-C02",
            "endRack": "A07-C07",
            "maxHops": 3
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        body
    }

    #[tokio::test]
    async fn test_find_routes_sample_catalog() {
        let state = seeded_state().await;
        let (status, body) = call(state, "POST", "/api/routes", Some(request(json!({})))).await;
        assert_eq!(status, StatusCode::OK);

        let routes = body.as_array().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(
            panel_ids(&routes[0]),
            vec!["DCIM001_A01-C03", "DCIM009_A01-C02", "DCIM007_A07-C07"]
        );
        assert_eq!(routes[0][0]["location"], "A01-C02-42");
        assert_eq!(routes[0][0]["interfaceType"], "RJ");
        assert_eq!(
            panel_ids(&routes[1]),
            vec!["DCIM001_A01-C03", "DCIM009_A01-C02", "DCIM005_A07-C09"]
        );
    }

    #[tokio::test]
    async fn test_find_routes_respects_hops_and_classification() {
        let state = seeded_state().await;

        let (status, body) = call(state.clone(), "POST", "/api/routes", Some(request(json!({"maxHops": 1})))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (_, body) = call(
            state.clone(),
            "POST",
            "/api/routes",
            Some(request(json!({"classification": "black"}))),
        )
        .await;
        assert_eq!(body, json!([]));

        let (_, body) = call(
            state,
            "POST",
            "/api/routes",
            Some(request(json!({"classification": "red+black", "maxHops": "15"}))),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_routes_rejects_bad_requests() {
        let state = seeded_state().await;

        let (status, body) = call(
            state.clone(),
            "POST",
            "/api/routes",
            Some(request(json!({"interfaceType": "CAT6"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("CAT6"));

        let (status, _) = call(state, "POST", "/api/routes", Some(json!({"interfaceType": "RJ"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_route_report() {
        let state = seeded_state().await;
        let (status, body) = call(state, "POST", "/api/routes/report", Some(request(json!({})))).await;
        assert_eq!(status, StatusCode::OK);

        let best = &body[0];
        assert_eq!(best["rank"], 1);
        assert_eq!(best["weight"], 2);
        assert_eq!(best["hops"], 2);
        assert_eq!(best["crossSpine"], true);
        assert_eq!(best["steps"].as_array().unwrap().len(), 3);
        let details = best["details"].as_str().unwrap();
        assert!(details.starts_with("Route Details:"));
        assert!(details.contains("Cross-Spine Connection: A01 → A07"));
        assert_eq!(body[1]["rank"], 2);
        assert_eq!(body[1]["weight"], 4);
    }
}
