//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::auth_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    movement::{
        create_movement_endpoint, delete_movement_endpoint, get_movement_endpoint,
        list_movements_endpoint, update_movement_endpoint,
    },
    summary::{get_monthly_series_endpoint, get_summary_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::HEALTH, get(get_health));

    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .patch(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::MOVEMENTS,
            get(list_movements_endpoint).post(create_movement_endpoint),
        )
        .route(endpoints::MOVEMENTS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::MOVEMENTS_MONTHLY, get(get_monthly_series_endpoint))
        .route(
            endpoints::MOVEMENT,
            get(get_movement_endpoint)
                .patch(update_movement_endpoint)
                .delete(delete_movement_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Liveness probe.
async fn get_health() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, Error::NotFound).into_response()
}
