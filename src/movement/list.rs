//! Movement listing and retrieval endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    extract::{PathParam, QueryParams},
    movement::{
        Movement, MovementId, get_movement,
        query::{MovementFilter, MovementQuery, count_movements, get_movements},
    },
    pagination::{Listing, Page, PageQuery, PageRequest, PaginationConfig},
};

/// The state needed for listing and fetching movements.
#[derive(Debug, Clone)]
pub struct MovementsState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for MovementsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// List the user's movements matching the filters, newest first.
pub async fn list_movements_endpoint(
    State(state): State<MovementsState>,
    Extension(user_id): Extension<UserID>,
    QueryParams(query): QueryParams<MovementQuery>,
    QueryParams(page_query): QueryParams<PageQuery>,
) -> Result<Json<Listing<Movement>>, Error> {
    let filter = MovementFilter::try_from(query)?;
    let page = PageRequest::from_query(&page_query, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;

    let listing = match page {
        Some(page) => {
            let count = count_movements(user_id, &filter, &connection)?;
            let results = get_movements(user_id, &filter, Some(page), &connection)?;

            Listing::Page(Page {
                count: count as u64,
                page: page.page,
                page_size: page.page_size,
                results,
            })
        }
        None => Listing::All(get_movements(user_id, &filter, None, &connection)?),
    };

    Ok(Json(listing))
}

/// Fetch a single movement owned by the user.
pub async fn get_movement_endpoint(
    State(state): State<MovementsState>,
    Extension(user_id): Extension<UserID>,
    PathParam(movement_id): PathParam<MovementId>,
) -> Result<Json<Movement>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_movement(user_id, movement_id, &connection).map(Json)
}
