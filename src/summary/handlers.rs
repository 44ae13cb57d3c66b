//! Summary and monthly series endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    extract::QueryParams,
    movement::{MovementFilter, MovementQuery, get_ledger_entries},
    summary::aggregation::{MonthlySeries, Summary, monthly_series, summarize},
};

/// The state needed for the aggregate endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Income, expense and balance totals plus a per-category breakdown of the
/// user's movements matching the filters.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    QueryParams(query): QueryParams<MovementQuery>,
) -> Result<Json<Summary>, Error> {
    let filter = MovementFilter::try_from(query)?;

    let entries = {
        let connection = lock_connection(&state.db_connection)?;
        get_ledger_entries(user_id, &filter, &connection)?
    };

    Ok(Json(summarize(&entries)))
}

/// Income and expense per month of the user's movements matching the filters.
pub async fn get_monthly_series_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    QueryParams(query): QueryParams<MovementQuery>,
) -> Result<Json<MonthlySeries>, Error> {
    let filter = MovementFilter::try_from(query)?;

    let entries = {
        let connection = lock_connection(&state.db_connection)?;
        get_ledger_entries(user_id, &filter, &connection)?
    };

    Ok(Json(monthly_series(&entries)))
}
