//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    category::{CategoryId, delete_category},
    db::lock_connection,
    extract::PathParam,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a category that no movement references.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    Extension(user_id): Extension<UserID>,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<StatusCode, Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    match delete_category(user_id, category_id, &mut connection) {
        Ok(()) => {
            tracing::info!("user {user_id} deleted category {category_id}");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(Error::CategoryInUse(count)) => {
            tracing::debug!(
                "refused to delete category {category_id}, {count} movement(s) reference it"
            );
            Err(Error::CategoryInUse(count))
        }
        Err(error) => Err(error),
    }
}
