//! Partial updates for categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    category::{
        Category, CategoryId,
        domain::{CategoryPatch, name_value, type_value},
        get_category,
        guard::validate_unique,
        update_category,
    },
    db::lock_connection,
    extract::{JsonBody, PathParam},
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to a category owned by the requesting user.
///
/// Fields missing from the body keep their current value. The merged name and
/// type must not collide with another of the user's categories.
pub async fn update_category_endpoint(
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    PathParam(category_id): PathParam<CategoryId>,
    JsonBody(patch): JsonBody<CategoryPatch>,
) -> Result<Json<Category>, Error> {
    let name = patch.name.map(name_value).transpose()?;
    let category_type = patch.category_type.map(type_value).transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let existing = get_category(user_id, category_id, &connection)?;

    let name = name.unwrap_or(existing.name);
    let category_type = category_type.unwrap_or(existing.category_type);

    validate_unique(user_id, &name, category_type, Some(category_id), &connection)?;

    update_category(user_id, category_id, name, category_type, &connection).map(Json)
}
