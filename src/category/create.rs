//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    category::{
        Category, create_category,
        domain::{CategoryFormData, name_value, type_value},
        guard::validate_unique,
    },
    db::lock_connection,
    extract::JsonBody,
    validation::required,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a category for the requesting user.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<CategoryFormData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = name_value(required("name", form.name)?)?;
    let category_type = type_value(required("type", form.category_type)?)?;

    let connection = lock_connection(&state.db_connection)?;
    validate_unique(user_id, &name, category_type, None, &connection)?;
    let category = create_category(user_id, name, category_type, &connection)?;

    tracing::info!(
        "user {user_id} created {} category {}",
        category.category_type,
        category.id
    );

    Ok((StatusCode::CREATED, Json(category)))
}
