//! Movement creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    extract::JsonBody,
    movement::{Movement, create_movement, form::MovementFormData},
};

/// The state needed for creating a movement.
#[derive(Debug, Clone)]
pub struct CreateMovementState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateMovementState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record a movement for the requesting user.
///
/// The owner always comes from the credentials, never from the body.
pub async fn create_movement_endpoint(
    State(state): State<CreateMovementState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<MovementFormData>,
) -> Result<(StatusCode, Json<Movement>), Error> {
    let builder = form.into_builder()?;

    let connection = lock_connection(&state.db_connection)?;
    let movement = create_movement(user_id, builder, &connection)?;

    tracing::info!("user {user_id} created movement {}", movement.id);

    Ok((StatusCode::CREATED, Json(movement)))
}
