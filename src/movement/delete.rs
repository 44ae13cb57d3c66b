//! Movement deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    extract::PathParam,
    movement::{MovementId, delete_movement},
};

/// The state needed for deleting a movement.
#[derive(Debug, Clone)]
pub struct DeleteMovementState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteMovementState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the requesting user's movements.
pub async fn delete_movement_endpoint(
    State(state): State<DeleteMovementState>,
    Extension(user_id): Extension<UserID>,
    PathParam(movement_id): PathParam<MovementId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_movement(user_id, movement_id, &connection)?;
    tracing::info!("user {user_id} deleted movement {movement_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_movement_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::StatusCode,
    };

    use crate::{
        Error,
        extract::PathParam,
        movement::{delete::DeleteMovementState, delete_movement_endpoint, get_movement},
        test_utils::{create_test_movement, get_test_connection_with_users},
    };

    #[tokio::test]
    async fn deletes_movement() {
        let (connection, alice, _) = get_test_connection_with_users();
        let movement = create_test_movement(alice, None, "12.00", &connection);
        let state = DeleteMovementState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status =
            delete_movement_endpoint(State(state.clone()), Extension(alice), PathParam(movement.id))
                .await;

        assert_eq!(status, Ok(StatusCode::NO_CONTENT));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_movement(alice, movement.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn other_users_movement_is_kept() {
        let (connection, alice, bob) = get_test_connection_with_users();
        let movement = create_test_movement(alice, None, "12.00", &connection);
        let state = DeleteMovementState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status =
            delete_movement_endpoint(State(state.clone()), Extension(bob), PathParam(movement.id)).await;

        assert_eq!(status, Err(Error::NotFound));
        let connection = state.db_connection.lock().unwrap();
        assert!(get_movement(alice, movement.id, &connection).is_ok());
    }
}
