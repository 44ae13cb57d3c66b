//! Partial updates for movements.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    extract::{JsonBody, PathParam},
    movement::{Movement, MovementId, form::MovementPatch, get_movement, update_movement},
};

/// The state needed for updating a movement.
#[derive(Debug, Clone)]
pub struct EditMovementState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditMovementState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to one of the requesting user's movements.
pub async fn update_movement_endpoint(
    State(state): State<EditMovementState>,
    Extension(user_id): Extension<UserID>,
    PathParam(movement_id): PathParam<MovementId>,
    JsonBody(patch): JsonBody<MovementPatch>,
) -> Result<Json<Movement>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let existing = get_movement(user_id, movement_id, &connection)?;
    let builder = patch.apply_to(existing)?;

    update_movement(user_id, movement_id, builder, &connection).map(Json)
}

#[cfg(test)]
mod update_movement_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::State,
    };
    use serde_json::json;

    use crate::{
        Error,
        category::{CategoryName, CategoryType, create_category},
        extract::{JsonBody, PathParam},
        movement::{edit::EditMovementState, form::MovementPatch, update_movement_endpoint},
        test_utils::{create_test_movement, get_test_connection_with_users},
    };

    #[tokio::test]
    async fn updates_only_supplied_fields() {
        let (connection, alice, _) = get_test_connection_with_users();
        let rent = create_category(
            alice,
            CategoryName::new_unchecked("Rent"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        let movement = create_test_movement(alice, Some(rent.id), "500.00", &connection);
        let state = EditMovementState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let Json(updated) = update_movement_endpoint(
            State(state),
            Extension(alice),
            PathParam(movement.id),
            JsonBody(MovementPatch {
                amount: Some(json!("550")),
                ..Default::default()
            }),
        )
        .await
        .expect("Could not update movement");

        assert_eq!(updated.amount.to_string(), "550.00");
        assert_eq!(updated.category, Some(rent.id));
        assert_eq!(updated.date, movement.date);
    }

    #[tokio::test]
    async fn clears_category() {
        let (connection, alice, _) = get_test_connection_with_users();
        let rent = create_category(
            alice,
            CategoryName::new_unchecked("Rent"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        let movement = create_test_movement(alice, Some(rent.id), "500.00", &connection);
        let state = EditMovementState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let Json(updated) = update_movement_endpoint(
            State(state),
            Extension(alice),
            PathParam(movement.id),
            JsonBody(MovementPatch {
                category: Some(None),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.category, None);
    }

    #[tokio::test]
    async fn other_users_movement_returns_not_found() {
        let (connection, alice, bob) = get_test_connection_with_users();
        let movement = create_test_movement(alice, None, "500.00", &connection);
        let state = EditMovementState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = update_movement_endpoint(
            State(state),
            Extension(bob),
            PathParam(movement.id),
            JsonBody(MovementPatch::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
