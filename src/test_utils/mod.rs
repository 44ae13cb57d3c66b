#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::parse_json_body;

use rusqlite::Connection;
use time::Date;

use crate::{
    UserID,
    category::CategoryId,
    db::initialize,
    movement::{Movement, create_movement},
    user::create_user,
    validation::parse_date,
};

/// An initialized in-memory database with the users "alice" and "bob".
pub(crate) fn get_test_connection_with_users() -> (Connection, UserID, UserID) {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    let alice = create_user("alice", &connection).expect("Could not create alice");
    let bob = create_user("bob", &connection).expect("Could not create bob");

    (connection, alice.id, bob.id)
}

/// Create a movement dated 2025-05-17.
pub(crate) fn create_test_movement(
    owner: UserID,
    category: Option<CategoryId>,
    amount: &str,
    connection: &Connection,
) -> Movement {
    create_test_movement_on(owner, category, amount, "2025-05-17", connection)
}

/// Create a movement on `date`, given as `YYYY-MM-DD`.
pub(crate) fn create_test_movement_on(
    owner: UserID,
    category: Option<CategoryId>,
    amount: &str,
    date: &str,
    connection: &Connection,
) -> Movement {
    let date: Date = parse_date("date", date).expect("Invalid test date");
    let amount = amount.parse().expect("Invalid test amount");

    create_movement(
        owner,
        Movement::build(amount, date, "").category(category),
        connection,
    )
    .expect("Could not create test movement")
}
