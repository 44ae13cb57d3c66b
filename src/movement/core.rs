//! Defines the movement model and its database queries.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    Error, UserID,
    category::{CategoryId, get_category},
    movement::Amount,
};

/// Database identifier for a movement.
pub type MovementId = i64;

/// A dated amount of money earned or spent by one user.
///
/// A movement has no sign, whether it is income or an expense depends on the
/// type of its category. To create a new `Movement`, use [Movement::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movement {
    /// The ID of the movement.
    pub id: MovementId,
    /// The user that recorded the movement.
    pub owner: UserID,
    /// The category the movement is filed under, if any.
    pub category: Option<CategoryId>,
    /// What the movement was for, may be empty.
    pub description: String,
    /// When the money moved.
    pub date: Date,
    /// How much money moved.
    pub amount: Amount,
}

impl Movement {
    /// Create a new movement.
    ///
    /// Shortcut for [MovementBuilder] for discoverability.
    pub fn build(amount: Amount, date: Date, description: &str) -> MovementBuilder {
        MovementBuilder {
            amount,
            date,
            description: description.to_owned(),
            category: None,
        }
    }
}

/// The validated fields of a movement that is about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementBuilder {
    /// How much money moved.
    pub amount: Amount,
    /// When the money moved.
    pub date: Date,
    /// What the movement was for.
    pub description: String,
    /// The category to file the movement under.
    pub category: Option<CategoryId>,
}

impl MovementBuilder {
    /// Set the category of the movement.
    pub fn category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }
}

/// Check that `category` is absent or refers to a category owned by `owner`.
///
/// Missing and foreign categories produce the same message.
fn ensure_category_owned(
    owner: UserID,
    category: Option<CategoryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(category_id) = category else {
        return Ok(());
    };

    match get_category(owner, category_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::validation(
            "category",
            format!("Invalid pk \"{category_id}\" - object does not exist."),
        )),
        Err(error) => Err(error),
    }
}

/// Create a movement for `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] on `category` if the category is not one of `owner`'s categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_movement(
    owner: UserID,
    builder: MovementBuilder,
    connection: &Connection,
) -> Result<Movement, Error> {
    ensure_category_owned(owner, builder.category, connection)?;

    connection
        .prepare(
            "INSERT INTO movement (user_id, category_id, description, date, amount_cents)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, category_id, description, date, amount_cents",
        )?
        .query_row(
            (
                owner.as_i64(),
                builder.category,
                builder.description,
                builder.date,
                builder.amount,
            ),
            map_movement_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve one of `owner`'s movements.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `movement_id` does not refer to a movement owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_movement(
    owner: UserID,
    movement_id: MovementId,
    connection: &Connection,
) -> Result<Movement, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, description, date, amount_cents
             FROM movement WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &movement_id), (":user_id", &owner.as_i64())],
            map_movement_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the fields of one of `owner`'s movements.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `movement_id` does not refer to a movement owned by `owner`,
/// - [Error::Validation] on `category` if the category is not one of `owner`'s categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_movement(
    owner: UserID,
    movement_id: MovementId,
    builder: MovementBuilder,
    connection: &Connection,
) -> Result<Movement, Error> {
    ensure_category_owned(owner, builder.category, connection)?;

    connection
        .prepare(
            "UPDATE movement
             SET category_id = ?1, description = ?2, date = ?3, amount_cents = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING id, user_id, category_id, description, date, amount_cents",
        )?
        .query_row(
            (
                builder.category,
                builder.description,
                builder.date,
                builder.amount,
                movement_id,
                owner.as_i64(),
            ),
            map_movement_row,
        )
        .map_err(|error| error.into())
}

/// Delete one of `owner`'s movements.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `movement_id` does not refer to a movement owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_movement(
    owner: UserID,
    movement_id: MovementId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM movement WHERE id = ?1 AND user_id = ?2",
        (movement_id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Count `owner`'s movements filed under `category_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_movements_in_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM movement WHERE user_id = ?1 AND category_id = ?2",
            (owner.as_i64(), category_id),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the movement table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_movement_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS movement (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_movement_user_date ON movement(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_movement_category ON movement(category_id);",
    )?;

    Ok(())
}

/// Map a row of `id, user_id, category_id, description, date, amount_cents` to a movement.
pub(super) fn map_movement_row(row: &Row) -> Result<Movement, rusqlite::Error> {
    Ok(Movement {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        category: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        amount: row.get(5)?,
    })
}
