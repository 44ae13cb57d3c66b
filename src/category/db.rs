//! Database operations for categories.
//!
//! Every query is scoped to the owning user. A category that belongs to
//! another user behaves exactly like a category that does not exist.

use rusqlite::{Connection, Row, TransactionBehavior};

use crate::{
    Error, UserID,
    category::{
        Category, CategoryId, CategoryName, CategoryType,
        guard::{check_deletable, map_unique_violation},
    },
};

/// Create a category and return it with its generated ID.
///
/// The `(owner, type, normalized name)` UNIQUE constraint is the final arbiter
/// for duplicates, callers should still run
/// [validate_unique](crate::category::guard::validate_unique) first to reject
/// duplicates early.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if the owner already has a category with the same type and name,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    owner: UserID,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (user_id, name, normalized_name, type)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, name, type",
        )?
        .query_row(
            (
                owner.as_i64(),
                name.as_ref(),
                name.normalized(),
                category_type,
            ),
            map_row,
        )
        .map_err(|error| map_unique_violation(error, &name, category_type))
}

/// Retrieve a single category owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a category owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM category WHERE id = :id AND user_id = :user_id;")?
        .query_row(
            &[(":id", &category_id), (":user_id", &owner.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the categories owned by `owner` ordered alphabetically by name.
///
/// If `category_type` is set, only categories of that type are returned.
pub fn get_categories(
    owner: UserID,
    category_type: Option<CategoryType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
             WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
             ORDER BY name ASC, id ASC;",
        )?
        .query_map((owner.as_i64(), category_type), map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename and/or retype a category and return the updated category.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a category owned by `owner`,
/// - [Error::DuplicateCategory] if the new values collide with another category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    owner: UserID,
    category_id: CategoryId,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "UPDATE category SET name = ?1, normalized_name = ?2, type = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, name, type",
        )?
        .query_row(
            (
                name.as_ref(),
                name.normalized(),
                category_type,
                category_id,
                owner.as_i64(),
            ),
            map_row,
        )
        .map_err(|error| map_unique_violation(error, &name, category_type))
}

/// Delete a category if no movements reference it.
///
/// The reference count and the delete run in one `IMMEDIATE` transaction so a
/// movement cannot be attached to the category in between.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a category owned by `owner`,
/// - [Error::CategoryInUse] with the number of referencing movements,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &mut Connection,
) -> Result<(), Error> {
    let transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    get_category(owner, category_id, &transaction)?;
    check_deletable(owner, category_id, &transaction)?;

    transaction.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, owner.as_i64()),
    )?;

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
///
/// `normalized_name` holds the lowercased, trimmed name and backs the
/// per-owner uniqueness constraint.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            normalized_name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(user_id, type, normalized_name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_name ON category(user_id, name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let owner = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let category_type = row.get(3)?;

    Ok(Category {
        id,
        owner,
        name,
        category_type,
    })
}
