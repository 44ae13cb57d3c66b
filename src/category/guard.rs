//! Invariants that must hold before a category is written or deleted.
//!
//! - A user cannot have two categories of the same type whose names only
//!   differ by case or surrounding whitespace.
//! - A category cannot be deleted while the owner's movements reference it.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    category::{CategoryId, CategoryName, CategoryType},
    movement::count_movements_in_category,
};

/// Check that `owner` has no other category of `category_type` named `name`.
///
/// `excluding` should be set to the category being updated so it does not
/// conflict with itself.
///
/// This is an early reject, the UNIQUE constraint on the category table is
/// what ultimately prevents concurrent duplicates.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if a conflicting category exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn validate_unique(
    owner: UserID,
    name: &CategoryName,
    category_type: CategoryType,
    excluding: Option<CategoryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let conflicts: usize = connection.query_row(
        "SELECT COUNT(id) FROM category
         WHERE user_id = ?1 AND type = ?2 AND normalized_name = ?3
         AND (?4 IS NULL OR id != ?4)",
        (owner.as_i64(), category_type, name.normalized(), excluding),
        |row| row.get(0),
    )?;

    if conflicts > 0 {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
            category_type,
        });
    }

    Ok(())
}

/// Check that none of `owner`'s movements reference `category_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryInUse] with the exact number of referencing movements,
/// - or [Error::SqlError] if there is some SQL error.
pub fn check_deletable(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    match count_movements_in_category(owner, category_id, connection)? {
        0 => Ok(()),
        count => Err(Error::CategoryInUse(count)),
    }
}

/// Translate a UNIQUE constraint failure on the category table into the same
/// error [validate_unique] reports.
pub(super) fn map_unique_violation(
    error: rusqlite::Error,
    name: &CategoryName,
    category_type: CategoryType,
) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategory {
            name: name.to_string(),
            category_type,
        },
        error => error.into(),
    }
}
