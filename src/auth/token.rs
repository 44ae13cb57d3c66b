//! Opaque bearer tokens that identify a user.
//!
//! Only the SHA-256 digest of a token is stored, the token itself is shown
//! once when it is created.

use rand::RngCore;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::{Error, UserID};

/// Number of random bytes in a token before hex encoding.
const TOKEN_BYTES: usize = 32;

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    hex::encode(bytes)
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Create the auth token table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_token_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS auth_token (
                digest TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Issue a new token for `user_id` and return it.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the token could not be stored, e.g. the
/// user does not exist.
pub fn create_token(user_id: UserID, connection: &Connection) -> Result<String, Error> {
    let token = generate_token();

    connection.execute(
        "INSERT INTO auth_token (digest, user_id) VALUES (?1, ?2)",
        (digest(&token), user_id.as_i64()),
    )?;

    Ok(token)
}

/// Look up the user a token was issued to.
///
/// # Errors
///
/// Returns a [Error::Unauthenticated] if the token is unknown, or a
/// [Error::SqlError] if the query failed.
pub fn get_user_id_by_token(token: &str, connection: &Connection) -> Result<UserID, Error> {
    connection
        .prepare("SELECT user_id FROM auth_token WHERE digest = :digest")?
        .query_row(&[(":digest", &digest(token))], |row| {
            row.get(0).map(UserID::new)
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::Unauthenticated,
            error => error.into(),
        })
}
