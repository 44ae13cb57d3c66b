//! A personal-finance ledger service.
//!
//! Authenticated users record categorized income and expense movements and
//! query aggregated summaries (totals, per-category breakdown and a monthly
//! series). Every read and write is scoped to the requesting user.
//!
//! This library provides a JSON REST API served with axum and backed by SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod db;
mod endpoints;
mod extract;
mod logging;
mod movement;
mod pagination;
mod routing;
mod summary;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{create_token, get_user_id_by_token};
pub use category::{Category, CategoryId, CategoryName, CategoryType, create_category};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use movement::{Amount, Movement, MovementBuilder, MovementId, create_movement};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use user::{User, UserID, create_user, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request field was missing, malformed or violated a constraint.
    ///
    /// `field` names the offending request field so that clients can point
    /// the user at it.
    #[error("{field}: {message}")]
    Validation {
        /// The name of the request field that failed validation.
        field: &'static str,
        /// A human readable description of the problem.
        message: String,
    },

    /// The user already has a category with the same type and the same name
    /// (ignoring case and surrounding whitespace).
    #[error("a {category_type} category named \"{name}\" already exists")]
    DuplicateCategory {
        /// The trimmed name that caused the conflict.
        name: String,
        /// The type of the conflicting category.
        category_type: CategoryType,
    },

    /// The category cannot be deleted because movements still reference it.
    ///
    /// Holds the exact number of referencing movements.
    #[error("the category is used by {0} movement(s), reassign or delete them first")]
    CategoryInUse(usize),

    /// The requested resource was not found.
    ///
    /// Resources owned by other users are also reported as not found so that
    /// clients cannot probe for the existence of other users' data.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request did not carry a valid bearer token.
    #[error("authentication credentials were not provided or are invalid")]
    Unauthenticated,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// Create a [Error::Validation] for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            Error::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "validation",
                    message,
                    field: Some(field),
                    count: None,
                },
            ),
            Error::DuplicateCategory { .. } => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "duplicate",
                    message,
                    field: Some("name"),
                    count: None,
                },
            ),
            Error::CategoryInUse(count) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "referenced",
                    message,
                    field: None,
                    count: Some(count),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found",
                    message,
                    field: None,
                    count: None,
                },
            ),
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "unauthenticated",
                    message,
                    field: None,
                    count: None,
                },
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal",
                        message: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                        field: None,
                        count: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
