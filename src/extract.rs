//! Extractors that report rejected requests with the same JSON error body as
//! the handlers.
//!
//! Field-level problems are caught by the request structs themselves, these
//! only see bodies and query strings that cannot be read at all.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::Error;

/// The field name used for errors that do not belong to a single field.
pub(crate) const NON_FIELD_ERRORS: &str = "non_field_errors";

/// [axum::Json] with rejections turned into [Error::Validation].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// [axum::extract::Query] with rejections turned into [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// [axum::extract::Path] with rejections turned into [Error::NotFound].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");

        Error::validation(NON_FIELD_ERRORS, rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");

        Error::validation(NON_FIELD_ERRORS, rejection.body_text())
    }
}

/// A path segment that does not parse as an ID cannot name a resource.
impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path: {rejection}");

        Error::NotFound
    }
}
