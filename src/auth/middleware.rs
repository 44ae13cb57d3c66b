//! Authentication middleware that resolves bearer tokens to users.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;

use crate::{AppState, Error, auth::get_user_id_by_token, db::lock_connection};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid `Authorization: Bearer` header.
/// The user ID is placed into the request and then the request executed normally if the token is
/// valid, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(rejection) => {
                tracing::warn!("rejected request to {}: {rejection}", parts.uri.path());
                return Error::Unauthenticated.into_response();
            }
        };

    let user_id = {
        let connection = match lock_connection(&state.db_connection) {
            Ok(connection) => connection,
            Err(error) => return error.into_response(),
        };

        match get_user_id_by_token(bearer.token(), &connection) {
            Ok(user_id) => user_id,
            Err(Error::Unauthenticated) => {
                tracing::warn!("rejected unknown token for {}", parts.uri.path());
                return Error::Unauthenticated.into_response();
            }
            Err(error) => return error.into_response(),
        }
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

#[cfg(test)]
mod auth_guard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION},
        middleware,
        routing::get,
    };
    use axum_test::TestServer;

    use crate::{
        UserID,
        auth::{AuthState, auth_guard, create_token},
        test_utils::get_test_connection_with_users,
    };

    const TEST_PROTECTED_ROUTE: &str = "/api/protected";

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> (TestServer, UserID, String) {
        let (connection, alice, _) = get_test_connection_with_users();
        let token = create_token(alice, &connection).expect("Could not create token");
        let state = AuthState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        let server = TestServer::try_new(app).expect("Could not create test server.");

        (server, alice, token)
    }

    fn header(value: &str) -> (HeaderName, HeaderValue) {
        (AUTHORIZATION, HeaderValue::from_str(value).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_user_id() {
        let (server, alice, token) = get_test_server();
        let (name, value) = header(&format!("Bearer {token}"));

        let response = server.get(TEST_PROTECTED_ROUTE).add_header(name, value).await;

        response.assert_status_ok();
        response.assert_text(alice.to_string());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (server, _, _) = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>()["error"], "unauthenticated");
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let (server, _, _) = get_test_server();
        let (name, value) = header("Bearer 0123456789abcdef");

        let response = server.get(TEST_PROTECTED_ROUTE).add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_schemes_are_unauthorized() {
        let (server, _, token) = get_test_server();
        let (name, value) = header(&format!("Token {token}"));

        let response = server.get(TEST_PROTECTED_ROUTE).add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
