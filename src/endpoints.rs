//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// Liveness probe, does not require authentication.
pub const HEALTH: &str = "/api/health";
/// List and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// Retrieve, update and delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// List and create movements.
pub const MOVEMENTS: &str = "/api/movements";
/// Retrieve, update and delete a single movement.
pub const MOVEMENT: &str = "/api/movements/{movement_id}";
/// Aggregated totals over the filtered movements.
pub const MOVEMENTS_SUMMARY: &str = "/api/movements/summary";
/// Income and expense per calendar month over the filtered movements.
pub const MOVEMENTS_MONTHLY: &str = "/api/movements/monthly";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between the first '{' and the following '}',
/// braces included. For example, in the endpoint path '/users/{user_id}',
/// '{user_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
