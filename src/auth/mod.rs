//! Bearer token authentication.
//!
//! Users and their tokens are provisioned outside this service. Every ledger
//! route is behind [auth_guard], which resolves the token to a [crate::UserID].

mod middleware;
mod token;

pub use middleware::{AuthState, auth_guard};
pub use token::{create_token, create_token_table, get_user_id_by_token};
