//! Category listing and retrieval endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    category::{Category, CategoryId, CategoryType, get_categories, get_category},
    db::lock_connection,
    extract::{PathParam, QueryParams},
    pagination::{Listing, PageQuery, PageRequest, PaginationConfig},
};

/// The state needed for listing and fetching categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    /// Only list categories of this type. Unrecognised values are ignored.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// List the user's categories ordered by name.
pub async fn list_categories_endpoint(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserID>,
    QueryParams(query): QueryParams<CategoryListQuery>,
    QueryParams(page_query): QueryParams<PageQuery>,
) -> Result<Json<Listing<Category>>, Error> {
    let category_type = CategoryType::parse_filter(query.category_type.as_deref());
    let page = PageRequest::from_query(&page_query, &state.pagination_config)?;

    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories(user_id, category_type, &connection)?;

    let listing = match page {
        Some(page) => Listing::Page(page.slice(categories)),
        None => Listing::All(categories),
    };

    Ok(Json(listing))
}

/// Fetch a single category owned by the user.
pub async fn get_category_endpoint(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserID>,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_category(user_id, category_id, &connection).map(Json)
}
