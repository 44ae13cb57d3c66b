//! Income and expense categories that movements are filed under.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod guard;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, CategoryType};
pub use edit::update_category_endpoint;
pub use list::{get_category_endpoint, list_categories_endpoint};
