//! Movements: dated amounts of money earned or spent, optionally filed under
//! a category.

mod amount;
mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;
mod query;

pub use amount::Amount;
pub use self::core::{
    Movement, MovementBuilder, MovementId, count_movements_in_category, create_movement,
    create_movement_table, delete_movement, get_movement, update_movement,
};
pub use create::create_movement_endpoint;
pub use delete::delete_movement_endpoint;
pub use edit::update_movement_endpoint;
pub use list::{get_movement_endpoint, list_movements_endpoint};
pub use query::{MovementFilter, MovementQuery, get_ledger_entries};
