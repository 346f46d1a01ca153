//! Savings objectives: a target amount, optionally tracked by a wallet's balance.

mod core;
mod create;
mod delete;
mod edit;
mod objectives_page;

pub use core::{ObjectiveDetails, create_objective, create_objective_table};
pub use create::{create_objective_endpoint, get_new_objective_page};
pub use delete::delete_objective_endpoint;
pub use edit::{edit_objective_endpoint, get_edit_objective_page};
pub use objectives_page::get_objectives_page;
