//! Spending goals: a ceiling on expenses, optionally per category and until a deadline.

mod core;
mod create;
mod delete;
mod edit;
mod goals_page;

pub use core::{NewGoal, create_goal, create_goal_table};
pub use create::{create_goal_endpoint, get_new_goal_page};
pub use delete::delete_goal_endpoint;
pub use edit::{edit_goal_endpoint, get_edit_goal_page};
pub use goals_page::get_goals_page;
