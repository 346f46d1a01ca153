//! Categories for grouping transactions, shared system categories and the
//! user's own.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use core::{
    Category, CategoryName, count_transactions_per_category,
    create_category, create_category_table, delete_category, get_category,
    get_system_categories, get_usable_category, get_user_categories, rename_category,
    seed_system_categories,
};
pub use create::{create_category_endpoint, get_new_category_page};
pub use delete::delete_category_endpoint;
pub use edit::{get_edit_category_page, rename_category_endpoint};
pub use list::get_categories_page;
