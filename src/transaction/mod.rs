//! Income and expense transactions, and the ledger that keeps wallet balances
//! consistent with them.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod ledger;
mod transactions_page;

pub use core::{
    Transaction, TransactionListItem, TransactionType, create_transaction_table,
    get_transactions_by_wallet,
};
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{edit_transaction_endpoint, get_edit_transaction_page};
pub use ledger::{NewTransaction, create_transaction};
pub use transactions_page::{get_transactions_page, transaction_table_view};
