//! Monthly reports over the user's wallets and transactions.

mod core;
mod report_page;

pub use core::get_consolidated_wallet_balance;
pub use report_page::get_report_page;
