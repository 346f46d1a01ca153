//! Wallets hold money and cache their running balance.

mod core;
mod create;
mod delete;
mod edit;
mod wallet_page;
mod wallets_page;

pub use core::{
    Wallet, WalletName, create_wallet, create_wallet_table, deactivate_wallet,
    get_active_wallets, get_owned_wallet, get_wallet, rename_wallet,
};
pub use create::{create_wallet_endpoint, get_new_wallet_page};
pub use delete::delete_wallet_endpoint;
pub use edit::{get_edit_wallet_page, rename_wallet_endpoint};
pub use wallet_page::get_wallet_page;
pub use wallets_page::get_wallets_page;
