//! The page for a single wallet and its transactions.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbState,
    database_id::WalletId,
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    transaction::{TransactionListItem, get_transactions_by_wallet, transaction_table_view},
    wallet::{Wallet, get_owned_wallet},
};

/// Renders a wallet's balances and its transactions, newest first.
///
/// Responds with a 404 page if the wallet does not exist or has been deleted,
/// and a 403 page if it belongs to another user.
pub async fn get_wallet_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let wallet = get_owned_wallet(wallet_id, user_id, &connection)?;
    let transactions = get_transactions_by_wallet(wallet_id, user_id, &connection)
        .inspect_err(|error| {
            tracing::error!("could not get transactions for wallet {wallet_id}: {error}")
        })?;

    Ok(wallet_view(&wallet, &transactions).into_response())
}

fn wallet_view(wallet: &Wallet, transactions: &[TransactionListItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::WALLETS_VIEW).into_html();
    let new_transaction_url = format_endpoint(endpoints::NEW_TRANSACTION_VIEW, wallet.id);
    let edit_url = format_endpoint(endpoints::EDIT_WALLET_VIEW, wallet.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { (wallet.name) }

                    div class="flex gap-4"
                    {
                        a href=(new_transaction_url) class=(LINK_STYLE) { "Add transaction" }
                        a href=(edit_url) class=(LINK_STYLE) { "Rename" }
                    }
                }

                dl class="grid grid-cols-2 gap-4"
                {
                    div
                        class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm
                            dark:border-gray-700 dark:bg-gray-800"
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { "Current balance" }
                        dd id="current-balance" class="text-2xl font-semibold tabular-nums"
                        {
                            (format_currency(wallet.current_balance))
                        }
                    }

                    div
                        class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm
                            dark:border-gray-700 dark:bg-gray-800"
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { "Initial balance" }
                        dd id="initial-balance" class="text-2xl font-semibold tabular-nums"
                        {
                            (format_currency(wallet.initial_balance))
                        }
                    }
                }

                h2 class="text-lg font-semibold" { "Transactions" }

                (transaction_table_view(transactions, false))
            }
        }
    );

    base(wallet.name.as_ref(), &[], &content)
}
