//! The landing page listing the user's active wallets.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbState,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    report::get_consolidated_wallet_balance,
    wallet::{Wallet, get_active_wallets},
};

struct WalletTableRow {
    name: String,
    current_balance: f64,
    initial_balance: f64,
    view_url: String,
    new_transaction_url: String,
    edit_url: String,
    delete_url: String,
}

impl From<Wallet> for WalletTableRow {
    fn from(wallet: Wallet) -> Self {
        Self {
            name: wallet.name.to_string(),
            current_balance: wallet.current_balance,
            initial_balance: wallet.initial_balance,
            view_url: format_endpoint(endpoints::WALLET_VIEW, wallet.id),
            new_transaction_url: format_endpoint(endpoints::NEW_TRANSACTION_VIEW, wallet.id),
            edit_url: format_endpoint(endpoints::EDIT_WALLET_VIEW, wallet.id),
            delete_url: format_endpoint(endpoints::DELETE_WALLET, wallet.id),
        }
    }
}

fn delete_confirm_message(name: &str) -> String {
    format!(
        "Are you sure you want to delete the wallet '{name}'? \
        Its transactions will be kept for your reports."
    )
}

/// Renders the wallets page with the consolidated balance of all active wallets.
pub async fn get_wallets_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let wallets = get_active_wallets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get wallets: {error}"))?;
    let total_balance = get_consolidated_wallet_balance(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get consolidated balance: {error}"))?;

    let rows = wallets
        .into_iter()
        .map(WalletTableRow::from)
        .collect::<Vec<_>>();

    Ok(wallets_view(&rows, total_balance).into_response())
}

fn wallets_view(wallets: &[WalletTableRow], total_balance: f64) -> Markup {
    let new_wallet_url = endpoints::NEW_WALLET_VIEW;
    let nav_bar = NavBar::new(endpoints::WALLETS_VIEW).into_html();

    let table_row = |wallet: &WalletTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(wallet.view_url) class=(LINK_STYLE) { (wallet.name) }
                }

                td class="px-6 py-4 text-right tabular-nums" data-balance="true"
                {
                    (format_currency(wallet.current_balance))
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(wallet.initial_balance))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(wallet.new_transaction_url) class=(LINK_STYLE) { "Add transaction" }

                        (edit_delete_action_links(
                            &wallet.edit_url,
                            &wallet.delete_url,
                            &delete_confirm_message(&wallet.name),
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Wallets" }

                    a href=(new_wallet_url) class=(LINK_STYLE)
                    {
                        "Create Wallet"
                    }
                }

                div
                    class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm
                        dark:border-gray-700 dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total balance" }
                    p id="total-balance" class="text-2xl font-semibold tabular-nums"
                    {
                        (format_currency(total_balance))
                    }
                }

                (wallet_cards_view(wallets, new_wallet_url))

                section class="hidden lg:block w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class="px-6 py-3 text-right" { "Initial balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for wallet in wallets {
                                (table_row(wallet))
                            }

                            @if wallets.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No wallets yet. "
                                        a href=(new_wallet_url) class=(LINK_STYLE)
                                        {
                                            "Create your first wallet"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Wallets", &[], &content)
}

fn wallet_cards_view(wallets: &[WalletTableRow], new_wallet_url: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for wallet in wallets {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-wallet-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        a href=(wallet.view_url) class="text-sm font-semibold text-gray-900 dark:text-white"
                        { (wallet.name) }
                        div class="text-sm tabular-nums text-right text-gray-900 dark:text-white"
                        { (format_currency(wallet.current_balance)) }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        a href=(wallet.new_transaction_url) class=(LINK_STYLE) { "Add transaction" }

                        (edit_delete_action_links(
                            &wallet.edit_url,
                            &wallet.delete_url,
                            &delete_confirm_message(&wallet.name),
                            "closest [data-wallet-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if wallets.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No wallets yet. "
                    a href=(new_wallet_url) class=(LINK_STYLE)
                    {
                        "Create your first wallet"
                    }
                }
            }
        }
    )
}
