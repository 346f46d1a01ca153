//! The page listing every transaction across the user's wallets, and the
//! transaction table shared with the wallet page.

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
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, date_datetime_attr, edit_delete_action_links, format_currency,
        truncate_text,
    },
    navigation::NavBar,
    transaction::core::{TransactionListItem, TransactionType, get_user_transactions},
};

const DESCRIPTION_MAX_GRAPHEMES: usize = 32;
const DELETE_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this transaction? The wallet balance will be updated.";

fn signed_amount(item: &TransactionListItem) -> (String, &'static str) {
    let transaction = &item.transaction;

    match transaction.type_ {
        TransactionType::Income => (
            format!("+{}", format_currency(transaction.value)),
            "text-green-700 dark:text-green-400",
        ),
        TransactionType::Expense => (
            format_currency(-transaction.value),
            "text-gray-900 dark:text-white",
        ),
    }
}

fn action_links(item: &TransactionListItem, hx_target: &str, hx_swap: &str) -> Markup {
    let id = item.transaction.id;

    html! {
        @if item.wallet_is_active {
            (edit_delete_action_links(
                &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, id),
                &format_endpoint(endpoints::DELETE_TRANSACTION, id),
                DELETE_CONFIRM_MESSAGE,
                hx_target,
                hx_swap,
            ))
        } @else {
            span class="text-xs text-gray-500 dark:text-gray-400" { "Wallet closed" }
        }
    }
}

/// A table of transactions, with cards in place of the table on small screens.
///
/// The wallet column is only shown when `show_wallet` is true.
pub fn transaction_table_view(items: &[TransactionListItem], show_wallet: bool) -> Markup {
    let column_count = if show_wallet { 6 } else { 5 };

    html! {
        ul class="lg:hidden space-y-4"
        {
            @for item in items {
                @let (amount, amount_style) = signed_amount(item);

                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-transaction-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        {
                            @if item.transaction.description.is_empty() {
                                (item.category_name)
                            } @else {
                                (truncate_text(&item.transaction.description, DESCRIPTION_MAX_GRAPHEMES))
                            }
                        }
                        div class={"text-sm tabular-nums text-right " (amount_style)} { (amount) }
                    }

                    div class="mt-1 flex flex-wrap items-center gap-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        time datetime=(date_datetime_attr(item.transaction.created_at))
                        { (item.transaction.created_at) }
                        span class=(BADGE_STYLE) { (item.category_name) }
                        @if show_wallet {
                            span { (item.wallet_name) }
                        }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (action_links(item, "closest [data-transaction-card='true']", "outerHTML"))
                    }
                }
            }

            @if items.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No transactions recorded yet."
                }
            }
        }

        section class="hidden lg:block w-full overflow-x-auto dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        @if show_wallet {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Wallet" }
                        }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for item in items {
                        @let (amount, amount_style) = signed_amount(item);

                        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                time datetime=(date_datetime_attr(item.transaction.created_at))
                                { (item.transaction.created_at) }
                            }
                            td class=(TABLE_CELL_STYLE) title=(item.transaction.description)
                            {
                                (truncate_text(&item.transaction.description, DESCRIPTION_MAX_GRAPHEMES))
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(BADGE_STYLE) { (item.category_name) }
                            }
                            @if show_wallet {
                                td class=(TABLE_CELL_STYLE) { (item.wallet_name) }
                            }
                            td class={"px-6 py-4 text-right tabular-nums " (amount_style)} data-amount="true"
                            {
                                (amount)
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    (action_links(item, "closest tr", "delete"))
                                }
                            }
                        }
                    }

                    @if items.is_empty() {
                        tr
                        {
                            td
                                colspan=(column_count)
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No transactions recorded yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders every transaction of the user's wallets, newest first.
pub async fn get_transactions_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_user_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&items).into_response())
}

fn transactions_view(items: &[TransactionListItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::WALLETS_VIEW) class=(LINK_STYLE)
                    {
                        "Choose a wallet to add a transaction"
                    }
                }

                (transaction_table_view(items, true))
            }
        }
    );

    base("Transactions", &[], &content)
}
