//! The page and endpoint for editing a transaction.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use time::Date;

use crate::{
    Error, UserID,
    app_state::DbTimezoneState,
    category::{Category, CategoryName, get_user_categories},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{
        core::{TransactionListItem, get_owned_transaction},
        form::{TransactionForm, TransactionFormDefaults, transaction_form_fields},
        ledger::{TransactionUpdate, edit_transaction},
    },
};

/// Renders the form for editing a transaction, prefilled with its details.
///
/// Transactions of deleted wallets are read only and respond with a 404 page.
pub async fn get_edit_transaction_page(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = get_owned_transaction(transaction_id, user_id, &connection)?;
    if !item.wallet_is_active {
        return Err(Error::NotFound);
    }

    let categories = get_user_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(edit_transaction_view(&item, today, &categories).into_response())
}

fn edit_transaction_view(
    item: &TransactionListItem,
    today: Date,
    categories: &[Category],
) -> Markup {
    let transaction = &item.transaction;
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let put_url = format_endpoint(endpoints::PUT_TRANSACTION, transaction.id);
    let wallet_url = format_endpoint(endpoints::WALLET_VIEW, transaction.wallet_id);
    let spinner = loading_spinner();

    // System categories are not offered for new transactions, but a
    // transaction already filed under one keeps it.
    let mut options = categories.to_vec();
    if !options
        .iter()
        .any(|category| category.id == transaction.category_id)
    {
        options.push(Category {
            id: transaction.category_id,
            name: CategoryName::new_unchecked(&item.category_name),
            user_id: None,
        });
    }

    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            transaction_type: transaction.type_,
            amount: Some(transaction.value),
            date: transaction.created_at,
            description: Some(&transaction.description),
            category_id: Some(transaction.category_id),
            max_date: today,
        },
        &options,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(put_url)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Wallet: " (item.wallet_name)
                }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (spinner) }
                    "Update Transaction"
                }
            }

            a href=(wallet_url) class={"mt-4 " (LINK_STYLE)} { "Cancel" }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}

/// A route handler for editing a transaction, redirects to the page of the
/// transaction's wallet on success.
pub async fn edit_transaction_endpoint(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update = TransactionUpdate {
        type_: form.type_,
        value: form.amount,
        created_at: form.date,
        description: form.description,
        category_id: form.category_id,
    };

    match edit_transaction(transaction_id, update, user_id, today, &connection) {
        Ok(transaction) => (
            HxRedirect(format_endpoint(
                endpoints::WALLET_VIEW,
                transaction.wallet_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
