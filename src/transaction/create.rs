//! The page and endpoint for recording a transaction against a wallet.

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
    category::{Category, get_user_categories},
    database_id::WalletId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{
        core::TransactionType,
        form::{TransactionForm, TransactionFormDefaults, transaction_form_fields},
        ledger::{NewTransaction, create_transaction},
    },
    wallet::{Wallet, get_owned_wallet},
};

/// Renders the form for adding a transaction to a wallet.
///
/// Responds with a 404 page if the wallet does not exist or has been deleted,
/// and a 403 page if it belongs to another user.
pub async fn get_new_transaction_page(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let wallet = get_owned_wallet(wallet_id, user_id, &connection)?;
    let categories = get_user_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(new_transaction_view(&wallet, today, &categories).into_response())
}

fn new_transaction_view(wallet: &Wallet, today: Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let post_url = format_endpoint(endpoints::POST_TRANSACTION, wallet.id);
    let wallet_url = format_endpoint(endpoints::WALLET_VIEW, wallet.id);
    let spinner = loading_spinner();
    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            transaction_type: TransactionType::Expense,
            amount: None,
            date: today,
            description: None,
            category_id: None,
            max_date: today,
        },
        categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(post_url)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Wallet: " (wallet.name) " (" (format_currency(wallet.current_balance)) ")"
                }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (spinner) }
                    "Create Transaction"
                }
            }

            a href=(wallet_url) class={"mt-4 " (LINK_STYLE)} { "Back to wallet" }
        }
    };

    base("Create Transaction", &[dollar_input_styles()], &content)
}

/// A route handler for recording a transaction, redirects to the wallet page on success.
pub async fn create_transaction_endpoint(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
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

    let new_transaction = NewTransaction {
        type_: form.type_,
        value: form.amount,
        created_at: form.date,
        description: form.description,
        wallet_id,
        category_id: form.category_id,
    };

    match create_transaction(new_transaction, user_id, today, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "User {user_id} recorded transaction {} in wallet {wallet_id}",
                transaction.id
            );

            (
                HxRedirect(format_endpoint(endpoints::WALLET_VIEW, wallet_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not create transaction in wallet {wallet_id}: {error}");
            error.into_alert_response()
        }
    }
}
