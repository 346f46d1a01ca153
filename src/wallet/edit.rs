//! The page and endpoint for renaming a wallet.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error, UserID,
    app_state::DbState,
    database_id::WalletId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
    wallet::{Wallet, WalletName, get_owned_wallet, rename_wallet},
};

/// Renders the page for renaming a wallet.
pub async fn get_edit_wallet_page(
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

    Ok(edit_wallet_view(&wallet).into_response())
}

fn edit_wallet_view(wallet: &Wallet) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_WALLET_VIEW).into_html();
    let put_url = format_endpoint(endpoints::PUT_WALLET, wallet.id);
    let wallet_url = format_endpoint(endpoints::WALLET_VIEW, wallet.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Rename Wallet" }

            form
                hx-put=(put_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Wallet Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(wallet.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }

            a href=(wallet_url) class={"mt-4 " (LINK_STYLE)} { "Cancel" }
        }
    };

    base("Rename Wallet", &[], &content)
}

/// The form data for renaming a wallet.
#[derive(Debug, Deserialize)]
pub struct RenameWalletForm {
    /// The new wallet name, it is trimmed and capitalised before saving.
    pub name: String,
}

/// A route handler for renaming a wallet, redirects to the wallet page on success.
pub async fn rename_wallet_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
    Form(form): Form<RenameWalletForm>,
) -> Response {
    let name = match WalletName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match rename_wallet(wallet_id, name, user_id, &connection) {
        Ok(()) => (
            HxRedirect(format_endpoint(endpoints::WALLET_VIEW, wallet_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not rename wallet {wallet_id}: {error}");
            error.into_alert_response()
        }
    }
}
