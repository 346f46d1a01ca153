//! The page and endpoint for creating a wallet.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error, UserID,
    app_state::DbState,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        base, dollar_input_styles,
    },
    navigation::NavBar,
    wallet::{WalletName, create_wallet},
};

/// Renders the page for creating a wallet.
pub async fn get_new_wallet_page() -> Response {
    new_wallet_view().into_response()
}

fn new_wallet_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_WALLET_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Create Wallet" }

            form
                hx-post=(endpoints::POST_WALLET)
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
                        placeholder="e.g. Cash"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="initial_balance" class=(FORM_LABEL_STYLE) { "Initial Balance" }

                    div class="input-wrapper w-full"
                    {
                        input
                            id="initial_balance"
                            type="number"
                            name="initial_balance"
                            step="0.01"
                            min="0"
                            value="0"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Wallet" }
            }
        }
    };

    base("Create Wallet", &[dollar_input_styles()], &content)
}

/// The form data for creating a wallet.
#[derive(Debug, Deserialize)]
pub struct NewWalletForm {
    /// The wallet name, it is trimmed and capitalised before saving.
    pub name: String,
    /// The opening balance in dollars.
    pub initial_balance: f64,
}

/// A route handler for creating a wallet, redirects to the wallets page on success.
pub async fn create_wallet_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewWalletForm>,
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

    match create_wallet(name, form.initial_balance, user_id, &connection) {
        Ok(wallet) => {
            tracing::info!("User {user_id} created wallet {}", wallet.id);

            (
                HxRedirect(endpoints::WALLETS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not create wallet with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}
