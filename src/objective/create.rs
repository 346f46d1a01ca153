//! The page and endpoint for creating an objective, and the form fields
//! shared with the edit page.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, UserID,
    app_state::DbState,
    database_id::WalletId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    objective::core::{Objective, ObjectiveDetails, create_objective},
    wallet::{Wallet, get_active_wallets},
};

/// The form data for creating or editing an objective.
///
/// Empty `due_date` and `wallet_id` fields mean no due date and no wallet.
#[derive(Debug, Deserialize)]
pub struct ObjectiveForm {
    pub name: String,
    pub target_amount: f64,
    pub due_date: Option<Date>,
    pub wallet_id: Option<WalletId>,
    #[serde(default)]
    pub icon: String,
}

impl From<ObjectiveForm> for ObjectiveDetails {
    fn from(form: ObjectiveForm) -> Self {
        ObjectiveDetails {
            name: form.name,
            target_amount: form.target_amount,
            due_date: form.due_date,
            wallet_id: form.wallet_id,
            icon: Some(form.icon),
        }
    }
}

/// Render the inputs of the objective form, prefilled from `objective` when editing.
pub(crate) fn objective_form_fields(objective: Option<&Objective>, wallets: &[Wallet]) -> Markup {
    let selected_wallet = objective.and_then(|objective| objective.wallet_id);

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Objective Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Holiday"
                value=[objective.map(|objective| &objective.name)]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="target_amount" class=(FORM_LABEL_STYLE) { "Target Amount" }

            div class="input-wrapper w-full"
            {
                input
                    id="target_amount"
                    type="number"
                    name="target_amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=[objective.map(|objective| format!("{:.2}", objective.target_amount))]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="due_date" class=(FORM_LABEL_STYLE) { "Due Date (optional)" }

            input
                id="due_date"
                type="date"
                name="due_date"
                value=[objective.and_then(|objective| objective.due_date)]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="wallet_id" class=(FORM_LABEL_STYLE) { "Savings Wallet" }

            select
                id="wallet_id"
                name="wallet_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No wallet" }

                @for wallet in wallets {
                    option value=(wallet.id) selected[selected_wallet == Some(wallet.id)]
                    {
                        (wallet.name)
                    }
                }
            }
        }

        div
        {
            label for="icon" class=(FORM_LABEL_STYLE) { "Icon (optional)" }

            input
                id="icon"
                type="text"
                name="icon"
                maxlength="10"
                placeholder="e.g. ✈️"
                value=[objective.and_then(|objective| objective.icon.as_deref())]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// Render the page for creating an objective.
pub async fn get_new_objective_page(
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

    Ok(new_objective_view(&wallets).into_response())
}

fn new_objective_view(wallets: &[Wallet]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_OBJECTIVE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Create Objective" }

            form
                hx-post=(endpoints::POST_OBJECTIVE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (objective_form_fields(None, wallets))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Objective" }
            }
        }
    };

    base("Create Objective", &[dollar_input_styles()], &content)
}

/// A route handler for creating an objective, redirects to the objectives page on success.
pub async fn create_objective_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ObjectiveForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_objective(form.into(), user_id, &connection) {
        Ok(objective) => {
            tracing::info!("User {user_id} created objective {}", objective.id);

            (
                HxRedirect(endpoints::OBJECTIVES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not create objective: {error}");
            error.into_alert_response()
        }
    }
}
