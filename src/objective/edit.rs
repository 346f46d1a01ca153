//! The page and endpoint for editing an objective.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbState,
    database_id::ObjectiveId,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    objective::{
        core::{Objective, edit_objective, get_active_objective},
        create::{ObjectiveForm, objective_form_fields},
    },
    wallet::{Wallet, get_active_wallets},
};

/// Render the page for editing one of the user's active objectives.
pub async fn get_edit_objective_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(objective_id): Path<ObjectiveId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let objective = get_active_objective(objective_id, user_id, &connection)?;
    let wallets = get_active_wallets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get wallets: {error}"))?;

    Ok(edit_objective_view(&objective, &wallets).into_response())
}

fn edit_objective_view(objective: &Objective, wallets: &[Wallet]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_OBJECTIVE_VIEW).into_html();
    let put_url = format_endpoint(endpoints::PUT_OBJECTIVE, objective.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Objective" }

            form
                hx-put=(put_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (objective_form_fields(Some(objective), wallets))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }

            a href=(endpoints::OBJECTIVES_VIEW) class={"mt-4 " (LINK_STYLE)} { "Cancel" }
        }
    };

    base("Edit Objective", &[dollar_input_styles()], &content)
}

/// A route handler for editing an objective, redirects to the objectives page on success.
pub async fn edit_objective_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(objective_id): Path<ObjectiveId>,
    Form(form): Form<ObjectiveForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match edit_objective(objective_id, form.into(), user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::OBJECTIVES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not update objective {objective_id}: {error}");
            error.into_alert_response()
        }
    }
}
