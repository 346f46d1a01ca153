//! The page and endpoint for editing a goal.

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
    database_id::GoalId,
    endpoints::{self, format_endpoint},
    goal::core::{Goal, edit_goal, get_active_goal},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, dollar_input_styles,
    },
    navigation::NavBar,
};

/// The form data for editing a goal.
#[derive(Debug, Deserialize)]
pub struct EditGoalForm {
    pub name: String,
    pub target_amount: f64,
}

/// Render the page for editing one of the user's active goals.
pub async fn get_edit_goal_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_active_goal(goal_id, user_id, &connection)?;

    Ok(edit_goal_view(&goal).into_response())
}

fn edit_goal_view(goal: &Goal) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_GOAL_VIEW).into_html();
    let put_url = format_endpoint(endpoints::PUT_GOAL, goal.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Goal" }

            form
                hx-put=(put_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Goal Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(goal.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="target_amount" class=(FORM_LABEL_STYLE) { "Spending Limit" }

                    div class="input-wrapper w-full"
                    {
                        input
                            id="target_amount"
                            type="number"
                            name="target_amount"
                            step="0.01"
                            min="0.01"
                            value=(format!("{:.2}", goal.target_amount))
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }

            a href=(endpoints::GOALS_VIEW) class={"mt-4 " (LINK_STYLE)} { "Cancel" }
        }
    };

    base("Edit Goal", &[dollar_input_styles()], &content)
}

/// A route handler for editing a goal, redirects to the goals page on success.
pub async fn edit_goal_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<EditGoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match edit_goal(goal_id, &form.name, form.target_amount, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not update goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}
