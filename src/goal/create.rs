//! The page and endpoint for creating a goal.

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
    app_state::DbTimezoneState,
    category::{Category, get_user_categories},
    database_id::CategoryId,
    endpoints,
    goal::core::{NewGoal, create_goal},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    timezone::get_local_date,
};

/// The form data for creating a goal.
///
/// Empty `deadline` and `category_id` fields mean no deadline and all
/// categories.
#[derive(Debug, Deserialize)]
pub struct NewGoalForm {
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<Date>,
    pub category_id: Option<CategoryId>,
}

/// Render the page for creating a goal.
pub async fn get_new_goal_page(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_user_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(new_goal_view(today, &categories).into_response())
}

fn new_goal_view(today: Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_GOAL_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Create Goal" }

            form
                hx-post=(endpoints::POST_GOAL)
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
                        placeholder="e.g. Eating out"
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
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="deadline" class=(FORM_LABEL_STYLE) { "Deadline (optional)" }

                    input
                        id="deadline"
                        type="date"
                        name="deadline"
                        min=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        id="category_id"
                        name="category_id"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "All categories" }

                        @for category in categories {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Goal" }
            }
        }
    };

    base("Create Goal", &[dollar_input_styles()], &content)
}

/// A route handler for creating a goal, redirects to the goals page on success.
pub async fn create_goal_endpoint(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewGoalForm>,
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

    let new_goal = NewGoal {
        name: form.name,
        target_amount: form.target_amount,
        deadline: form.deadline,
        category_id: form.category_id,
    };

    match create_goal(new_goal, user_id, today, &connection) {
        Ok(goal) => {
            tracing::info!("User {user_id} created goal {}", goal.id);

            (
                HxRedirect(endpoints::GOALS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not create goal: {error}");
            error.into_alert_response()
        }
    }
}
