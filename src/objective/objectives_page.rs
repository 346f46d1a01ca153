//! The page listing the user's savings objectives.

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
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
    objective::core::{ObjectiveProgress, get_active_objectives},
};

/// Render the user's active objectives with the amount saved towards each.
pub async fn get_objectives_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let objectives = get_active_objectives(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get objectives: {error}"))?;

    Ok(objectives_view(&objectives).into_response())
}

fn objective_card(progress: &ObjectiveProgress) -> Markup {
    let objective = &progress.objective;
    let confirm_message = format!(
        "Are you sure you want to delete the objective '{}'?",
        objective.name
    );
    let is_complete = progress.percentage >= 100.0;

    html! {
        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800 space-y-2"
            data-objective-card="true"
        {
            div class="flex items-start justify-between gap-3"
            {
                h2 class="font-semibold text-gray-900 dark:text-white"
                {
                    @if let Some(icon) = &objective.icon {
                        span class="mr-2" data-icon="true" { (icon) }
                    }
                    (objective.name)
                }

                span class=(BADGE_STYLE)
                {
                    (progress.wallet_name.as_deref().unwrap_or("No wallet"))
                }
            }

            div class="w-full h-2.5 rounded-full bg-gray-200 dark:bg-gray-700"
            {
                div
                    class={
                        "h-2.5 rounded-full "
                        (if is_complete { "bg-green-600" } else { "bg-blue-600" })
                    }
                    style=(format!("width: {:.0}%", progress.percentage))
                {}
            }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                span data-saved="true" { (format_currency(progress.current_amount)) }
                " of " (format_currency(objective.target_amount))
                " (" span data-percentage="true" { (format!("{:.0}%", progress.percentage)) } ")"
            }

            @if let Some(due_date) = objective.due_date {
                p class="text-xs text-gray-500 dark:text-gray-400" { "Due " (due_date) }
            }

            div class="flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(
                    &format_endpoint(endpoints::EDIT_OBJECTIVE_VIEW, objective.id),
                    &format_endpoint(endpoints::DELETE_OBJECTIVE, objective.id),
                    &confirm_message,
                    "closest [data-objective-card='true']",
                    "outerHTML",
                ))
            }
        }
    }
}

fn objectives_view(objectives: &[ObjectiveProgress]) -> Markup {
    let nav_bar = NavBar::new(endpoints::OBJECTIVES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Objectives" }

                    a href=(endpoints::NEW_OBJECTIVE_VIEW) class=(LINK_STYLE) { "Create Objective" }
                }

                ul class="grid gap-4 md:grid-cols-2"
                {
                    @for progress in objectives {
                        (objective_card(progress))
                    }

                    @if objectives.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400 md:col-span-2"
                        {
                            "No objectives yet. "
                            a href=(endpoints::NEW_OBJECTIVE_VIEW) class=(LINK_STYLE)
                            {
                                "Start saving for something"
                            }
                        }
                    }
                }
            }
        }
    );

    base("Objectives", &[], &content)
}
