//! The page listing the user's active goals and their progress.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbTimezoneState,
    endpoints::{self, format_endpoint},
    goal::core::{GoalProgress, GoalStatus, expire_goals, get_goals_progress},
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
    timezone::get_local_date,
};

/// Expire goals past their deadline, then render the remaining active goals.
pub async fn get_goals_page(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    expire_goals(user_id, today, &connection)
        .inspect_err(|error| tracing::error!("could not expire goals: {error}"))?;
    let goals = get_goals_progress(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get goals: {error}"))?;

    Ok(goals_view(&goals).into_response())
}

fn progress_bar_style(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Safe => "bg-green-600",
        GoalStatus::Warning => "bg-yellow-400",
        GoalStatus::Danger => "bg-red-600",
    }
}

fn goal_card(progress: &GoalProgress) -> Markup {
    let goal = &progress.goal;
    let confirm_message = format!("Are you sure you want to delete the goal '{}'?", goal.name);

    html! {
        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800 space-y-2"
            data-goal-card="true"
            data-status=(progress.status.as_str())
        {
            div class="flex items-start justify-between gap-3"
            {
                h2 class="font-semibold text-gray-900 dark:text-white" { (goal.name) }
                span class=(BADGE_STYLE)
                {
                    (progress.category_name.as_deref().unwrap_or("All categories"))
                }
            }

            div class="w-full h-2.5 rounded-full bg-gray-200 dark:bg-gray-700"
            {
                div
                    class={"h-2.5 rounded-full " (progress_bar_style(progress.status))}
                    style=(format!("width: {:.0}%", progress.percentage))
                {}
            }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                span data-spent="true" { (format_currency(progress.current)) }
                " of " (format_currency(goal.target_amount))
                " (" (format!("{:.0}%", progress.real_percentage)) ")"
            }

            p class="text-sm text-gray-600 dark:text-gray-400" data-remaining="true"
            {
                @if progress.remaining < 0.0 {
                    (format_currency(-progress.remaining)) " over the limit"
                } @else {
                    (format_currency(progress.remaining)) " left"
                }
            }

            p class="text-xs text-gray-500 dark:text-gray-400"
            {
                "Since " (goal.created_at)
                @if let Some(deadline) = goal.deadline {
                    ", until " (deadline)
                }
            }

            div class="flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(
                    &format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id),
                    &format_endpoint(endpoints::DELETE_GOAL, goal.id),
                    &confirm_message,
                    "closest [data-goal-card='true']",
                    "outerHTML",
                ))
            }
        }
    }
}

fn goals_view(goals: &[GoalProgress]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Goals" }

                    a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE) { "Create Goal" }
                }

                ul class="grid gap-4 md:grid-cols-2"
                {
                    @for progress in goals {
                        (goal_card(progress))
                    }

                    @if goals.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400 md:col-span-2"
                        {
                            "No active goals. "
                            a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE)
                            {
                                "Set a spending goal"
                            }
                        }
                    }
                }
            }
        }
    );

    base("Goals", &[], &content)
}

#[cfg(test)]
mod goals_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::DbTimezoneState,
        category::{CategoryName, create_category},
        goal::core::{NewGoal, create_goal, get_active_goals},
        test_utils::{
            assert_valid_html, create_test_user, get_test_connection, parse_html_document,
            select_text,
        },
        transaction::{NewTransaction, TransactionType, create_transaction},
        wallet::{WalletName, create_wallet},
    };

    use super::get_goals_page;

    #[tokio::test]
    async fn shows_progress_and_expires_old_goals() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let today = OffsetDateTime::now_utc().date();
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 100.0, user_id, &connection).unwrap();
        let food =
            create_category(CategoryName::new_unchecked("Food"), user_id, &connection).unwrap();
        create_goal(
            NewGoal {
                name: "Groceries".to_owned(),
                target_amount: 50.0,
                deadline: None,
                category_id: Some(food.id),
            },
            user_id,
            today,
            &connection,
        )
        .unwrap();
        create_goal(
            NewGoal {
                name: "Old".to_owned(),
                target_amount: 50.0,
                deadline: Some(today - Duration::days(1)),
                category_id: None,
            },
            user_id,
            today - Duration::days(10),
            &connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                type_: TransactionType::Expense,
                value: 45.0,
                created_at: today,
                description: String::new(),
                wallet_id: wallet.id,
                category_id: food.id,
            },
            user_id,
            today,
            &connection,
        )
        .unwrap();
        let state = DbTimezoneState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_goals_page(State(state.clone()), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "[data-goal-card] h2"), vec!["Groceries"]);
        assert_eq!(select_text(&html, "[data-spent]"), vec!["$45.00"]);
        assert_eq!(select_text(&html, "[data-remaining]"), vec!["$5.00 left"]);
        assert_eq!(
            select_text(&html, "[data-status='warning'] h2"),
            vec!["Groceries"]
        );
        let active = get_active_goals(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(active.len(), 1);
    }
}
