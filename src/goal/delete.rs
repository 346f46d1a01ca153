use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID, alert::Alert, app_state::DbState, database_id::GoalId,
    goal::core::delete_goal,
};

/// A route handler for deleting a goal.
///
/// Goals are deactivated rather than removed, creating a goal with the same
/// name brings it back.
pub async fn delete_goal_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(goal_id, user_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the goal card.
        Ok(()) => Alert::SuccessSimple {
            message: "Goal deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not delete goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        app_state::DbState,
        goal::core::{NewGoal, create_goal, get_active_goals},
        test_utils::{
            assert_alert_message, create_test_user, get_test_connection, parse_html_fragment,
        },
    };

    use super::delete_goal_endpoint;

    #[tokio::test]
    async fn delete_deactivates_goal() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let goal = create_goal(
            NewGoal {
                name: "Fuel".to_owned(),
                target_amount: 100.0,
                deadline: None,
                category_id: None,
            },
            user_id,
            date!(2025 - 01 - 01),
            &connection,
        )
        .unwrap();
        let state = DbState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_goal_endpoint(State(state.clone()), Extension(user_id), Path(goal.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Goal deleted successfully");
        let goals = get_active_goals(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(goals.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_goal_shows_alert() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let state = DbState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_goal_endpoint(State(state), Extension(user_id), Path(7)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Could not delete goal");
    }
}
