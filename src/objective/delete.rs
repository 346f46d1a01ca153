use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID, alert::Alert, app_state::DbState, database_id::ObjectiveId,
    objective::core::delete_objective,
};

/// A route handler for deleting an objective.
pub async fn delete_objective_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(objective_id): Path<ObjectiveId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_objective(objective_id, user_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the objective card.
        Ok(()) => Alert::SuccessSimple {
            message: "Objective deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not delete objective {objective_id}: {error}");
            error.into_alert_response()
        }
    }
}
