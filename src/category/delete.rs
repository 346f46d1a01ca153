//! Category deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID, alert::Alert, app_state::DbState, category::delete_category,
    database_id::CategoryId,
};

/// Handle category deletion requests.
pub async fn delete_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, user_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
