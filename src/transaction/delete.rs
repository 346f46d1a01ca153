use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID, alert::Alert, app_state::DbState, database_id::TransactionId,
    transaction::ledger::delete_transaction,
};

/// A route handler for deleting a transaction and reversing its effect on the
/// wallet balance.
pub async fn delete_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
