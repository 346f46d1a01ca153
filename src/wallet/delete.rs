//! The endpoint for deleting a wallet.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID, alert::Alert, app_state::DbState, database_id::WalletId,
    wallet::deactivate_wallet,
};

/// A route handler for deleting a wallet, responds with an alert.
///
/// The wallet is deactivated rather than removed so that its transactions
/// still count towards reports.
pub async fn delete_wallet_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match deactivate_wallet(wallet_id, user_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Wallet deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not delete wallet {wallet_id}: {error}");
            error.into_alert_response()
        }
    }
}
