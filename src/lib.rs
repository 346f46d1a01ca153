//! Pocketbook is a web app for tracking personal finances.
//!
//! Users keep money in wallets, record income and expenses against them,
//! group transactions by category, set spending goals and savings objectives
//! and view monthly reports.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod amount;
mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod error_pages;
mod goal;
mod html;
mod logging;
mod name;
mod navigation;
mod objective;
mod report;
mod routing;
mod timezone;
mod transaction;
mod wallet;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    get_user_by_id, update_password,
};
pub use category::{CategoryName, create_category};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use goal::{NewGoal, create_goal};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use objective::{ObjectiveDetails, create_objective};
pub use routing::build_router;
pub use transaction::{NewTransaction, TransactionType, create_transaction};
pub use wallet::{WalletName, create_wallet};

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Wait for ctrl+c or SIGTERM, then shut down the server behind `handle` gracefully.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "ctrl+c",
        _ = terminate => "terminate",
    };

    tracing::info!("Received {signal}, shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}
