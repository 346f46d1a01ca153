//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/wallets/{wallet_id}', use [format_endpoint].

/// The root route which redirects to the wallets or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users, lists the user's active wallets.
pub const WALLETS_VIEW: &str = "/wallets";
/// The page for creating a new wallet.
pub const NEW_WALLET_VIEW: &str = "/wallets/new";
/// The page for a single wallet and its transactions.
pub const WALLET_VIEW: &str = "/wallets/{wallet_id}";
/// The page for renaming a wallet.
pub const EDIT_WALLET_VIEW: &str = "/wallets/{wallet_id}/edit";
/// The page for recording a transaction against a wallet.
pub const NEW_TRANSACTION_VIEW: &str = "/wallets/{wallet_id}/transactions/new";
/// The page for displaying a user's transactions across all wallets.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for listing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for renaming a category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for listing spending goals and their progress.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page for editing a goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The page for listing savings objectives and their progress.
pub const OBJECTIVES_VIEW: &str = "/objectives";
/// The page for creating a new objective.
pub const NEW_OBJECTIVE_VIEW: &str = "/objectives/new";
/// The page for editing an objective.
pub const EDIT_OBJECTIVE_VIEW: &str = "/objectives/{objective_id}/edit";
/// The page for monthly reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route to create a wallet.
pub const POST_WALLET: &str = "/api/wallets";
/// The route to rename a wallet.
pub const PUT_WALLET: &str = "/api/wallets/{wallet_id}";
/// The route to deactivate a wallet.
pub const DELETE_WALLET: &str = "/api/wallets/{wallet_id}";
/// The route to record a transaction against a wallet.
pub const POST_TRANSACTION: &str = "/api/wallets/{wallet_id}/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to rename a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create a goal.
pub const POST_GOAL: &str = "/api/goals";
/// The route to update a goal.
pub const PUT_GOAL: &str = "/api/goals/{goal_id}";
/// The route to delete a goal.
pub const DELETE_GOAL: &str = "/api/goals/{goal_id}";
/// The route to create an objective.
pub const POST_OBJECTIVE: &str = "/api/objectives";
/// The route to update an objective.
pub const PUT_OBJECTIVE: &str = "/api/objectives/{objective_id}";
/// The route to delete an objective.
pub const DELETE_OBJECTIVE: &str = "/api/objectives/{objective_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::WALLETS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_WALLET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::WALLET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_WALLET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_CATEGORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_CATEGORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::GOALS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_GOAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_GOAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::OBJECTIVES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_OBJECTIVE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_OBJECTIVE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REPORTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::POST_WALLET);
        assert_endpoint_is_valid_uri(endpoints::PUT_WALLET);
        assert_endpoint_is_valid_uri(endpoints::POST_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::PUT_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::POST_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::PUT_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::POST_GOAL);
        assert_endpoint_is_valid_uri(endpoints::PUT_GOAL);
        assert_endpoint_is_valid_uri(endpoints::POST_OBJECTIVE);
        assert_endpoint_is_valid_uri(endpoints::PUT_OBJECTIVE);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/wallets/{wallet_id}", 1);

        assert_eq!(formatted_path, "/wallets/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/wallets/{wallet}", 1);

        assert_eq!(formatted_path, "/wallets/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/wallets/new", 1);

        assert_eq!(formatted_path, "/wallets/new");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(super::NEW_TRANSACTION_VIEW, 7);

        assert_eq!(formatted_path, "/wallets/7/transactions/new");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
