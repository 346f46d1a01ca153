//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        session_guard, session_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, rename_category_endpoint,
    },
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    goal::{
        create_goal_endpoint, delete_goal_endpoint, edit_goal_endpoint, get_edit_goal_page,
        get_goals_page, get_new_goal_page,
    },
    objective::{
        create_objective_endpoint, delete_objective_endpoint, edit_objective_endpoint,
        get_edit_objective_page, get_new_objective_page, get_objectives_page,
    },
    report::get_report_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transactions_page,
    },
    wallet::{
        create_wallet_endpoint, delete_wallet_endpoint, get_edit_wallet_page,
        get_new_wallet_page, get_wallet_page, get_wallets_page, rename_wallet_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::WALLETS_VIEW, get(get_wallets_page))
        .route(endpoints::NEW_WALLET_VIEW, get(get_new_wallet_page))
        .route(endpoints::WALLET_VIEW, get(get_wallet_page))
        .route(endpoints::EDIT_WALLET_VIEW, get(get_edit_wallet_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(endpoints::NEW_GOAL_VIEW, get(get_new_goal_page))
        .route(endpoints::EDIT_GOAL_VIEW, get(get_edit_goal_page))
        .route(endpoints::OBJECTIVES_VIEW, get(get_objectives_page))
        .route(endpoints::NEW_OBJECTIVE_VIEW, get(get_new_objective_page))
        .route(endpoints::EDIT_OBJECTIVE_VIEW, get(get_edit_objective_page))
        .route(endpoints::REPORTS_VIEW, get(get_report_page))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // These routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_WALLET, post(create_wallet_endpoint))
            .route(
                endpoints::PUT_WALLET,
                put(rename_wallet_endpoint).delete(delete_wallet_endpoint),
            )
            .route(
                endpoints::POST_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::PUT_TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
            .route(
                endpoints::PUT_CATEGORY,
                put(rename_category_endpoint).delete(delete_category_endpoint),
            )
            .route(endpoints::POST_GOAL, post(create_goal_endpoint))
            .route(
                endpoints::PUT_GOAL,
                put(edit_goal_endpoint).delete(delete_goal_endpoint),
            )
            .route(endpoints::POST_OBJECTIVE, post(create_objective_endpoint))
            .route(
                endpoints::PUT_OBJECTIVE,
                put(edit_objective_endpoint).delete(delete_objective_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), session_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the wallets page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::WALLETS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, auth::SESSION_COOKIE, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "foobar", "Etc/UTC").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::WALLETS_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW),
            "got redirect to {location:?}"
        );
    }

    #[tokio::test]
    async fn api_routes_use_hx_redirect_without_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::POST_WALLET)
            .form(&[("name", "Cash"), ("initial_balance", "10")])
            .await;

        assert!(response.headers().contains_key("hx-redirect"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = get_test_server();

        server
            .get("/definitely/not/a/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registered_user_can_create_and_view_wallet() {
        let server = get_test_server();
        let register_response = server
            .post(endpoints::USERS)
            .form(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "iamtestingwhethericancreateanewuser"),
                ("confirm_password", "iamtestingwhethericancreateanewuser"),
            ])
            .await;
        register_response.assert_status_see_other();
        let token_cookie = register_response.cookie(SESSION_COOKIE);

        server
            .post(endpoints::POST_WALLET)
            .add_cookie(token_cookie.clone())
            .form(&[("name", "Cash"), ("initial_balance", "25")])
            .await
            .assert_status_see_other();
        let wallets_page = server
            .get(endpoints::WALLETS_VIEW)
            .add_cookie(token_cookie)
            .await;

        wallets_page.assert_status_ok();
        wallets_page.assert_text_contains("Cash");
        wallets_page.assert_text_contains("$25.00");
    }
}
