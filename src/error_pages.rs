//! Full-page responses for 404, 403 and 500 errors.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// Renders the 404 Not Found page.
pub struct NotFoundPage;

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            error_view(
                "Not Found",
                "404",
                "Something's missing.",
                "Sorry, we can't find that page. You'll find lots to explore on the home page.",
            ),
        )
            .into_response()
    }
}

/// Renders the 403 Forbidden page for items that belong to another user.
pub struct ForbiddenPage;

impl IntoResponse for ForbiddenPage {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            error_view(
                "Forbidden",
                "403",
                "Access denied.",
                "You do not have permission to view this page.",
            ),
        )
            .into_response()
    }
}

/// Renders the 500 Internal Server Error page.
pub struct InternalServerErrorPage<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again in a moment. If it keeps happening, the server logs say why.",
        }
    }
}

impl IntoResponse for InternalServerErrorPage<'_> {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_view("Internal Server Error", "500", self.description, self.fix),
        )
            .into_response()
    }
}

/// The fallback route handler for paths that do not match any route.
pub async fn get_404_not_found() -> Response {
    NotFoundPage.into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerErrorPage::default().into_response()
}

/// Send an htmx request to the 500 page. GET handlers use [axum::response::Redirect].
pub fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
