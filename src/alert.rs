//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that htmx swaps into the `#alert-container`
//! element of the base page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message to display in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success {
        /// The headline.
        message: String,
        /// Extra text shown under the headline.
        details: String,
    },
    /// A success message without details.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// An error message with extra details.
    Error {
        /// The headline.
        message: String,
        /// Extra text shown under the headline.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap for the alert container.
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message, details } => (true, message, Some(details)),
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
        };

        let style = if is_success {
            "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
            dark:bg-gray-800 dark:text-green-400 border border-green-300 dark:border-green-800"
        } else {
            "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
            dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800"
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class=(style)
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        div
                        {
                            p class="font-semibold" { (message) }

                            @if let Some(details) = details.filter(|details| !details.is_empty()) {
                                p class="mt-1" { (details) }
                            }
                        }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="font-bold"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}
