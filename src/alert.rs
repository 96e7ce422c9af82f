//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as out-of-band swaps into the `#alert-container`
//! element defined in [crate::html::base], so any htmx response can carry one.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message with its styling.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with no details.
    SuccessSimple { message: String },
    /// An error message with details on how to fix the problem.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment that swaps into the alert container.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }

    /// The alert without a container, for swapping into `#alert-container` as the target.
    pub fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div role="alert" class=(container_style)
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }

    /// The alert wrapped in an out-of-band swap of `#alert-container`, so it
    /// can ride along with a response that targets another element.
    pub fn into_oob_markup(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_markup())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const SUCCESS_STYLE: &str = "p-4 mb-4 rounded-lg border text-green-800 bg-green-50 \
    border-green-300 dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_STYLE: &str = "p-4 mb-4 rounded-lg border text-red-800 bg-red-50 \
    border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";
