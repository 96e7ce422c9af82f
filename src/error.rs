//! Defines the app level error type and conversions to rendered HTML pages, alerts and JSON.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string (or only whitespace) was used as a record category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// The date of a record could not be parsed as a calendar date.
    ///
    /// Holds the text that failed to parse.
    #[error("\"{0}\" is not a valid date, expected a date formatted as YYYY-MM-DD")]
    InvalidDate(String),

    /// An amount was neither empty nor a whole number.
    ///
    /// Holds the text that failed to parse.
    #[error("\"{0}\" is not a valid amount, expected a whole number")]
    InvalidAmount(String),

    /// A negative number was used as an income or expense amount.
    ///
    /// The direction of the money is given by the leg (income or expense), so
    /// amounts are never negative.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(i64),

    /// An amount was larger than [crate::Amount::MAX].
    #[error("{0} is larger than the largest allowed amount of {max}", max = crate::Amount::MAX)]
    AmountTooLarge(i64),

    /// A month key could not be parsed.
    #[error("\"{0}\" is not a valid month, expected a month formatted as YYYY-MM")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a record that does not exist
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

/// The broad categories of [Error] that callers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was rejected. The store was not touched.
    Validation,
    /// The operation targeted a record that does not exist.
    NotFound,
    /// The store could not be reached or the request failed. The user may retry.
    TransientIO,
}

impl Error {
    /// Get the kind of error, which determines how it is reported to the client.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCategory
            | Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::NegativeAmount(_)
            | Error::AmountTooLarge(_)
            | Error::InvalidMonth(_) => ErrorKind::Validation,
            Error::NotFound | Error::UpdateMissingRecord | Error::DeleteMissingRecord => {
                ErrorKind::NotFound
            }
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                ErrorKind::TransientIO
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::TransientIO => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingRecord | Error::DeleteMissingRecord => {
                NotFoundError.into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();
        let description = self.to_string();
        let alert = match self {
            Error::EmptyCategory
            | Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::NegativeAmount(_)
            | Error::AmountTooLarge(_)
            | Error::InvalidMonth(_) => Alert::Error {
                message: "Invalid record".to_owned(),
                details: format!("{}.", capitalize(&description)),
            },
            Error::NotFound => Alert::Error {
                message: "Could not find record".to_owned(),
                details: "The record could not be found. \
                    It may have been deleted in another window."
                    .to_owned(),
            },
            Error::UpdateMissingRecord => Alert::Error {
                message: "Could not update record".to_owned(),
                details: "The record could not be found. \
                    It may have been deleted in another window."
                    .to_owned(),
            },
            Error::DeleteMissingRecord => Alert::Error {
                message: "Could not delete record".to_owned(),
                details: "The record could not be found. \
                    It may have already been deleted."
                    .to_owned(),
            },
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::SqlError(_) | Error::DatabaseLockError => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, try again or check the server logs for \
                    more details."
                    .to_owned(),
            },
        };

        (status_code, alert.into_html()).into_response()
    }

    /// Convert the error into an HTTP response with a JSON body of the form `{"error": "..."}`.
    ///
    /// Details of unexpected errors are only logged, the client gets a generic message.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();
        let message = match self.kind() {
            ErrorKind::Validation => self.to_string(),
            ErrorKind::NotFound => "Record not found".to_owned(),
            ErrorKind::TransientIO => {
                tracing::error!("An unexpected error occurred: {}", self);
                "Internal Server Error".to_owned()
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
