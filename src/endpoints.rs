//! The endpoint URIs of the app.
//!
//! For endpoints that take a parameter, e.g., '/records/{record_id}', use [format_endpoint].

/// The root route which redirects to the ledger.
pub const ROOT: &str = "/";
/// The ledger page for one month.
pub const LEDGER_VIEW: &str = "/ledger";
/// The ledger content (month navigation, totals and record table) without the page around it.
pub const LEDGER_CONTENT: &str = "/ledger/content";
/// The route for creating a record from the ledger form.
pub const LEDGER_RECORDS: &str = "/ledger/records";
/// The modal form for adding a record.
pub const NEW_RECORD_MODAL: &str = "/ledger/records/new";
/// The modal showing one record. Also the route for updating and deleting it from the ledger.
pub const RECORD_MODAL: &str = "/ledger/records/{record_id}";
/// The modal form for editing a record.
pub const EDIT_RECORD_MODAL: &str = "/ledger/records/{record_id}/edit";
/// The empty modal, requested when the modal is dismissed.
pub const CLOSE_MODAL: &str = "/ledger/modal/close";
/// The overview of all months with records.
pub const MONTHS_VIEW: &str = "/months";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The compiled stylesheet and other files served as is.
pub const STATIC: &str = "/static";

/// The JSON route for listing and creating records.
pub const RECORDS_API: &str = "/records";
/// The JSON route for getting, updating and deleting a single record.
pub const RECORD_API: &str = "/records/{record_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/records/{record_id}', '{record_id}' is the parameter.
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

/// The ledger page or content URI for `month`, e.g. '/ledger?month=2025-10'.
pub fn with_month(endpoint_path: &str, month: &impl std::fmt::Display) -> String {
    format!("{endpoint_path}?month={month}")
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::{format_endpoint, with_month};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::LEDGER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LEDGER_CONTENT);
        assert_endpoint_is_valid_uri(endpoints::LEDGER_RECORDS);
        assert_endpoint_is_valid_uri(endpoints::NEW_RECORD_MODAL);
        assert_endpoint_is_valid_uri(endpoints::RECORD_MODAL);
        assert_endpoint_is_valid_uri(endpoints::EDIT_RECORD_MODAL);
        assert_endpoint_is_valid_uri(endpoints::CLOSE_MODAL);
        assert_endpoint_is_valid_uri(endpoints::MONTHS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::RECORDS_API);
        assert_endpoint_is_valid_uri(endpoints::RECORD_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::EDIT_RECORD_MODAL, 7);

        assert_eq!(formatted_path, "/ledger/records/7/edit");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn month_query_is_valid_uri() {
        let formatted_path = with_month(endpoints::LEDGER_VIEW, &"2025-10");

        assert_eq!(formatted_path, "/ledger?month=2025-10");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
