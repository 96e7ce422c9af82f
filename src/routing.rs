//! Application router configuration.

use axum::{
    Router,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, Error, endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    record::{
        create_record_endpoint, create_record_json, delete_record_endpoint, delete_record_json,
        get_close_modal, get_edit_record_modal, get_ledger_content, get_ledger_page,
        get_months_page, get_new_record_modal, get_record_json, get_record_modal,
        list_records_json, update_record_endpoint, update_record_json,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LEDGER_VIEW, get(get_ledger_page))
        .route(endpoints::LEDGER_CONTENT, get(get_ledger_content))
        .route(endpoints::LEDGER_RECORDS, post(create_record_endpoint))
        .route(endpoints::NEW_RECORD_MODAL, get(get_new_record_modal))
        .route(
            endpoints::RECORD_MODAL,
            get(get_record_modal)
                .put(update_record_endpoint)
                .delete(delete_record_endpoint),
        )
        .route(endpoints::EDIT_RECORD_MODAL, get(get_edit_record_modal))
        .route(endpoints::CLOSE_MODAL, get(get_close_modal))
        .route(endpoints::MONTHS_VIEW, get(get_months_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::RECORDS_API,
            get(list_records_json).post(create_record_json),
        )
        .route(
            endpoints::RECORD_API,
            get(get_record_json)
                .put(update_record_json)
                .delete(delete_record_json),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_fallback)
        .with_state(state)
}

/// Unknown paths under the JSON API get a JSON 404, everything else gets the 404 page.
async fn get_fallback(uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        Error::NotFound.into_json_response()
    } else {
        get_404_not_found().await.into_response()
    }
}

fn is_api_path(path: &str) -> bool {
    path.strip_prefix(endpoints::RECORDS_API)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// The root path '/' redirects to the ledger page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LEDGER_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{AppState, build_router, db::seed_sample_records};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "Etc/UTC").unwrap();
        seed_sample_records(&state.db_connection.lock().unwrap()).unwrap();

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/nope").expect_failure().await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn unknown_api_route_returns_json_404() {
        let server = get_test_server();

        for path in ["/records/1/extra", "/records/"] {
            let response = server.get(path).expect_failure().await;

            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json(&serde_json::json!({"error": "Record not found"}));
        }
    }

    #[tokio::test]
    async fn path_that_only_starts_like_the_api_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/recordsx").expect_failure().await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let server = get_test_server();

        let response = server.get("/static/input.css").await;

        response.assert_status_ok();
        assert!(response.text().contains("tailwindcss"));
    }

    #[tokio::test]
    async fn new_record_modal_is_not_mistaken_for_a_record_id() {
        let server = get_test_server();

        let response = server.get("/ledger/records/new").await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let dialog = html
            .select(&Selector::parse("[role=dialog]").unwrap())
            .next()
            .expect("No dialog");
        assert_eq!(dialog.value().attr("data-modal-state"), Some("adding"));
    }

    #[tokio::test]
    async fn html_form_creates_record_visible_in_json_api() {
        let server = get_test_server();

        let response = server
            .post("/ledger/records")
            .form(&[
                ("date", "2025-10-12"),
                ("category", "外食"),
                ("details", "Ramen"),
                ("inAmount", ""),
                ("outAmount", "980"),
                ("memo", ""),
            ])
            .await;

        response.assert_status_ok();
        let records = server
            .get("/records")
            .await
            .json::<Vec<serde_json::Value>>();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0]["details"], "Ramen");
        assert_eq!(records[0]["inAmount"], serde_json::Value::Null);
        assert_eq!(records[0]["outAmount"], 980);
    }

    #[tokio::test]
    async fn deleted_record_disappears_from_ledger() {
        let server = get_test_server();
        let records = server
            .get("/records")
            .await
            .json::<Vec<serde_json::Value>>();
        let id = records[0]["id"].as_i64().unwrap();

        server
            .delete(&format!("/ledger/records/{id}?month=2025-10"))
            .await
            .assert_status_ok();

        let page = server.get("/ledger?month=2025-10").await.text();
        let html = Html::parse_document(&page);
        let row_ids: Vec<_> = html
            .select(&Selector::parse("tr[data-record-id]").unwrap())
            .map(|row| row.value().attr("data-record-id").unwrap().to_owned())
            .collect();
        assert!(!row_ids.contains(&id.to_string()));
        assert_eq!(row_ids.len(), 2);
    }
}
