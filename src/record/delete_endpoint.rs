//! Deleting a record from the ledger modal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    record::{
        ModalEvent, ModalState, RecordId,
        db::get_all_records,
        ledger_page::{MonthQuery, ledger_content_view},
        lifecycle,
        modal::{modal_oob_view, stale_record_response},
    },
};

/// The state needed for deleting a record.
#[derive(Debug, Clone)]
pub struct DeleteRecordState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle record deletion.
///
/// Responds with the re-fetched ledger content for the month in the query,
/// closes the modal and confirms the deletion with an alert.
pub async fn delete_record_endpoint(
    Path(record_id): Path<RecordId>,
    State(state): State<DeleteRecordState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = lifecycle::delete(record_id, &connection) {
        return stale_record_response(error);
    }

    let records = match get_all_records(&connection) {
        Ok(records) => records,
        Err(error) => return error.into_alert_response(),
    };

    let modal = ModalState::Closed.transition(ModalEvent::Deleted(record_id));
    let alert = Alert::SuccessSimple {
        message: "Record deleted".to_owned(),
    };

    html! {
        (ledger_content_view(&records, query.month_key()))
        (modal_oob_view(&modal))
        (alert.into_oob_markup())
    }
    .into_response()
}
